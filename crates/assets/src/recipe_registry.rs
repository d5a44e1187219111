//! Recipe registry.
//!
//! Holds the ordered recipe list the match engine walks. Registration
//! order is match priority: the first matching recipe wins. Shaped
//! definitions are canonicalized once at load so authoring position
//! within a grid never matters.

use crate::AssetError;
use gridforge_core::{Recipe, RecipeCell, RecipeResult, ShapedRecipe, ShapelessRecipe};
use std::path::Path;
use tracing::warn;

/// Ordered list of crafting recipes.
#[derive(Debug, Clone, Default)]
pub struct RecipeRegistry {
    recipes: Vec<Recipe>,
}

impl RecipeRegistry {
    /// Build a registry, canonicalizing shaped recipes and skipping
    /// recipes with no effective ingredients.
    pub fn new(recipes: Vec<Recipe>) -> Self {
        let mut kept = Vec::with_capacity(recipes.len());
        for (index, mut recipe) in recipes.into_iter().enumerate() {
            if recipe.is_vacuous() {
                warn!(index, "skipping recipe with no ingredients");
                continue;
            }
            if let Recipe::Shaped(shaped) = &mut recipe {
                shaped.canonicalize();
            }
            kept.push(recipe);
        }
        Self { recipes: kept }
    }

    /// Parse a JSON array of recipes.
    pub fn load_from_str(input: &str) -> Result<Self, AssetError> {
        let recipes: Vec<Recipe> = serde_json::from_str(input)?;
        Ok(Self::new(recipes))
    }

    /// Load recipes from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let input = std::fs::read_to_string(path)?;
        Self::load_from_str(&input)
    }

    /// The recipes in priority order, as the match engine expects them.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Number of registered recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the registry holds no recipes.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Built-in demo content matching [`crate::ItemRegistry::with_defaults`].
    pub fn with_defaults() -> Self {
        let cell = |item_id: u32, quantity: u32| RecipeCell { item_id, quantity };

        // 1 wood -> 4 planks, any placement.
        let planks = Recipe::Shapeless(ShapelessRecipe {
            requirements: vec![cell(1, 1)],
            result: RecipeResult {
                item_id: 2,
                quantity: 4,
            },
        });
        // 2 planks stacked vertically -> 4 sticks.
        let sticks = Recipe::Shaped(ShapedRecipe {
            cells: vec![cell(2, 1), cell(2, 1)],
            width: 1,
            result: RecipeResult {
                item_id: 3,
                quantity: 4,
            },
        });
        // 3 sticks + 3 string anywhere -> a bow.
        let bow = Recipe::Shapeless(ShapelessRecipe {
            requirements: vec![cell(3, 3), cell(4, 3)],
            result: RecipeResult {
                item_id: 6,
                quantity: 1,
            },
        });
        // Ring of 8 stone around an empty center -> a furnace.
        let furnace = Recipe::Shaped(ShapedRecipe {
            cells: (0..9)
                .map(|i| if i == 4 { RecipeCell::EMPTY } else { cell(5, 1) })
                .collect(),
            width: 3,
            result: RecipeResult {
                item_id: 7,
                quantity: 1,
            },
        });
        Self::new(vec![planks, sticks, bow, furnace])
    }
}
