//! Recipe definitions.
//!
//! Two recipe families exist: shaped recipes match a positional pattern up
//! to translation within the grid, shapeless recipes match a multiset of
//! ingredient quantities regardless of placement. Both produce one fixed
//! result stack per craft.

use crate::item::{ItemId, ItemStack};
use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One cell of a shaped pattern or one shapeless requirement entry.
/// `item_id == 0` in a shaped pattern means "this cell must be empty".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeCell {
    /// Required item id, or `0` for a must-be-empty cell.
    #[serde(default)]
    pub item_id: ItemId,
    /// Required quantity per craft.
    #[serde(default)]
    pub quantity: u32,
}

impl RecipeCell {
    /// The must-be-empty cell.
    pub const EMPTY: RecipeCell = RecipeCell {
        item_id: 0,
        quantity: 0,
    };
}

/// The fixed output of one craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeResult {
    /// Produced item id.
    pub item_id: ItemId,
    /// Produced quantity per craft.
    pub quantity: u32,
}

impl RecipeResult {
    /// The result as a plain stack for a single craft.
    pub fn unit_stack(&self) -> ItemStack {
        ItemStack::new(self.item_id, self.quantity)
    }
}

/// A positional recipe: a row-major cell grid matched up to translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapedRecipe {
    /// Row-major cells; length must be a multiple of `width`.
    pub cells: Vec<RecipeCell>,
    /// Width of the cell grid (3 for the standard grid).
    pub width: usize,
    /// Output of one craft.
    pub result: RecipeResult,
}

impl ShapedRecipe {
    /// Normalized pattern of the recipe cells. Registries canonicalize
    /// definitions at load, after which this is a cheap re-normalization
    /// of an already-minimal grid.
    pub fn pattern(&self) -> Pattern {
        Pattern::normalize(&self.cells, self.width).0
    }

    /// Rewrite the stored cells to the normalized bounding box, so a
    /// definition authored anywhere in its grid compares cheaply.
    pub fn canonicalize(&mut self) {
        let pattern = self.pattern();
        self.width = pattern.width();
        self.cells = pattern.cells().to_vec();
    }
}

/// A quantity-only recipe: required ingredient multiset, any placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapelessRecipe {
    /// Required ingredients. Entries with a zero id or quantity are
    /// ignored; duplicate ids accumulate.
    pub requirements: Vec<RecipeCell>,
    /// Output of one craft.
    pub result: RecipeResult,
}

impl ShapelessRecipe {
    /// Aggregate the requirement entries into an `id -> quantity` multiset.
    pub fn need(&self) -> BTreeMap<ItemId, u32> {
        let mut need = BTreeMap::new();
        for entry in &self.requirements {
            if entry.item_id == 0 || entry.quantity == 0 {
                continue;
            }
            *need.entry(entry.item_id).or_insert(0) += entry.quantity;
        }
        need
    }
}

/// A crafting recipe of either family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recipe {
    /// Positional pattern recipe.
    Shaped(ShapedRecipe),
    /// Multiset recipe.
    Shapeless(ShapelessRecipe),
}

impl Recipe {
    /// Output of one craft.
    pub fn result(&self) -> RecipeResult {
        match self {
            Recipe::Shaped(recipe) => recipe.result,
            Recipe::Shapeless(recipe) => recipe.result,
        }
    }

    /// Whether the recipe can never produce anything: no effective
    /// ingredient, or a result with a zero id or quantity. Such a recipe
    /// never matches and is rejected at registry load; the craft-count
    /// arithmetic divides by the result quantity and relies on this.
    pub fn is_vacuous(&self) -> bool {
        let result = self.result();
        if result.item_id == 0 || result.quantity == 0 {
            return true;
        }
        match self {
            Recipe::Shaped(recipe) => recipe.cells.iter().all(|cell| cell.item_id == 0),
            Recipe::Shapeless(recipe) => recipe.need().is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapeless_requirements_accumulate_duplicates() {
        let recipe = ShapelessRecipe {
            requirements: vec![
                RecipeCell {
                    item_id: 1,
                    quantity: 2,
                },
                RecipeCell {
                    item_id: 1,
                    quantity: 1,
                },
                RecipeCell {
                    item_id: 4,
                    quantity: 1,
                },
                RecipeCell::EMPTY,
            ],
            result: RecipeResult {
                item_id: 6,
                quantity: 1,
            },
        };

        let need = recipe.need();
        assert_eq!(need.get(&1), Some(&3));
        assert_eq!(need.get(&4), Some(&1));
        assert_eq!(need.len(), 2);
    }

    #[test]
    fn canonicalize_trims_authoring_padding() {
        let mut recipe = ShapedRecipe {
            cells: {
                let mut cells = vec![RecipeCell::EMPTY; 9];
                cells[4] = RecipeCell {
                    item_id: 1,
                    quantity: 1,
                };
                cells
            },
            width: 3,
            result: RecipeResult {
                item_id: 2,
                quantity: 4,
            },
        };

        recipe.canonicalize();
        assert_eq!(recipe.width, 1);
        assert_eq!(recipe.cells.len(), 1);
        assert_eq!(recipe.cells[0].item_id, 1);
    }

    #[test]
    fn vacuous_recipes_are_detected() {
        let shaped = Recipe::Shaped(ShapedRecipe {
            cells: vec![RecipeCell::EMPTY; 9],
            width: 3,
            result: RecipeResult {
                item_id: 2,
                quantity: 1,
            },
        });
        assert!(shaped.is_vacuous());

        let shapeless = Recipe::Shapeless(ShapelessRecipe {
            requirements: vec![RecipeCell {
                item_id: 3,
                quantity: 0,
            }],
            result: RecipeResult {
                item_id: 2,
                quantity: 1,
            },
        });
        assert!(shapeless.is_vacuous());
    }

    #[test]
    fn undeliverable_results_are_vacuous() {
        let zero_quantity = Recipe::Shapeless(ShapelessRecipe {
            requirements: vec![RecipeCell {
                item_id: 1,
                quantity: 1,
            }],
            result: RecipeResult {
                item_id: 2,
                quantity: 0,
            },
        });
        assert!(zero_quantity.is_vacuous());

        let zero_id = Recipe::Shaped(ShapedRecipe {
            cells: vec![RecipeCell {
                item_id: 1,
                quantity: 1,
            }],
            width: 1,
            result: RecipeResult {
                item_id: 0,
                quantity: 4,
            },
        });
        assert!(zero_id.is_vacuous());
    }
}
