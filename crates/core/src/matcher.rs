//! Recipe match engine.
//!
//! Given a read-only snapshot of the crafting grid and the ordered recipe
//! list, [`find_match`] decides which recipe currently applies and how many
//! simultaneous crafts the grid contents can pay for.
//!
//! Zero-craft policy: a recipe whose shape or multiset matches but whose
//! quantities support zero crafts does not stop the search. The engine
//! keeps looking for a recipe with a positive craft count and only falls
//! back to the first zero-craft structural match when nothing better
//! exists, so callers can tell "not enough material" apart from "no recipe
//! matches at all". Shaped and shapeless recipes follow the same rule.
//!
//! A shapeless recipe only counts as a zero-craft match when every
//! required id is at least present in the grid; a wholly absent
//! ingredient (or a foreign one) rejects the recipe outright, the same
//! as a shaped pattern whose cells hold the wrong item.

use crate::item::{ItemId, ItemStack};
use crate::pattern::Pattern;
use crate::recipe::{Recipe, RecipeCell, ShapedRecipe, ShapelessRecipe};
use std::collections::BTreeMap;

/// Read-only copy of the crafting grid taken before matching.
#[derive(Debug, Clone)]
pub struct GridSnapshot {
    cells: Vec<Option<ItemStack>>,
    width: usize,
}

impl GridSnapshot {
    /// Snapshot a row-major slot slice of the given width.
    pub fn new(cells: Vec<Option<ItemStack>>, width: usize) -> Self {
        debug_assert!(width > 0 && cells.len() % width == 0);
        Self { cells, width }
    }

    /// Grid width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Stack at a flat cell index.
    pub fn cell(&self, index: usize) -> Option<&ItemStack> {
        self.cells.get(index).and_then(|slot| slot.as_ref())
    }

    /// Cells as `(item_id, quantity)` pairs for normalization.
    fn as_recipe_cells(&self) -> Vec<RecipeCell> {
        self.cells
            .iter()
            .map(|slot| match slot {
                Some(stack) => RecipeCell {
                    item_id: stack.item_id,
                    quantity: stack.quantity,
                },
                None => RecipeCell::EMPTY,
            })
            .collect()
    }

    /// Aggregate non-empty cells into an `id -> total quantity` multiset.
    pub fn counts(&self) -> BTreeMap<ItemId, u32> {
        let mut have = BTreeMap::new();
        for stack in self.cells.iter().flatten() {
            *have.entry(stack.item_id).or_insert(0) += stack.quantity;
        }
        have
    }
}

/// How a matched recipe maps onto the live grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchPlacement {
    /// Shaped match: the normalized recipe pattern and the `(row, col)`
    /// origin of the matched bounding box in live-grid coordinates.
    Shaped {
        /// Origin of the matched bounding box within the grid.
        grid_origin: (usize, usize),
        /// The normalized recipe pattern that matched.
        pattern: Pattern,
    },
    /// Shapeless match: materials are drawn from whichever grid cells
    /// carry the required ids.
    Shapeless,
}

/// Outcome of a successful recipe search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftMatch {
    /// Index of the matched recipe in the registry's declared order.
    pub recipe_index: usize,
    /// Largest number of simultaneous crafts current quantities support.
    /// `0` means the shape/multiset matches but material is insufficient.
    pub max_crafts: u32,
    /// Result stack of a single craft.
    pub unit_result: ItemStack,
    /// Where the match sits in the grid.
    pub placement: MatchPlacement,
}

impl CraftMatch {
    /// Result stack scaled to `max_crafts` crafts, or `None` when no
    /// craft is currently payable.
    pub fn scaled_result(&self) -> Option<ItemStack> {
        if self.max_crafts == 0 {
            return None;
        }
        Some(ItemStack::new(
            self.unit_result.item_id,
            self.unit_result.quantity * self.max_crafts,
        ))
    }
}

/// Find the first matching recipe in declared priority order.
///
/// Returns `None` when no recipe's pattern or multiset matches the grid
/// at all; a returned match with `max_crafts == 0` means a recipe matched
/// structurally but cannot currently be paid for.
pub fn find_match(grid: &GridSnapshot, recipes: &[Recipe]) -> Option<CraftMatch> {
    let (grid_pattern, grid_origin) = Pattern::normalize(&grid.as_recipe_cells(), grid.width());
    let have = grid.counts();

    let mut zero_fallback: Option<CraftMatch> = None;
    for (recipe_index, recipe) in recipes.iter().enumerate() {
        if recipe.is_vacuous() {
            continue;
        }
        let candidate = match recipe {
            Recipe::Shaped(shaped) => {
                match_shaped(shaped, &grid_pattern, grid_origin, recipe_index)
            }
            Recipe::Shapeless(shapeless) => match_shapeless(shapeless, &have, recipe_index),
        };
        if let Some(found) = candidate {
            if found.max_crafts > 0 {
                return Some(found);
            }
            zero_fallback.get_or_insert(found);
        }
    }
    zero_fallback
}

/// Shaped comparison over normalized patterns: equal bounding boxes,
/// recipe-empty cells must be grid-empty, occupied cells must agree on
/// item id. Quantities bound the craft count but never the shape.
fn match_shaped(
    recipe: &ShapedRecipe,
    grid_pattern: &Pattern,
    grid_origin: (usize, usize),
    recipe_index: usize,
) -> Option<CraftMatch> {
    let pattern = recipe.pattern();
    if pattern.height() != grid_pattern.height() || pattern.width() != grid_pattern.width() {
        return None;
    }

    let mut max_crafts = u32::MAX;
    for (row, col, cell) in pattern.iter() {
        let grid_cell = grid_pattern.cell(row, col);
        if cell.item_id == 0 {
            if grid_cell.item_id != 0 {
                return None;
            }
            continue;
        }
        if grid_cell.item_id != cell.item_id {
            return None;
        }
        // quantity 0 cells would divide by zero; registries reject them.
        debug_assert!(cell.quantity > 0);
        max_crafts = max_crafts.min(grid_cell.quantity / cell.quantity);
    }

    if max_crafts == u32::MAX {
        return None;
    }
    Some(CraftMatch {
        recipe_index,
        max_crafts,
        unit_result: recipe.result.unit_stack(),
        placement: MatchPlacement::Shaped {
            grid_origin,
            pattern,
        },
    })
}

/// Shapeless comparison: strict containment (no foreign ids in the grid),
/// every required id present, craft count limited by the scarcest
/// ingredient.
fn match_shapeless(
    recipe: &ShapelessRecipe,
    have: &BTreeMap<ItemId, u32>,
    recipe_index: usize,
) -> Option<CraftMatch> {
    let need = recipe.need();
    if need.is_empty() || have.is_empty() {
        return None;
    }
    if have.keys().any(|id| !need.contains_key(id)) {
        return None;
    }
    if need.keys().any(|id| !have.contains_key(id)) {
        return None;
    }

    let mut max_crafts = u32::MAX;
    for (id, required) in &need {
        debug_assert!(*required > 0);
        max_crafts = max_crafts.min(have[id] / required);
    }
    Some(CraftMatch {
        recipe_index,
        max_crafts,
        unit_result: recipe.result.unit_stack(),
        placement: MatchPlacement::Shapeless,
    })
}
