#![warn(missing_docs)]
//! Core crafting primitives shared across the workspace.
//!
//! Items, stacks, recipes, grid-pattern normalization, and the recipe
//! match engine. Everything here is pure in-memory computation; storage
//! and transactions live in the `gridforge-inventory` and
//! `gridforge-server` crates.

pub mod item;
pub mod matcher;
pub mod pattern;
pub mod recipe;

// Re-export commonly used types
pub use item::{ItemDefinition, ItemId, ItemKind, ItemLookup, ItemStack, Modifier};
pub use matcher::{find_match, CraftMatch, GridSnapshot, MatchPlacement};
pub use pattern::Pattern;
pub use recipe::{Recipe, RecipeCell, RecipeResult, ShapedRecipe, ShapelessRecipe};

/// Width and height of the standard crafting grid.
pub const GRID_WIDTH: usize = 3;

/// Number of cells in the standard crafting grid.
pub const GRID_SLOTS: usize = GRID_WIDTH * GRID_WIDTH;
