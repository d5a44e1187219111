#![warn(missing_docs)]
//! Content registries loaded from JSON definition files.
//!
//! Item definitions and the ordered recipe list, plus built-in demo
//! content for tests and the headless demo binary.

mod item_registry;
mod recipe_registry;

pub use item_registry::ItemRegistry;
pub use recipe_registry::RecipeRegistry;

use thiserror::Error;

/// Errors emitted while loading definition files.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading definition files.
    #[error("failed to read definitions: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse definitions: {0}")]
    Parse(#[from] serde_json::Error),
}
