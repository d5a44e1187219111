#![warn(missing_docs)]
//! Container storage for player inventories.
//!
//! Fixed-size slot containers with atomic slot operations (place, merge,
//! split, swap), the combined player container set (hotbar, main storage,
//! crafting grid), auto-deposit, quick-move, sorting, and slot-changed
//! event emission. Every operation either fully succeeds or leaves the
//! containers untouched and returns a typed [`InventoryError`].

pub mod container;
pub mod error;
pub mod events;
pub mod player;

pub use container::{Container, ContainerKind, SlotAddr};
pub use error::InventoryError;
pub use events::SlotUpdate;
pub use player::{PlayerContainers, GRID_SIZE, HOTBAR_SIZE, MAIN_SIZE};
