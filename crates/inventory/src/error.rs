//! Typed, recoverable inventory errors.

use crate::container::ContainerKind;
use thiserror::Error;

/// Errors returned by slot and container operations. Every failing
/// operation leaves the containers exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Slot index out of range or the container kind cannot be addressed
    /// this way (the result slot is derived-only).
    #[error("invalid slot: {kind:?}[{index}]")]
    InvalidSlot {
        /// Container the address referred to.
        kind: ContainerKind,
        /// Offending index.
        index: usize,
    },

    /// Placement target already holds a stack.
    #[error("slot is already occupied")]
    SlotOccupied,

    /// Merge attempted between stacks that cannot share a slot.
    #[error("stacks are not compatible")]
    IncompatibleStacks,

    /// Amount outside the valid range for the operation, for example a
    /// split of zero or of the whole stack, or a partial-amount move onto
    /// an incompatible stack.
    #[error("invalid amount for this operation")]
    InvalidAmount,

    /// Auto-deposit could not fit the whole stack; nothing was stored.
    #[error("no inventory space")]
    NoInventorySpace,
}
