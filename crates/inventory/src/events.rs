//! Slot-changed notifications.
//!
//! Containers record a [`SlotUpdate`] for every mutated slot. Presentation
//! layers drain the queue; the storage layer never calls into them.

use crate::container::{ContainerKind, SlotAddr};
use gridforge_core::ItemStack;

/// A single slot's new contents after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotUpdate {
    /// Container the slot belongs to.
    pub kind: ContainerKind,
    /// Slot index within the container.
    pub index: usize,
    /// Contents after the change, `None` when the slot became empty.
    pub stack: Option<ItemStack>,
}

impl SlotUpdate {
    /// Address form of the updated slot.
    pub fn addr(&self) -> SlotAddr {
        SlotAddr {
            kind: self.kind,
            index: self.index,
        }
    }
}
