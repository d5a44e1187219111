//! Fixed-size slot containers and atomic slot primitives.

use crate::error::InventoryError;
use gridforge_core::ItemStack;
use serde::{Deserialize, Serialize};

/// Which of the player's containers a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Quick-access bar, 9 slots.
    Hotbar,
    /// Main storage, 20 slots.
    Main,
    /// Crafting input grid, 9 slots.
    CraftingGrid,
    /// Derived craft preview. Read-only; rejected as a storage target.
    Result,
}

/// Address of a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotAddr {
    /// Container the slot lives in.
    pub kind: ContainerKind,
    /// Index within that container.
    pub index: usize,
}

impl SlotAddr {
    /// Shorthand constructor.
    pub fn new(kind: ContainerKind, index: usize) -> Self {
        Self { kind, index }
    }
}

/// A fixed-length run of item slots. The length is set at construction
/// and never changes; empty slots are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    kind: ContainerKind,
    slots: Vec<Option<ItemStack>>,
}

impl Container {
    /// Create an empty container of the given kind and slot count.
    pub fn new(kind: ContainerKind, len: usize) -> Self {
        Self {
            kind,
            slots: vec![None; len],
        }
    }

    /// Container kind.
    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the container has zero slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Stack in a slot, or `None` for an empty or out-of-range slot.
    pub fn slot(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    /// All slots in order.
    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Total quantity of one item across all slots.
    pub fn total_quantity(&self, item_id: u32) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.item_id == item_id)
            .map(|stack| stack.quantity)
            .sum()
    }

    fn check(&self, index: usize) -> Result<(), InventoryError> {
        if index >= self.slots.len() {
            return Err(InventoryError::InvalidSlot {
                kind: self.kind,
                index,
            });
        }
        Ok(())
    }

    /// Overwrite a slot's contents. Bounds-checked; normalizes a
    /// zero-quantity stack to `None`.
    pub fn set_slot(
        &mut self,
        index: usize,
        stack: Option<ItemStack>,
    ) -> Result<(), InventoryError> {
        self.check(index)?;
        self.slots[index] = stack.filter(|s| s.quantity > 0);
        Ok(())
    }

    /// Place a stack into an empty slot.
    pub fn place(&mut self, index: usize, stack: ItemStack) -> Result<(), InventoryError> {
        self.check(index)?;
        if self.slots[index].is_some() {
            return Err(InventoryError::SlotOccupied);
        }
        self.slots[index] = Some(stack);
        Ok(())
    }

    /// Remove and return a slot's contents.
    pub fn take(&mut self, index: usize) -> Result<Option<ItemStack>, InventoryError> {
        self.check(index)?;
        Ok(self.slots[index].take())
    }

    /// Empty a slot, discarding any contents.
    pub fn clear(&mut self, index: usize) -> Result<(), InventoryError> {
        self.check(index)?;
        self.slots[index] = None;
        Ok(())
    }

    /// Detach `amount` items from a slot into a returned stack. The
    /// amount must leave a non-empty remainder: `0 < amount < quantity`.
    pub fn split(&mut self, index: usize, amount: u32) -> Result<ItemStack, InventoryError> {
        self.check(index)?;
        let stack = self.slots[index]
            .as_mut()
            .ok_or(InventoryError::InvalidAmount)?;
        if amount == 0 || amount >= stack.quantity {
            return Err(InventoryError::InvalidAmount);
        }
        Ok(stack.detach(amount))
    }

    /// Exchange the contents of two slots unconditionally.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), InventoryError> {
        self.check(a)?;
        self.check(b)?;
        self.slots.swap(a, b);
        Ok(())
    }

    /// Move up to `amount` items from one slot onto another within this
    /// container, respecting `max_stack` capacity at the target. The
    /// target must be empty or stack-compatible. Returns the quantity
    /// actually moved; a source reaching zero becomes empty.
    pub fn merge_into(
        &mut self,
        from: usize,
        to: usize,
        amount: u32,
        max_stack: u32,
    ) -> Result<u32, InventoryError> {
        self.check(from)?;
        self.check(to)?;
        if from == to {
            return Err(InventoryError::InvalidAmount);
        }
        let source = self.slots[from]
            .as_ref()
            .ok_or(InventoryError::InvalidAmount)?;
        if amount == 0 || amount > source.quantity {
            return Err(InventoryError::InvalidAmount);
        }

        let moved = match &self.slots[to] {
            Some(target) => {
                if !source.can_stack_with(target) {
                    return Err(InventoryError::IncompatibleStacks);
                }
                amount.min(max_stack.saturating_sub(target.quantity))
            }
            None => {
                if source.has_modifiers() && amount < source.quantity {
                    // Modified stacks move whole or not at all.
                    return Err(InventoryError::InvalidAmount);
                }
                amount.min(max_stack)
            }
        };
        if moved == 0 {
            return Ok(0);
        }

        let mut source = self.slots[from].take().ok_or(InventoryError::InvalidAmount)?;
        let remainder = source.quantity - moved;
        match self.slots[to].as_mut() {
            Some(target) => target.quantity += moved,
            None => {
                let mut placed = source.clone();
                placed.quantity = moved;
                self.slots[to] = Some(placed);
            }
        }
        if remainder > 0 {
            source.quantity = remainder;
            self.slots[from] = Some(source);
        }
        Ok(moved)
    }

    /// Absorb up to `amount` items of an external stack into one slot,
    /// respecting `max_stack` capacity. The slot must be empty or
    /// stack-compatible. Returns the quantity absorbed, which is `0`
    /// when the slot is already full.
    pub fn absorb_into(
        &mut self,
        index: usize,
        stack: &ItemStack,
        amount: u32,
        max_stack: u32,
    ) -> Result<u32, InventoryError> {
        self.check(index)?;
        let moved = match &self.slots[index] {
            Some(target) => {
                if !stack.can_stack_with(target) {
                    return Err(InventoryError::IncompatibleStacks);
                }
                amount.min(max_stack.saturating_sub(target.quantity))
            }
            None => amount.min(max_stack),
        };
        if moved == 0 {
            return Ok(0);
        }
        match self.slots[index].as_mut() {
            Some(target) => target.quantity += moved,
            None => {
                let mut placed = stack.clone();
                placed.quantity = moved;
                self.slots[index] = Some(placed);
            }
        }
        Ok(moved)
    }
}
