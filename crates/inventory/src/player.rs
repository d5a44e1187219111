//! The player's combined container set.
//!
//! Hotbar, main storage, and the crafting grid, plus the cross-container
//! operations: drag transfers, all-or-nothing auto-deposit, quick-move,
//! sorting, and smallest-index-first consumption. Every mutation records
//! a [`SlotUpdate`] drained through [`PlayerContainers::take_events`].

use crate::container::{Container, ContainerKind, SlotAddr};
use crate::error::InventoryError;
use crate::events::SlotUpdate;
use gridforge_core::{GridSnapshot, ItemId, ItemLookup, ItemStack, GRID_SLOTS, GRID_WIDTH};
use tracing::debug;

/// Hotbar slot count.
pub const HOTBAR_SIZE: usize = 9;

/// Main storage slot count.
pub const MAIN_SIZE: usize = 20;

/// Crafting grid slot count.
pub const GRID_SIZE: usize = GRID_SLOTS;

/// All containers belonging to one player.
#[derive(Debug, Clone)]
pub struct PlayerContainers {
    hotbar: Container,
    main: Container,
    grid: Container,
    selected_hotbar: usize,
    events: Vec<SlotUpdate>,
}

impl Default for PlayerContainers {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerContainers {
    /// Create an empty container set.
    pub fn new() -> Self {
        Self {
            hotbar: Container::new(ContainerKind::Hotbar, HOTBAR_SIZE),
            main: Container::new(ContainerKind::Main, MAIN_SIZE),
            grid: Container::new(ContainerKind::CraftingGrid, GRID_SIZE),
            selected_hotbar: 0,
            events: Vec::new(),
        }
    }

    /// The hotbar container.
    pub fn hotbar(&self) -> &Container {
        &self.hotbar
    }

    /// The main storage container.
    pub fn main(&self) -> &Container {
        &self.main
    }

    /// The crafting grid container.
    pub fn grid(&self) -> &Container {
        &self.grid
    }

    /// Index of the currently selected hotbar slot.
    pub fn selected_hotbar(&self) -> usize {
        self.selected_hotbar
    }

    /// Change the selected hotbar slot.
    pub fn select_hotbar(&mut self, index: usize) -> Result<(), InventoryError> {
        if index >= HOTBAR_SIZE {
            return Err(InventoryError::InvalidSlot {
                kind: ContainerKind::Hotbar,
                index,
            });
        }
        self.selected_hotbar = index;
        Ok(())
    }

    /// Drain all slot-changed events recorded since the last drain.
    pub fn take_events(&mut self) -> Vec<SlotUpdate> {
        std::mem::take(&mut self.events)
    }

    fn container(&self, kind: ContainerKind) -> Option<&Container> {
        match kind {
            ContainerKind::Hotbar => Some(&self.hotbar),
            ContainerKind::Main => Some(&self.main),
            ContainerKind::CraftingGrid => Some(&self.grid),
            ContainerKind::Result => None,
        }
    }

    fn container_mut(&mut self, kind: ContainerKind) -> &mut Container {
        match kind {
            ContainerKind::Hotbar => &mut self.hotbar,
            ContainerKind::Main => &mut self.main,
            ContainerKind::CraftingGrid => &mut self.grid,
            ContainerKind::Result => unreachable!("rejected by check_addr"),
        }
    }

    /// Disjoint mutable borrows of two different storage containers.
    fn container_pair(
        &mut self,
        a: ContainerKind,
        b: ContainerKind,
    ) -> (&mut Container, &mut Container) {
        use ContainerKind::{CraftingGrid, Hotbar, Main};
        match (a, b) {
            (Hotbar, Main) => (&mut self.hotbar, &mut self.main),
            (Hotbar, CraftingGrid) => (&mut self.hotbar, &mut self.grid),
            (Main, Hotbar) => (&mut self.main, &mut self.hotbar),
            (Main, CraftingGrid) => (&mut self.main, &mut self.grid),
            (CraftingGrid, Hotbar) => (&mut self.grid, &mut self.hotbar),
            (CraftingGrid, Main) => (&mut self.grid, &mut self.main),
            _ => unreachable!("distinct storage kinds rejected by check_addr"),
        }
    }

    /// Record a slot-changed event for the current contents of a slot.
    fn record(&mut self, addr: SlotAddr) {
        let stack = self.slot(addr).cloned();
        self.events.push(SlotUpdate {
            kind: addr.kind,
            index: addr.index,
            stack,
        });
    }

    fn check_addr(&self, addr: SlotAddr) -> Result<(), InventoryError> {
        let out_of_range = InventoryError::InvalidSlot {
            kind: addr.kind,
            index: addr.index,
        };
        match self.container(addr.kind) {
            Some(container) if addr.index < container.len() => Ok(()),
            _ => Err(out_of_range),
        }
    }

    /// Stack at an address, or `None` for an empty or invalid slot.
    pub fn slot(&self, addr: SlotAddr) -> Option<&ItemStack> {
        self.container(addr.kind)?.slot(addr.index)
    }

    /// Overwrite a slot and record the change. The result slot is derived
    /// and cannot be written.
    pub fn set_slot(
        &mut self,
        addr: SlotAddr,
        stack: Option<ItemStack>,
    ) -> Result<(), InventoryError> {
        self.check_addr(addr)?;
        self.container_mut(addr.kind).set_slot(addr.index, stack)?;
        self.record(addr);
        Ok(())
    }

    /// Snapshot the crafting grid for the match engine.
    pub fn grid_snapshot(&self) -> GridSnapshot {
        GridSnapshot::new(self.grid.slots().to_vec(), GRID_WIDTH)
    }

    /// Total quantity of one item across hotbar, main, and grid.
    pub fn total_quantity(&self, item_id: ItemId) -> u32 {
        self.hotbar.total_quantity(item_id)
            + self.main.total_quantity(item_id)
            + self.grid.total_quantity(item_id)
    }

    /// The generalized drag transfer between any two storage slots.
    ///
    /// Empty target: `amount` items move over. Compatible target: items
    /// merge up to capacity, the remainder stays at the source. An
    /// incompatible target swaps only when the whole source stack moves;
    /// a partial amount onto an incompatible stack is rejected so the
    /// caller splits first.
    pub fn move_items(
        &mut self,
        from: SlotAddr,
        to: SlotAddr,
        amount: u32,
        lookup: &impl ItemLookup,
    ) -> Result<(), InventoryError> {
        self.check_addr(from)?;
        self.check_addr(to)?;
        if from == to {
            return Err(InventoryError::InvalidAmount);
        }
        let source = self
            .slot(from)
            .cloned()
            .ok_or(InventoryError::InvalidAmount)?;
        if amount == 0 || amount > source.quantity {
            return Err(InventoryError::InvalidAmount);
        }
        let max_stack = lookup.max_stack_size(source.item_id);
        let compatible = match self.slot(to) {
            Some(target) => source.can_stack_with(target),
            None => true,
        };

        if compatible {
            let moved = if from.kind == to.kind {
                self.container_mut(from.kind)
                    .merge_into(from.index, to.index, amount, max_stack)?
            } else {
                let (src, dst) = self.container_pair(from.kind, to.kind);
                transfer(src, from.index, dst, to.index, amount, max_stack)?
            };
            if moved == 0 {
                return Ok(());
            }
        } else {
            // Incompatible stacks swap whole or not at all; the caller
            // splits first for a partial amount.
            if amount != source.quantity {
                return Err(InventoryError::InvalidAmount);
            }
            if from.kind == to.kind {
                self.container_mut(from.kind).swap(from.index, to.index)?;
            } else {
                let (src, dst) = self.container_pair(from.kind, to.kind);
                let ours = src.take(from.index)?.ok_or(InventoryError::InvalidAmount)?;
                let theirs = dst.take(to.index)?.ok_or(InventoryError::InvalidAmount)?;
                src.place(from.index, theirs)?;
                dst.place(to.index, ours)?;
            }
        }
        self.record(from);
        self.record(to);
        Ok(())
    }

    /// All-or-nothing auto-deposit into hotbar then main: one pass merging
    /// onto compatible stacks, one pass filling empty slots. If the whole
    /// stack does not fit, nothing is stored.
    pub fn deposit(
        &mut self,
        stack: ItemStack,
        lookup: &impl ItemLookup,
    ) -> Result<(), InventoryError> {
        let max_stack = lookup.max_stack_size(stack.item_id);
        let mut hotbar = self.hotbar.clone();
        let mut main = self.main.clone();
        let leftover = distribute(&mut [&mut hotbar, &mut main], &stack, max_stack);
        if leftover > 0 {
            debug!(
                item_id = stack.item_id,
                quantity = stack.quantity,
                leftover,
                "deposit rejected, stack does not fit"
            );
            return Err(InventoryError::NoInventorySpace);
        }
        self.commit(hotbar);
        self.commit(main);
        Ok(())
    }

    /// Deposit a whole stack into one specific slot: place into an empty
    /// slot, or merge into a compatible one. Either way the stack must
    /// fit under its item's capacity entirely or nothing is stored.
    pub fn deposit_into(
        &mut self,
        addr: SlotAddr,
        stack: ItemStack,
        lookup: &impl ItemLookup,
    ) -> Result<(), InventoryError> {
        self.check_addr(addr)?;
        let max_stack = lookup.max_stack_size(stack.item_id);
        if stack.quantity > max_stack {
            return Err(InventoryError::NoInventorySpace);
        }
        let container = self.container_mut(addr.kind);
        match container.slot(addr.index).cloned() {
            None => container.place(addr.index, stack)?,
            Some(target) => {
                if !target.can_stack_with(&stack) {
                    return Err(InventoryError::IncompatibleStacks);
                }
                if target.quantity + stack.quantity > max_stack {
                    return Err(InventoryError::NoInventorySpace);
                }
                let quantity = stack.quantity;
                let absorbed = container.absorb_into(addr.index, &stack, quantity, max_stack)?;
                debug_assert_eq!(absorbed, quantity);
            }
        }
        self.record(addr);
        Ok(())
    }

    /// Accept as much of an offered stack as fits (partial accept),
    /// returning the accepted quantity. Used for world pickups.
    pub fn absorb(&mut self, stack: &ItemStack, lookup: &impl ItemLookup) -> u32 {
        let max_stack = lookup.max_stack_size(stack.item_id);
        let mut hotbar = self.hotbar.clone();
        let mut main = self.main.clone();
        let leftover = distribute(&mut [&mut hotbar, &mut main], stack, max_stack);
        let accepted = stack.quantity - leftover;
        if accepted > 0 {
            self.commit(hotbar);
            self.commit(main);
        }
        accepted
    }

    /// Move a whole stack to the opposite storage container (hotbar to
    /// main and back; grid stacks return to hotbar then main), merging
    /// onto compatible stacks before filling empties. Whatever does not
    /// fit stays at the source.
    pub fn quick_move(
        &mut self,
        from: SlotAddr,
        lookup: &impl ItemLookup,
    ) -> Result<(), InventoryError> {
        self.check_addr(from)?;
        let source = match self.slot(from).cloned() {
            Some(stack) => stack,
            None => return Ok(()),
        };
        let max_stack = lookup.max_stack_size(source.item_id);

        let mut hotbar = self.hotbar.clone();
        let mut main = self.main.clone();
        let leftover = {
            let mut destinations: Vec<&mut Container> = match from.kind {
                ContainerKind::Hotbar => vec![&mut main],
                ContainerKind::Main => vec![&mut hotbar],
                ContainerKind::CraftingGrid => vec![&mut hotbar, &mut main],
                ContainerKind::Result => unreachable!("rejected by check_addr"),
            };
            distribute(&mut destinations, &source, max_stack)
        };
        if leftover == source.quantity {
            return Ok(());
        }
        // The source slot must not double as a destination: re-empty it
        // on the clone before committing, then restore the remainder.
        match from.kind {
            ContainerKind::Hotbar => hotbar.set_slot(from.index, None)?,
            ContainerKind::Main => main.set_slot(from.index, None)?,
            _ => {}
        }
        self.set_slot(from, None)?;
        self.commit(hotbar);
        self.commit(main);
        self.set_slot(from, remainder_stack(source, leftover))?;
        Ok(())
    }

    /// Stable pack of the main container: stacks sorted by item id then
    /// descending quantity, empty slots pushed to the end.
    pub fn sort_main(&mut self) {
        let mut stacks: Vec<ItemStack> = self.main.slots().iter().flatten().cloned().collect();
        stacks.sort_by(|a, b| {
            a.item_id
                .cmp(&b.item_id)
                .then(b.quantity.cmp(&a.quantity))
        });

        let mut sorted = Container::new(ContainerKind::Main, MAIN_SIZE);
        for (index, stack) in stacks.into_iter().enumerate() {
            // At most MAIN_SIZE stacks exist, one per source slot.
            let _ = sorted.set_slot(index, Some(stack));
        }
        self.commit(sorted);
    }

    /// Burn `amount` items of one type, smallest slot index first, hotbar
    /// before main. Fails without changes if the two containers do not
    /// hold enough together.
    pub fn consume_across(&mut self, item_id: ItemId, amount: u32) -> Result<(), InventoryError> {
        let available = self.hotbar.total_quantity(item_id) + self.main.total_quantity(item_id);
        if amount == 0 || amount > available {
            return Err(InventoryError::InvalidAmount);
        }

        let mut remaining = amount;
        let mut hotbar = self.hotbar.clone();
        let mut main = self.main.clone();
        for container in [&mut hotbar, &mut main] {
            for index in 0..container.len() {
                if remaining == 0 {
                    break;
                }
                let Some(stack) = container.slot(index) else {
                    continue;
                };
                if stack.item_id != item_id {
                    continue;
                }
                let burn = remaining.min(stack.quantity);
                let mut stack = stack.clone();
                stack.quantity -= burn;
                remaining -= burn;
                container.set_slot(index, Some(stack))?;
            }
        }
        debug_assert_eq!(remaining, 0);
        self.commit(hotbar);
        self.commit(main);
        Ok(())
    }

    /// Replace one container with an updated clone, recording an event
    /// for each slot that changed.
    fn commit(&mut self, updated: Container) {
        let kind = updated.kind();
        let current = match kind {
            ContainerKind::Hotbar => &mut self.hotbar,
            ContainerKind::Main => &mut self.main,
            ContainerKind::CraftingGrid => &mut self.grid,
            ContainerKind::Result => return,
        };
        let mut changed = Vec::new();
        for (index, (old, new)) in current.slots().iter().zip(updated.slots()).enumerate() {
            if old != new {
                changed.push(SlotUpdate {
                    kind,
                    index,
                    stack: new.clone(),
                });
            }
        }
        *current = updated;
        self.events.extend(changed);
    }
}

fn remainder_stack(mut stack: ItemStack, remainder: u32) -> Option<ItemStack> {
    if remainder == 0 {
        return None;
    }
    stack.quantity = remainder;
    Some(stack)
}

/// Cross-container counterpart of [`Container::merge_into`]: move up to
/// `amount` items between slots of two different containers using the
/// take/place primitives. Returns the quantity actually moved.
fn transfer(
    src: &mut Container,
    from: usize,
    dst: &mut Container,
    to: usize,
    amount: u32,
    max_stack: u32,
) -> Result<u32, InventoryError> {
    let source = src.slot(from).ok_or(InventoryError::InvalidAmount)?;
    let moved = match dst.slot(to) {
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
    let mut taken = src.take(from)?.ok_or(InventoryError::InvalidAmount)?;
    let piece = if moved == taken.quantity {
        taken
    } else {
        let piece = taken.detach(moved);
        src.place(from, taken)?;
        piece
    };
    dst.absorb_into(to, &piece, piece.quantity, max_stack)?;
    Ok(moved)
}

/// Distribute a stack across the given containers in order: merge onto
/// compatible non-full stacks first, then fill empty slots. Modified
/// stacks never merge; they take one empty slot whole. Returns the
/// quantity that did not fit.
fn distribute(containers: &mut [&mut Container], stack: &ItemStack, max_stack: u32) -> u32 {
    if stack.has_modifiers() {
        for container in containers.iter_mut() {
            for index in 0..container.len() {
                if container.slot(index).is_none()
                    && container.place(index, stack.clone()).is_ok()
                {
                    return 0;
                }
            }
        }
        return stack.quantity;
    }
    let mut remaining = stack.quantity;
    for container in containers.iter_mut() {
        for index in 0..container.len() {
            if remaining == 0 {
                return 0;
            }
            let Some(existing) = container.slot(index) else {
                continue;
            };
            if !existing.can_stack_with(stack) {
                continue;
            }
            remaining -= container
                .absorb_into(index, stack, remaining, max_stack)
                .unwrap_or(0);
        }
    }
    for container in containers.iter_mut() {
        for index in 0..container.len() {
            if remaining == 0 {
                return 0;
            }
            if container.slot(index).is_some() {
                continue;
            }
            remaining -= container
                .absorb_into(index, stack, remaining, max_stack)
                .unwrap_or(0);
        }
    }
    remaining
}
