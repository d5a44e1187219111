//! The per-player transaction coordinator.
//!
//! A [`CraftSession`] is the single authority over one player's
//! containers. It recomputes the craft preview synchronously after every
//! grid-affecting operation and turns result-taking into one transaction:
//! the crafted items are deposited and the materials consumed together,
//! or nothing happens at all.

use gridforge_core::{
    find_match, CraftMatch, ItemId, ItemLookup, ItemStack, MatchPlacement, Modifier, Recipe,
    GRID_WIDTH,
};
use gridforge_inventory::{ContainerKind, InventoryError, PlayerContainers, SlotAddr, SlotUpdate};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from crafting operations. All recoverable; a failing operation
/// leaves the session untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftError {
    /// No recipe matches the current grid contents.
    #[error("no recipe matches the grid")]
    NoRecipeMatch,

    /// A recipe matches but the grid cannot pay for a single craft.
    #[error("insufficient materials for the matched recipe")]
    InsufficientMaterials,

    /// The crafted items do not fit at the destination.
    #[error("no space for the crafted items")]
    NoInventorySpace,

    /// The named item cannot be burned as a modifier catalyst.
    #[error("item {0} is not a catalyst")]
    NotACatalyst(ItemId),

    /// The modifier would have no effect on the target stack.
    #[error("modifier has no effect on the target")]
    ModifierRejected,

    /// A container operation failed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// Result alias for session operations.
pub type CommandResult<T> = Result<T, CraftError>;

/// Outcome of a successful result take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeOutcome {
    /// The full crafted stack that was delivered.
    pub stack: ItemStack,
    /// Number of recipe applications consumed.
    pub crafts: u32,
}

/// Boundary to the world outside the player's containers. Dropping items
/// and picking them up are the only operations that change the player's
/// per-item grand totals.
pub trait WorldSink {
    /// Accept an ejected stack. Returns `false` when the world cannot
    /// take it, in which case the ejecting operation is rolled back.
    fn deposit_external(&mut self, stack: ItemStack) -> bool;
}

/// Authoritative state for one player's crafting and storage.
pub struct CraftSession<'a, L: ItemLookup> {
    containers: PlayerContainers,
    recipes: &'a [Recipe],
    lookup: &'a L,
    preview: Option<ItemStack>,
    events: Vec<SlotUpdate>,
}

impl<'a, L: ItemLookup> CraftSession<'a, L> {
    /// Open a session over empty containers.
    pub fn new(recipes: &'a [Recipe], lookup: &'a L) -> Self {
        info!(recipe_count = recipes.len(), "crafting session opened");
        Self {
            containers: PlayerContainers::new(),
            recipes,
            lookup,
            preview: None,
            events: Vec::new(),
        }
    }

    /// The player's containers.
    pub fn containers(&self) -> &PlayerContainers {
        &self.containers
    }

    /// Mutable container access for seeding state. Callers that touch the
    /// grid directly must call [`CraftSession::refresh_preview`] after.
    pub fn containers_mut(&mut self) -> &mut PlayerContainers {
        &mut self.containers
    }

    /// Current contents of the derived result slot.
    pub fn preview(&self) -> Option<&ItemStack> {
        self.preview.as_ref()
    }

    /// Drain all slot events since the last drain, including result-slot
    /// updates.
    pub fn take_events(&mut self) -> Vec<SlotUpdate> {
        let mut events = self.containers.take_events();
        events.append(&mut self.events);
        events
    }

    /// Recompute the match for the current grid and update the derived
    /// result slot. Pure with respect to materials; a result-slot event
    /// is recorded when the preview changed.
    pub fn refresh_preview(&mut self) {
        let found = find_match(&self.containers.grid_snapshot(), self.recipes);
        let preview = found.and_then(|m| m.scaled_result());
        if preview != self.preview {
            self.preview = preview.clone();
            self.events.push(SlotUpdate {
                kind: ContainerKind::Result,
                index: 0,
                stack: preview,
            });
        }
    }

    fn fresh_match(&self) -> Result<CraftMatch, CraftError> {
        let found = find_match(&self.containers.grid_snapshot(), self.recipes)
            .ok_or(CraftError::NoRecipeMatch)?;
        if found.max_crafts == 0 {
            return Err(CraftError::InsufficientMaterials);
        }
        Ok(found)
    }

    /// Take crafted items into the player's storage.
    ///
    /// `requested` is the desired item quantity; it is rounded up to whole
    /// recipe applications and clamped to what the grid can pay for. With
    /// a `target` slot the whole crafted stack must fit there; without
    /// one it auto-deposits (hotbar first, then main). Deposit and
    /// material consumption form one transaction.
    pub fn take_result(
        &mut self,
        requested: u32,
        target: Option<SlotAddr>,
    ) -> Result<TakeOutcome, CraftError> {
        if requested == 0 {
            return Err(CraftError::Inventory(InventoryError::InvalidAmount));
        }
        let found = self.fresh_match()?;
        let crafts = requested
            .div_ceil(found.unit_result.quantity)
            .min(found.max_crafts);
        let produced = ItemStack::new(
            found.unit_result.item_id,
            found.unit_result.quantity * crafts,
        );

        match target {
            Some(addr) => {
                if addr.kind == ContainerKind::CraftingGrid {
                    // Delivering into the grid would race the consumption
                    // about to happen there.
                    return Err(CraftError::Inventory(InventoryError::InvalidSlot {
                        kind: addr.kind,
                        index: addr.index,
                    }));
                }
                self.containers
                    .deposit_into(addr, produced.clone(), self.lookup)
                    .map_err(space_error)?;
            }
            None => {
                self.containers
                    .deposit(produced.clone(), self.lookup)
                    .map_err(space_error)?;
            }
        }
        // Deposit succeeded; the match was computed from the live grid,
        // so consumption cannot fail.
        self.consume_matched(&found, crafts);
        self.refresh_preview();
        debug!(
            recipe_index = found.recipe_index,
            crafts,
            item_id = produced.item_id,
            quantity = produced.quantity,
            "craft result taken"
        );
        Ok(TakeOutcome {
            stack: produced,
            crafts,
        })
    }

    /// Take crafted items straight to the world boundary.
    pub fn take_result_to_world(
        &mut self,
        requested: u32,
        world: &mut impl WorldSink,
    ) -> Result<TakeOutcome, CraftError> {
        if requested == 0 {
            return Err(CraftError::Inventory(InventoryError::InvalidAmount));
        }
        let found = self.fresh_match()?;
        let crafts = requested
            .div_ceil(found.unit_result.quantity)
            .min(found.max_crafts);
        let produced = ItemStack::new(
            found.unit_result.item_id,
            found.unit_result.quantity * crafts,
        );

        if !world.deposit_external(produced.clone()) {
            return Err(CraftError::NoInventorySpace);
        }
        self.consume_matched(&found, crafts);
        self.refresh_preview();
        Ok(TakeOutcome {
            stack: produced,
            crafts,
        })
    }

    /// Burn the materials a matched craft costs. Infallible by
    /// construction: the match was computed from the current grid.
    fn consume_matched(&mut self, found: &CraftMatch, crafts: u32) {
        match &found.placement {
            MatchPlacement::Shaped {
                grid_origin,
                pattern,
            } => {
                for (row, col, cell) in pattern.iter() {
                    if cell.item_id == 0 {
                        continue;
                    }
                    let index = (grid_origin.0 + row) * GRID_WIDTH + grid_origin.1 + col;
                    let addr = SlotAddr::new(ContainerKind::CraftingGrid, index);
                    let Some(stack) = self.containers.slot(addr) else {
                        debug_assert!(false, "matched cell vanished");
                        continue;
                    };
                    let mut stack = stack.clone();
                    stack.quantity = stack.quantity.saturating_sub(cell.quantity * crafts);
                    // set_slot normalizes a zero quantity to an empty slot.
                    let _ = self.containers.set_slot(addr, Some(stack));
                }
            }
            MatchPlacement::Shapeless => {
                let need = match &self.recipes[found.recipe_index] {
                    Recipe::Shapeless(recipe) => recipe.need(),
                    Recipe::Shaped(_) => {
                        debug_assert!(false, "shapeless placement for shaped recipe");
                        return;
                    }
                };
                for (item_id, per_craft) in need {
                    let mut remaining = per_craft * crafts;
                    for index in 0..self.containers.grid().len() {
                        if remaining == 0 {
                            break;
                        }
                        let addr = SlotAddr::new(ContainerKind::CraftingGrid, index);
                        let Some(stack) = self.containers.slot(addr) else {
                            continue;
                        };
                        if stack.item_id != item_id {
                            continue;
                        }
                        let burn = remaining.min(stack.quantity);
                        let mut stack = stack.clone();
                        stack.quantity -= burn;
                        remaining -= burn;
                        let _ = self.containers.set_slot(addr, Some(stack));
                    }
                    debug_assert_eq!(remaining, 0);
                }
            }
        }
    }

    /// Drag transfer between two storage slots.
    pub fn move_items(
        &mut self,
        from: SlotAddr,
        to: SlotAddr,
        amount: u32,
    ) -> Result<(), CraftError> {
        self.containers.move_items(from, to, amount, self.lookup)?;
        if touches_grid(from) || touches_grid(to) {
            self.refresh_preview();
        }
        Ok(())
    }

    /// Split part of a stack into an empty slot. The amount must leave a
    /// remainder at the source.
    pub fn split_to_slot(
        &mut self,
        from: SlotAddr,
        to: SlotAddr,
        amount: u32,
    ) -> Result<(), CraftError> {
        let source = self
            .containers
            .slot(from)
            .cloned()
            .ok_or(InventoryError::InvalidAmount)?;
        if amount == 0 || amount >= source.quantity {
            return Err(CraftError::Inventory(InventoryError::InvalidAmount));
        }
        if self.containers.slot(to).is_some() {
            return Err(CraftError::Inventory(InventoryError::SlotOccupied));
        }
        self.move_items(from, to, amount)
    }

    /// Move a whole stack to the opposite storage container.
    pub fn quick_move(&mut self, from: SlotAddr) -> Result<(), CraftError> {
        self.containers.quick_move(from, self.lookup)?;
        if touches_grid(from) {
            self.refresh_preview();
        }
        Ok(())
    }

    /// Sort the main container.
    pub fn sort_main(&mut self) {
        self.containers.sort_main();
    }

    /// Change the selected hotbar slot.
    pub fn select_hotbar(&mut self, index: usize) -> Result<(), CraftError> {
        self.containers.select_hotbar(index)?;
        Ok(())
    }

    /// Apply a modifier to the stack in a slot, burning catalyst items
    /// from hotbar and main storage. The modified stack becomes unique
    /// and stops stacking.
    pub fn apply_modifier(
        &mut self,
        slot: SlotAddr,
        modifier: Modifier,
        catalyst_id: ItemId,
        catalyst_cost: u32,
    ) -> Result<(), CraftError> {
        let is_catalyst = self
            .lookup
            .definition(catalyst_id)
            .is_some_and(|def| def.is_catalyst);
        if !is_catalyst {
            return Err(CraftError::NotACatalyst(catalyst_id));
        }
        let target = self
            .containers
            .slot(slot)
            .cloned()
            .ok_or(InventoryError::InvalidAmount)?;
        if target.item_id == catalyst_id {
            // Burning the catalyst could consume the target itself.
            return Err(CraftError::ModifierRejected);
        }
        let mut upgraded = target;
        if !upgraded.add_modifier(modifier) {
            return Err(CraftError::ModifierRejected);
        }
        self.containers.consume_across(catalyst_id, catalyst_cost)?;
        self.containers.set_slot(slot, Some(upgraded))?;
        if touches_grid(slot) {
            self.refresh_preview();
        }
        debug!(
            modifier_id = modifier.id,
            level = modifier.level,
            catalyst_id,
            catalyst_cost,
            "modifier applied"
        );
        Ok(())
    }

    /// Eject items from a slot across the world boundary.
    pub fn drop_from_slot(
        &mut self,
        slot: SlotAddr,
        quantity: u32,
        world: &mut impl WorldSink,
    ) -> Result<(), CraftError> {
        let source = self
            .containers
            .slot(slot)
            .cloned()
            .ok_or(InventoryError::InvalidAmount)?;
        if quantity == 0 || quantity > source.quantity {
            return Err(CraftError::Inventory(InventoryError::InvalidAmount));
        }
        let mut dropped = source.clone();
        dropped.quantity = quantity;
        if !world.deposit_external(dropped) {
            return Err(CraftError::NoInventorySpace);
        }
        let mut remainder = source;
        remainder.quantity -= quantity;
        self.containers.set_slot(slot, Some(remainder))?;
        if touches_grid(slot) {
            self.refresh_preview();
        }
        Ok(())
    }

    /// Accept as much of a world pickup as fits, returning the accepted
    /// quantity.
    pub fn offer_pickup(&mut self, stack: &ItemStack) -> u32 {
        self.containers.absorb(stack, self.lookup)
    }
}

fn touches_grid(addr: SlotAddr) -> bool {
    addr.kind == ContainerKind::CraftingGrid
}

fn space_error(error: InventoryError) -> CraftError {
    match error {
        InventoryError::NoInventorySpace => CraftError::NoInventorySpace,
        other => CraftError::Inventory(other),
    }
}
