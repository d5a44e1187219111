//! The ordered command channel into a session.
//!
//! Every externally visible mutation is a [`SessionCommand`]. A session
//! executes commands strictly in arrival order; there is no interior
//! locking because one session serves one player.

use crate::session::{CommandResult, CraftSession, TakeOutcome, WorldSink};
use gridforge_core::{ItemLookup, ItemStack, Modifier};
use gridforge_inventory::SlotAddr;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An externally requested mutation of session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SessionCommand {
    /// Drag transfer between two slots.
    MoveItems {
        /// Source slot.
        from: SlotAddr,
        /// Destination slot.
        to: SlotAddr,
        /// Quantity to move.
        amount: u32,
    },
    /// Split part of a stack into an empty slot.
    SplitToSlot {
        /// Source slot.
        from: SlotAddr,
        /// Destination slot, must be empty.
        to: SlotAddr,
        /// Quantity to detach, must leave a remainder.
        amount: u32,
    },
    /// Take crafted items into storage.
    TakeResult {
        /// Desired item quantity, rounded up to whole crafts.
        quantity: u32,
        /// Specific destination slot, or `None` for auto-deposit.
        target: Option<SlotAddr>,
    },
    /// Take crafted items straight to the world.
    DropResult {
        /// Desired item quantity, rounded up to whole crafts.
        quantity: u32,
    },
    /// Move a whole stack to the opposite storage container.
    QuickMove {
        /// Source slot.
        from: SlotAddr,
    },
    /// Sort the main container.
    SortMain,
    /// Change the selected hotbar slot.
    SelectHotbar {
        /// New hotbar index.
        index: usize,
    },
    /// Eject items from a slot into the world.
    DropFromSlot {
        /// Source slot.
        slot: SlotAddr,
        /// Quantity to eject.
        quantity: u32,
    },
    /// Offer a world pickup to the player's storage.
    OfferPickup {
        /// The offered stack; anything that does not fit stays outside.
        stack: ItemStack,
    },
    /// Apply a modifier to a stack, burning catalyst items.
    ApplyModifier {
        /// Target slot.
        slot: SlotAddr,
        /// Modifier to apply or upgrade.
        modifier: Modifier,
        /// Item to burn as the catalyst.
        catalyst_id: u32,
        /// How many catalyst items to burn.
        catalyst_cost: u32,
    },
}

/// What a successfully executed command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The mutation completed with nothing extra to report.
    Done,
    /// A craft result was delivered.
    Crafted(TakeOutcome),
    /// A pickup was (possibly partially) accepted.
    PickedUp {
        /// Quantity absorbed into storage.
        accepted: u32,
    },
}

impl<'a, L: ItemLookup> CraftSession<'a, L> {
    /// Execute one command against the session. Commands must be fed in
    /// arrival order; each one fully succeeds or leaves the session
    /// unchanged.
    pub fn execute(
        &mut self,
        command: SessionCommand,
        world: &mut impl WorldSink,
    ) -> CommandResult<CommandOutcome> {
        debug!(?command, "executing session command");
        match command {
            SessionCommand::MoveItems { from, to, amount } => {
                self.move_items(from, to, amount)?;
                Ok(CommandOutcome::Done)
            }
            SessionCommand::SplitToSlot { from, to, amount } => {
                self.split_to_slot(from, to, amount)?;
                Ok(CommandOutcome::Done)
            }
            SessionCommand::TakeResult { quantity, target } => {
                let outcome = self.take_result(quantity, target)?;
                Ok(CommandOutcome::Crafted(outcome))
            }
            SessionCommand::DropResult { quantity } => {
                let outcome = self.take_result_to_world(quantity, world)?;
                Ok(CommandOutcome::Crafted(outcome))
            }
            SessionCommand::QuickMove { from } => {
                self.quick_move(from)?;
                Ok(CommandOutcome::Done)
            }
            SessionCommand::SortMain => {
                self.sort_main();
                Ok(CommandOutcome::Done)
            }
            SessionCommand::SelectHotbar { index } => {
                self.select_hotbar(index)?;
                Ok(CommandOutcome::Done)
            }
            SessionCommand::DropFromSlot { slot, quantity } => {
                self.drop_from_slot(slot, quantity, world)?;
                Ok(CommandOutcome::Done)
            }
            SessionCommand::OfferPickup { stack } => {
                let accepted = self.offer_pickup(&stack);
                Ok(CommandOutcome::PickedUp { accepted })
            }
            SessionCommand::ApplyModifier {
                slot,
                modifier,
                catalyst_id,
                catalyst_cost,
            } => {
                self.apply_modifier(slot, modifier, catalyst_id, catalyst_cost)?;
                Ok(CommandOutcome::Done)
            }
        }
    }
}
