#![warn(missing_docs)]
//! Authoritative crafting session.
//!
//! One [`CraftSession`] per player owns that player's containers, keeps
//! the derived craft preview current, and executes every mutation as an
//! all-or-nothing transaction. Commands arrive through the
//! [`SessionCommand`] channel and are processed strictly in order.

pub mod commands;
pub mod session;

pub use commands::{CommandOutcome, SessionCommand};
pub use session::{CommandResult, CraftError, CraftSession, TakeOutcome, WorldSink};
