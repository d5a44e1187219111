//! gridforge - authoritative crafting and inventory core
//!
//! Headless demo driver: loads item and recipe definitions, opens a
//! crafting session, and runs a scripted sequence of commands the way a
//! connected client would issue them.

mod config;

use anyhow::{Context, Result};
use config::AppConfig;
use gridforge_assets::{ItemRegistry, RecipeRegistry};
use gridforge_core::{ItemStack, Modifier};
use gridforge_inventory::{ContainerKind, SlotAddr};
use gridforge_server::{CraftSession, SessionCommand, WorldSink};
use std::path::Path;
use tracing::{info, warn};

/// Dropped items land here; the demo world always has room.
#[derive(Default)]
struct Ground {
    dropped: Vec<ItemStack>,
}

impl WorldSink for Ground {
    fn deposit_external(&mut self, stack: ItemStack) -> bool {
        info!(
            item_id = stack.item_id,
            quantity = stack.quantity,
            "stack dropped to the ground"
        );
        self.dropped.push(stack);
        true
    }
}

fn load_items(config: &AppConfig) -> Result<ItemRegistry> {
    if Path::new(&config.items_path).exists() {
        return ItemRegistry::load_from_file(&config.items_path)
            .with_context(|| format!("loading items from {}", config.items_path));
    }
    if !config.fallback_to_defaults {
        anyhow::bail!("item definitions not found at {}", config.items_path);
    }
    warn!(path = %config.items_path, "item definitions missing, using built-in demo content");
    Ok(ItemRegistry::with_defaults())
}

fn load_recipes(config: &AppConfig) -> Result<RecipeRegistry> {
    if Path::new(&config.recipes_path).exists() {
        return RecipeRegistry::load_from_file(&config.recipes_path)
            .with_context(|| format!("loading recipes from {}", config.recipes_path));
    }
    if !config.fallback_to_defaults {
        anyhow::bail!("recipe definitions not found at {}", config.recipes_path);
    }
    warn!(path = %config.recipes_path, "recipe definitions missing, using built-in demo content");
    Ok(RecipeRegistry::with_defaults())
}

fn main() -> Result<()> {
    // Initialize tracing with INFO level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting gridforge v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load();
    let items = load_items(&config)?;
    let recipes = load_recipes(&config)?;
    info!(
        items = items.len(),
        recipes = recipes.len(),
        "registries loaded"
    );

    let mut session = CraftSession::new(recipes.recipes(), &items);
    let mut ground = Ground::default();

    let grid = |index: usize| SlotAddr::new(ContainerKind::CraftingGrid, index);
    let hotbar = |index: usize| SlotAddr::new(ContainerKind::Hotbar, index);

    // Gather raw materials, then work up the chain: wood -> planks ->
    // sticks -> an enchanted bow.
    let script = vec![
        SessionCommand::OfferPickup {
            stack: ItemStack::new(1, 6),
        },
        SessionCommand::OfferPickup {
            stack: ItemStack::new(4, 3),
        },
        SessionCommand::OfferPickup {
            stack: ItemStack::new(8, 4),
        },
        // Craft planks from two wood.
        SessionCommand::MoveItems {
            from: hotbar(0),
            to: grid(0),
            amount: 2,
        },
        SessionCommand::TakeResult {
            quantity: 8,
            target: None,
        },
        // Planks auto-deposited into the first empty hotbar slot. Stack
        // two vertically for sticks.
        SessionCommand::MoveItems {
            from: hotbar(3),
            to: grid(1),
            amount: 4,
        },
        SessionCommand::MoveItems {
            from: grid(1),
            to: grid(4),
            amount: 2,
        },
        SessionCommand::TakeResult {
            quantity: 4,
            target: None,
        },
        // Clear leftovers back to storage, then craft the bow shapeless.
        SessionCommand::QuickMove { from: grid(1) },
        SessionCommand::QuickMove { from: grid(4) },
        SessionCommand::MoveItems {
            from: hotbar(1),
            to: grid(3),
            amount: 3,
        },
        SessionCommand::MoveItems {
            from: hotbar(4),
            to: grid(7),
            amount: 3,
        },
        SessionCommand::TakeResult {
            quantity: 1,
            target: Some(hotbar(5)),
        },
        // Enchant the bow, burning arcane essence as the catalyst.
        SessionCommand::ApplyModifier {
            slot: hotbar(5),
            modifier: Modifier { id: 1, level: 2 },
            catalyst_id: 8,
            catalyst_cost: 3,
        },
        SessionCommand::SortMain,
        SessionCommand::DropFromSlot {
            slot: hotbar(5),
            quantity: 1,
        },
    ];

    for command in script {
        match session.execute(command.clone(), &mut ground) {
            Ok(outcome) => info!(?command, ?outcome, "command applied"),
            Err(err) => warn!(?command, %err, "command rejected"),
        }
    }

    for update in session.take_events() {
        info!(
            kind = ?update.kind,
            index = update.index,
            stack = ?update.stack,
            "slot changed"
        );
    }
    info!(
        ground_stacks = ground.dropped.len(),
        "demo session finished"
    );
    Ok(())
}
