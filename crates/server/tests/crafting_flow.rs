//! End-to-end crafting flows
//!
//! Drives a session through the command channel the way a connected
//! client would: pick items up, arrange the grid, take results, and
//! verify totals, events, and atomicity along the way.

use gridforge_core::{
    ItemDefinition, ItemId, ItemKind, ItemLookup, ItemStack, Recipe, RecipeCell, RecipeResult,
    ShapedRecipe, ShapelessRecipe,
};
use gridforge_inventory::{ContainerKind, SlotAddr};
use gridforge_server::{CommandOutcome, CraftSession, SessionCommand, WorldSink};

const WOOD: ItemId = 1;
const PLANK: ItemId = 2;
const STICK: ItemId = 3;
const STONE: ItemId = 5;
const FURNACE: ItemId = 7;

struct Items(Vec<ItemDefinition>);

impl Items {
    fn new() -> Self {
        let def = |id: ItemId, name: &str| ItemDefinition {
            id,
            name: name.to_string(),
            kind: ItemKind::Material,
            max_stack_size: 64,
            is_catalyst: false,
        };
        Self(vec![
            def(WOOD, "wood"),
            def(PLANK, "plank"),
            def(STICK, "stick"),
            def(STONE, "stone"),
            def(FURNACE, "furnace"),
        ])
    }
}

impl ItemLookup for Items {
    fn definition(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.0.iter().find(|def| def.id == id)
    }
}

struct Ground(Vec<ItemStack>);

impl WorldSink for Ground {
    fn deposit_external(&mut self, stack: ItemStack) -> bool {
        self.0.push(stack);
        true
    }
}

fn recipes() -> Vec<Recipe> {
    let plank = Recipe::Shapeless(ShapelessRecipe {
        requirements: vec![RecipeCell {
            item_id: WOOD,
            quantity: 1,
        }],
        result: RecipeResult {
            item_id: PLANK,
            quantity: 4,
        },
    });
    let sticks = Recipe::Shaped(ShapedRecipe {
        cells: vec![
            RecipeCell {
                item_id: PLANK,
                quantity: 1,
            },
            RecipeCell {
                item_id: PLANK,
                quantity: 1,
            },
        ],
        width: 1,
        result: RecipeResult {
            item_id: STICK,
            quantity: 4,
        },
    });
    // Ring of 8 stone around an empty center.
    let furnace_cells = (0..9)
        .map(|i| {
            if i == 4 {
                RecipeCell::EMPTY
            } else {
                RecipeCell {
                    item_id: STONE,
                    quantity: 1,
                }
            }
        })
        .collect();
    let furnace = Recipe::Shaped(ShapedRecipe {
        cells: furnace_cells,
        width: 3,
        result: RecipeResult {
            item_id: FURNACE,
            quantity: 1,
        },
    });
    vec![plank, sticks, furnace]
}

fn grid(index: usize) -> SlotAddr {
    SlotAddr::new(ContainerKind::CraftingGrid, index)
}

fn hotbar(index: usize) -> SlotAddr {
    SlotAddr::new(ContainerKind::Hotbar, index)
}

#[test]
fn wood_to_sticks_pipeline() {
    let items = Items::new();
    let recipes = recipes();
    let mut session = CraftSession::new(&recipes, &items);
    let mut world = Ground(Vec::new());

    // Pick up raw wood, craft planks, then craft sticks from the planks.
    let outcome = session
        .execute(
            SessionCommand::OfferPickup {
                stack: ItemStack::new(WOOD, 4),
            },
            &mut world,
        )
        .unwrap();
    assert_eq!(outcome, CommandOutcome::PickedUp { accepted: 4 });

    session
        .execute(
            SessionCommand::MoveItems {
                from: hotbar(0),
                to: grid(0),
                amount: 4,
            },
            &mut world,
        )
        .unwrap();
    assert_eq!(session.preview().unwrap().quantity, 16);

    session
        .execute(
            SessionCommand::TakeResult {
                quantity: 16,
                target: None,
            },
            &mut world,
        )
        .unwrap();
    assert_eq!(session.containers().total_quantity(PLANK), 16);
    assert_eq!(session.containers().total_quantity(WOOD), 0);

    // Two planks stacked vertically make sticks, anywhere in the grid.
    session
        .execute(
            SessionCommand::MoveItems {
                from: hotbar(0),
                to: grid(2),
                amount: 8,
            },
            &mut world,
        )
        .unwrap();
    session
        .execute(
            SessionCommand::MoveItems {
                from: grid(2),
                to: grid(5),
                amount: 4,
            },
            &mut world,
        )
        .unwrap();
    assert_eq!(session.preview().unwrap().quantity, 16);

    let outcome = session
        .execute(
            SessionCommand::TakeResult {
                quantity: 4,
                target: Some(hotbar(8)),
            },
            &mut world,
        )
        .unwrap();
    match outcome {
        CommandOutcome::Crafted(take) => assert_eq!(take.crafts, 1),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(
        session.containers().hotbar().slot(8).map(|s| s.quantity),
        Some(4)
    );
    // One plank consumed from each grid cell.
    assert_eq!(session.containers().grid().slot(2).unwrap().quantity, 3);
    assert_eq!(session.containers().grid().slot(5).unwrap().quantity, 3);
}

#[test]
fn furnace_ring_matches_only_with_empty_center() {
    let items = Items::new();
    let recipes = recipes();
    let mut session = CraftSession::new(&recipes, &items);

    for index in 0..9 {
        if index == 4 {
            continue;
        }
        session
            .containers_mut()
            .set_slot(grid(index), Some(ItemStack::new(STONE, 2)))
            .unwrap();
    }
    session.refresh_preview();
    assert_eq!(session.preview().unwrap().item_id, FURNACE);
    assert_eq!(session.preview().unwrap().quantity, 2);

    // Filling the center breaks the shape.
    session
        .containers_mut()
        .set_slot(grid(4), Some(ItemStack::new(STONE, 1)))
        .unwrap();
    session.refresh_preview();
    assert!(session.preview().is_none());
}

#[test]
fn take_result_is_transactional_when_storage_is_tight() {
    let items = Items::new();
    let recipes = recipes();
    let mut session = CraftSession::new(&recipes, &items);
    let mut world = Ground(Vec::new());

    // Fill all storage except 3 units of plank space.
    for i in 0..9 {
        session
            .containers_mut()
            .set_slot(hotbar(i), Some(ItemStack::new(STONE, 64)))
            .unwrap();
    }
    for i in 0..20 {
        session
            .containers_mut()
            .set_slot(SlotAddr::new(ContainerKind::Main, i), Some(ItemStack::new(STONE, 64)))
            .unwrap();
    }
    session
        .containers_mut()
        .set_slot(SlotAddr::new(ContainerKind::Main, 19), Some(ItemStack::new(PLANK, 61)))
        .unwrap();
    session
        .containers_mut()
        .set_slot(grid(0), Some(ItemStack::new(WOOD, 2)))
        .unwrap();
    session.refresh_preview();

    // Two crafts produce 8 planks; only 3 fit. Nothing may happen.
    let err = session
        .execute(
            SessionCommand::TakeResult {
                quantity: 8,
                target: None,
            },
            &mut world,
        )
        .unwrap_err();
    assert_eq!(err, gridforge_server::CraftError::NoInventorySpace);
    assert_eq!(session.containers().grid().slot(0).unwrap().quantity, 2);
    assert_eq!(session.containers().total_quantity(PLANK), 61);

    // Dropping the result to the world still works: the ground has room.
    let outcome = session
        .execute(SessionCommand::DropResult { quantity: 8 }, &mut world)
        .unwrap();
    match outcome {
        CommandOutcome::Crafted(take) => {
            assert_eq!(take.stack.quantity, 8);
            assert_eq!(take.crafts, 2);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(session.containers().grid().slot(0).is_none());
    assert_eq!(world.0[0].quantity, 8);
}

#[test]
fn result_slot_events_follow_the_preview() {
    let items = Items::new();
    let recipes = recipes();
    let mut session = CraftSession::new(&recipes, &items);
    let mut world = Ground(Vec::new());

    session
        .execute(
            SessionCommand::OfferPickup {
                stack: ItemStack::new(WOOD, 2),
            },
            &mut world,
        )
        .unwrap();
    session
        .execute(
            SessionCommand::MoveItems {
                from: hotbar(0),
                to: grid(3),
                amount: 2,
            },
            &mut world,
        )
        .unwrap();

    let events = session.take_events();
    let result_updates: Vec<_> = events
        .iter()
        .filter(|e| e.kind == ContainerKind::Result)
        .collect();
    assert_eq!(result_updates.len(), 1);
    assert_eq!(
        result_updates[0].stack.as_ref().map(|s| (s.item_id, s.quantity)),
        Some((PLANK, 8))
    );

    // Emptying the grid clears the preview and says so.
    session
        .execute(
            SessionCommand::QuickMove { from: grid(3) },
            &mut world,
        )
        .unwrap();
    let events = session.take_events();
    assert!(events
        .iter()
        .any(|e| e.kind == ContainerKind::Result && e.stack.is_none()));
}
