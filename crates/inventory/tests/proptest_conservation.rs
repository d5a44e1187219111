//! Property-based tests for container conservation
//!
//! Validates that storage operations never create or destroy items:
//! - Random move sequences preserve per-item grand totals
//! - Quick-move and sort preserve totals
//! - Failed operations leave containers unchanged

use gridforge_inventory::{
    Container, ContainerKind, PlayerContainers, SlotAddr, GRID_SIZE, HOTBAR_SIZE, MAIN_SIZE,
};
use gridforge_core::{ItemDefinition, ItemId, ItemLookup, ItemStack};
use proptest::prelude::*;
use std::collections::BTreeMap;

struct DefaultLookup;
impl ItemLookup for DefaultLookup {
    fn definition(&self, _id: ItemId) -> Option<&ItemDefinition> {
        None
    }
}

#[derive(Debug, Clone)]
struct MoveOp {
    from: SlotAddr,
    to: SlotAddr,
    amount: u32,
}

fn arb_addr() -> impl Strategy<Value = SlotAddr> {
    prop_oneof![
        (0..HOTBAR_SIZE).prop_map(|i| SlotAddr::new(ContainerKind::Hotbar, i)),
        (0..MAIN_SIZE).prop_map(|i| SlotAddr::new(ContainerKind::Main, i)),
        (0..GRID_SIZE).prop_map(|i| SlotAddr::new(ContainerKind::CraftingGrid, i)),
    ]
}

fn arb_move() -> impl Strategy<Value = MoveOp> {
    (arb_addr(), arb_addr(), 1u32..64).prop_map(|(from, to, amount)| MoveOp { from, to, amount })
}

fn arb_player() -> impl Strategy<Value = PlayerContainers> {
    let slot = prop_oneof![
        2 => Just(None),
        3 => (1u32..5, 1u32..=64).prop_map(|(id, qty)| Some(ItemStack::new(id, qty))),
    ];
    proptest::collection::vec(slot, HOTBAR_SIZE + MAIN_SIZE + GRID_SIZE).prop_map(|slots| {
        let mut p = PlayerContainers::new();
        for (offset, stack) in slots.into_iter().enumerate() {
            let addr = if offset < HOTBAR_SIZE {
                SlotAddr::new(ContainerKind::Hotbar, offset)
            } else if offset < HOTBAR_SIZE + MAIN_SIZE {
                SlotAddr::new(ContainerKind::Main, offset - HOTBAR_SIZE)
            } else {
                SlotAddr::new(ContainerKind::CraftingGrid, offset - HOTBAR_SIZE - MAIN_SIZE)
            };
            p.set_slot(addr, stack).unwrap();
        }
        p.take_events();
        p
    })
}

fn totals(p: &PlayerContainers) -> BTreeMap<ItemId, u32> {
    let mut totals = BTreeMap::new();
    for container in [p.hotbar(), p.main(), p.grid()] {
        for stack in container.slots().iter().flatten() {
            *totals.entry(stack.item_id).or_insert(0) += stack.quantity;
        }
    }
    totals
}

fn container_snapshot(c: &Container) -> Vec<Option<ItemStack>> {
    c.slots().to_vec()
}

proptest! {
    /// Property: Arbitrary move sequences conserve per-item totals
    ///
    /// Whether each move succeeds or fails, no item is created or
    /// destroyed by transfers between the player's containers.
    #[test]
    fn move_sequences_conserve_items(
        mut player in arb_player(),
        ops in proptest::collection::vec(arb_move(), 1..30),
    ) {
        let before = totals(&player);
        for op in ops {
            let _ = player.move_items(op.from, op.to, op.amount, &DefaultLookup);
        }
        prop_assert_eq!(totals(&player), before);
    }

    /// Property: Failed moves leave every slot untouched
    #[test]
    fn failed_move_changes_nothing(
        mut player in arb_player(),
        op in arb_move(),
    ) {
        let hotbar = container_snapshot(player.hotbar());
        let main = container_snapshot(player.main());
        let grid = container_snapshot(player.grid());

        if player.move_items(op.from, op.to, op.amount, &DefaultLookup).is_err() {
            prop_assert_eq!(container_snapshot(player.hotbar()), hotbar);
            prop_assert_eq!(container_snapshot(player.main()), main);
            prop_assert_eq!(container_snapshot(player.grid()), grid);
            prop_assert!(player.take_events().is_empty());
        }
    }

    /// Property: Quick-move conserves totals
    #[test]
    fn quick_move_conserves_items(
        mut player in arb_player(),
        addr in arb_addr(),
    ) {
        let before = totals(&player);
        player.quick_move(addr, &DefaultLookup).unwrap();
        prop_assert_eq!(totals(&player), before);
    }

    /// Property: Sorting the main container conserves totals
    #[test]
    fn sort_conserves_items(mut player in arb_player()) {
        let before = totals(&player);
        player.sort_main();
        prop_assert_eq!(totals(&player), before);

        // Empties come after all stacks.
        let slots = player.main().slots();
        let first_empty = slots.iter().position(Option::is_none).unwrap_or(slots.len());
        prop_assert!(slots[first_empty..].iter().all(Option::is_none));
    }

    /// Property: Deposit either stores the whole stack or nothing
    #[test]
    fn deposit_is_atomic(
        mut player in arb_player(),
        id in 1u32..5,
        qty in 1u32..200,
    ) {
        let before = totals(&player);
        let outcome = player.deposit(ItemStack::new(id, qty), &DefaultLookup);
        let mut expected = before;
        if outcome.is_ok() {
            *expected.entry(id).or_insert(0) += qty;
        }
        prop_assert_eq!(totals(&player), expected);
    }
}
