//! Item definitions and stack values.
//!
//! An [`ItemStack`] is the unit of storage: an item id, a quantity, and an
//! optional list of per-instance modifiers. Slots hold `Option<ItemStack>`;
//! the canonical empty form is `None`, and a `Some` stack always carries a
//! non-zero id and a positive quantity.

use serde::{Deserialize, Serialize};

/// Item identifier referencing the item registry. `0` is reserved and
/// never appears inside a live stack.
pub type ItemId = u32;

/// Maximum stack size used when an item has no registered definition.
pub const DEFAULT_STACK_SIZE: u32 = 64;

/// Broad item category, used for modifier eligibility and demo content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Harvesting tool (pickaxe, axe, ...). Tools do not stack.
    Tool,
    /// Combat item.
    Weapon,
    /// Usable item consumed on use.
    Consumable,
    /// Raw crafting material.
    Material,
}

/// Immutable item metadata loaded from content definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Numeric id referenced by stacks and recipes.
    pub id: ItemId,
    /// Human-readable identifier (e.g. "oak_plank").
    pub name: String,
    /// Category of the item.
    pub kind: ItemKind,
    /// Largest quantity a single slot may hold.
    #[serde(default = "default_stack_size")]
    pub max_stack_size: u32,
    /// Whether this item can be burned as a catalyst when applying
    /// modifiers to other items.
    #[serde(default)]
    pub is_catalyst: bool,
}

fn default_stack_size() -> u32 {
    DEFAULT_STACK_SIZE
}

/// Read-only access to item definitions.
///
/// Injected explicitly wherever capacity or catalyst rules are needed;
/// there is no ambient global item database.
pub trait ItemLookup {
    /// Resolve the definition for an item id, if registered.
    fn definition(&self, id: ItemId) -> Option<&ItemDefinition>;

    /// Stack capacity for an item id, falling back to the default for
    /// unregistered ids.
    fn max_stack_size(&self, id: ItemId) -> u32 {
        self.definition(id)
            .map(|def| def.max_stack_size)
            .unwrap_or(DEFAULT_STACK_SIZE)
    }
}

/// A per-instance modifier attached to a single stack (enchantment-like).
/// Stacks carrying modifiers are unique and never merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    /// Modifier identifier.
    pub id: u32,
    /// Strength of the modifier.
    pub level: u8,
}

/// A quantity of one item type occupying a single slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type identifier, never `0` for a live stack.
    pub item_id: ItemId,
    /// Number of items in the stack, always positive for a live stack.
    pub quantity: u32,
    /// Per-instance modifiers. `None` and `Some(vec![])` both mean
    /// "plain stack"; [`ItemStack::has_modifiers`] normalizes the check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Vec<Modifier>>,
}

impl ItemStack {
    /// Create a plain stack.
    pub fn new(item_id: ItemId, quantity: u32) -> Self {
        debug_assert!(item_id != 0, "live stack must have a non-zero item id");
        debug_assert!(quantity > 0, "live stack must have a positive quantity");
        Self {
            item_id,
            quantity,
            modifiers: None,
        }
    }

    /// Create a stack carrying modifiers.
    pub fn with_modifiers(item_id: ItemId, quantity: u32, modifiers: Vec<Modifier>) -> Self {
        let mut stack = Self::new(item_id, quantity);
        if !modifiers.is_empty() {
            stack.modifiers = Some(modifiers);
        }
        stack
    }

    /// Whether this stack carries any per-instance modifiers.
    pub fn has_modifiers(&self) -> bool {
        self.modifiers.as_ref().is_some_and(|m| !m.is_empty())
    }

    /// Stacking compatibility: same item id and neither side is modified.
    pub fn can_stack_with(&self, other: &ItemStack) -> bool {
        self.item_id == other.item_id && !self.has_modifiers() && !other.has_modifiers()
    }

    /// Apply a modifier. An existing modifier with the same id is upgraded
    /// in place when the new level is higher; otherwise the modifier is
    /// appended. Returns false if a same-id modifier at an equal or higher
    /// level is already present.
    pub fn add_modifier(&mut self, modifier: Modifier) -> bool {
        let modifiers = self.modifiers.get_or_insert_with(Vec::new);
        for existing in modifiers.iter_mut() {
            if existing.id == modifier.id {
                if modifier.level > existing.level {
                    existing.level = modifier.level;
                    return true;
                }
                return false;
            }
        }
        modifiers.push(modifier);
        true
    }

    /// Detach `amount` items into a new stack, keeping the remainder here.
    /// Callers must ensure `0 < amount < self.quantity`; the container
    /// layer turns violations into typed errors before reaching this.
    pub fn detach(&mut self, amount: u32) -> ItemStack {
        debug_assert!(amount > 0 && amount < self.quantity);
        self.quantity -= amount;
        ItemStack {
            item_id: self.item_id,
            quantity: amount,
            modifiers: self.modifiers.clone(),
        }
    }
}
