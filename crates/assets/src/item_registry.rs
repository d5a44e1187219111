//! Item definition registry.

use crate::AssetError;
use gridforge_core::{ItemDefinition, ItemId, ItemKind, ItemLookup};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Registry of item definitions indexed by id. The single [`ItemLookup`]
/// implementation handed to sessions and containers.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    items: HashMap<ItemId, ItemDefinition>,
}

impl ItemRegistry {
    /// Build a registry from a definition list. Entries with a zero id or
    /// a duplicate id are skipped with a warning; the first registration
    /// of an id wins.
    pub fn new(definitions: Vec<ItemDefinition>) -> Self {
        let mut items = HashMap::with_capacity(definitions.len());
        for def in definitions {
            if def.id == 0 {
                warn!(name = %def.name, "skipping item with reserved id 0");
                continue;
            }
            if items.contains_key(&def.id) {
                warn!(id = def.id, name = %def.name, "skipping duplicate item id");
                continue;
            }
            items.insert(def.id, def);
        }
        Self { items }
    }

    /// Parse a JSON array of item definitions.
    pub fn load_from_str(input: &str) -> Result<Self, AssetError> {
        let definitions: Vec<ItemDefinition> = serde_json::from_str(input)?;
        Ok(Self::new(definitions))
    }

    /// Load item definitions from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let input = std::fs::read_to_string(path)?;
        Self::load_from_str(&input)
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the registry holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over all registered definitions in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    /// Built-in demo content.
    pub fn with_defaults() -> Self {
        let material = |id: ItemId, name: &str| ItemDefinition {
            id,
            name: name.to_string(),
            kind: ItemKind::Material,
            max_stack_size: 64,
            is_catalyst: false,
        };
        Self::new(vec![
            material(1, "wood"),
            material(2, "plank"),
            material(3, "stick"),
            material(4, "string"),
            material(5, "stone"),
            ItemDefinition {
                id: 6,
                name: "bow".to_string(),
                kind: ItemKind::Tool,
                max_stack_size: 1,
                is_catalyst: false,
            },
            material(7, "furnace"),
            ItemDefinition {
                id: 8,
                name: "arcane_essence".to_string(),
                kind: ItemKind::Material,
                max_stack_size: 64,
                is_catalyst: true,
            },
            ItemDefinition {
                id: 9,
                name: "bread".to_string(),
                kind: ItemKind::Consumable,
                max_stack_size: 16,
                is_catalyst: false,
            },
        ])
    }
}

impl ItemLookup for ItemRegistry {
    fn definition(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.items.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_through_lookup() {
        let registry = ItemRegistry::with_defaults();
        assert_eq!(registry.definition(1).unwrap().name, "wood");
        assert_eq!(registry.max_stack_size(6), 1);
        assert_eq!(registry.max_stack_size(999), 64);
        assert!(registry.definition(8).unwrap().is_catalyst);
    }

    #[test]
    fn json_definitions_parse_with_defaults_applied() {
        let registry = ItemRegistry::load_from_str(
            r#"[
                {"id": 1, "name": "wood", "kind": "material"},
                {"id": 6, "name": "bow", "kind": "tool", "max_stack_size": 1},
                {"id": 8, "name": "essence", "kind": "material", "is_catalyst": true}
            ]"#,
        )
        .unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.max_stack_size(1), 64);
        assert_eq!(registry.max_stack_size(6), 1);
        assert!(registry.definition(8).unwrap().is_catalyst);
    }

    #[test]
    fn reserved_and_duplicate_ids_are_skipped() {
        let registry = ItemRegistry::load_from_str(
            r#"[
                {"id": 0, "name": "nothing", "kind": "material"},
                {"id": 1, "name": "wood", "kind": "material"},
                {"id": 1, "name": "wood_again", "kind": "material"}
            ]"#,
        )
        .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.definition(1).unwrap().name, "wood");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = ItemRegistry::load_from_str("not json").unwrap_err();
        assert!(matches!(err, AssetError::Parse(_)));
    }
}
