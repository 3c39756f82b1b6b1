use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::ItemId;
use crate::item::Item;

/// Player capabilities, surfaced to the intent recognizer as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    #[serde(default)]
    pub abilities: Vec<String>,
}

/// Complete session state.
///
/// The whole state travels to the client and back each turn, so this is both
/// the engine's working set and a wire artifact. Items are keyed by a
/// `BTreeMap` so the map serializes in one deterministic key order, which the
/// canonical encoding relies on. Identifiers are never added or removed after
/// the template produces the initial state; only flags, clue discovery, the
/// inventory sequence, the outcome message, and the terminal flag change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub items: BTreeMap<ItemId, Item>,
    pub inventory: Vec<ItemId>,
    pub room_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(default)]
    pub escaped: bool,
    pub player: PlayerProfile,
}

impl GameState {
    /// A state with no items. Scenario templates build real states;
    /// this exists for tests and degenerate worlds.
    pub fn empty(room_description: impl Into<String>) -> Self {
        Self {
            items: BTreeMap::new(),
            inventory: Vec::new(),
            room_description: room_description.into(),
            last_message: None,
            escaped: false,
            player: PlayerProfile {
                abilities: Vec::new(),
            },
        }
    }

    pub fn carrying(&self, id: &ItemId) -> bool {
        self.inventory.contains(id)
    }

    /// Display names of carried items, in acquisition order.
    pub fn inventory_names(&self) -> Vec<String> {
        self.inventory
            .iter()
            .filter_map(|id| self.items.get(id).map(|item| item.name.clone()))
            .collect()
    }
}
