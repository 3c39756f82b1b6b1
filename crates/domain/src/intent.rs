use serde::{Deserialize, Serialize};

use crate::ids::ItemId;
use crate::state::GameState;

/// Closed action set produced by the external intent recognizer.
///
/// Anything the recognizer emits outside this set deserializes to `Unknown`
/// rather than failing the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Look,
    Take,
    Open,
    Unlock,
    Inventory,
    Hint,
    #[serde(other)]
    Unknown,
}

/// Structured player intent: one action, a primary object, and an optional
/// secondary object (the target of a tool-based unlock).
///
/// `object` is free text from the recognizer: an item identifier, the
/// sentinel `"room"`, or a literal such as a code guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub action: Action,
    #[serde(default)]
    pub object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_object: Option<String>,
}

impl Intent {
    pub fn new(action: Action, object: impl Into<String>) -> Self {
        Self {
            action,
            object: object.into(),
            secondary_object: None,
        }
    }

    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary_object = Some(secondary.into());
        self
    }
}

/// Result of resolving an intent's object reference against a state.
///
/// Absence is a value here: an object string that names no item resolves to
/// `Literal`, which `unlock` reads as a code guess and everything else reads
/// as "no such item".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Room,
    Item(ItemId),
    Literal(String),
}

impl Target {
    pub fn resolve(state: &GameState, object: &str) -> Self {
        if object == "room" || object == "around" {
            return Self::Room;
        }
        match state.items.get_key_value(object) {
            Some((id, _)) => Self::Item(id.clone()),
            None => Self::Literal(object.to_string()),
        }
    }
}
