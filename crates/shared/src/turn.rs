//! Request and response DTOs for the turn endpoint.

use serde::{Deserialize, Serialize};

use lockroom_domain::GameState;

/// One turn of play, submitted by the client.
///
/// The client holds the authoritative state between turns and re-presents it
/// here. `state_tag` is the keyed tag issued with that state; it may be
/// omitted only when `state` is the untouched initial state of the scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    pub user_input: String,
    pub state: GameState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_tag: Option<String>,
}

/// The engine's reply: the successor state, its tag, and narrated prose.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub state: GameState,
    pub narrative: String,
    pub state_tag: String,
}

/// A fresh signed session. `narrative` carries the room description so a
/// client can seed its transcript before the first turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionResponse {
    pub state: GameState,
    pub narrative: String,
    pub state_tag: String,
}

/// Plain-text error payload. Every user-visible failure is text, never
/// silence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
