//! Canonical state encoding for integrity tags.
//!
//! Two logically equal states must produce identical bytes, whatever order
//! their containers were assembled in, or the authentication tag would fail
//! on states the engine itself issued.
//!
//! # Why this encoding is canonical
//!
//! - Struct fields serialize in declaration order, fixed at compile time.
//! - The item map goes through `serde_json::Value`, whose object map is
//!   BTree-backed, so keys come out lexicographically sorted at every level.
//! - `inventory` is a JSON array; its order is semantic (acquisition order)
//!   and is preserved as-is.
//! - State carries no floating-point fields, so number formatting is stable.

use serde_json::Error;

use crate::state::GameState;

/// Serialize a state to its canonical byte encoding.
pub fn canonical_bytes(state: &GameState) -> Result<Vec<u8>, Error> {
    let value = serde_json::to_value(state)?;
    serde_json::to_vec(&value)
}
