//! Lockroom Protocol - Wire types shared by the engine and its clients
//!
//! The full game state travels to the client and back every turn, carrying a
//! keyed authentication tag; these are the request and response shapes for
//! that exchange.
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and the domain crate
//! 2. **No business logic** - Pure data types and serialization

pub mod turn;

pub use turn::{ErrorBody, NewSessionResponse, TurnRequest, TurnResponse};
