//! Use cases - turn orchestration and its two LLM collaborators.

pub mod generate_narrative;
pub mod recognize_intent;
pub mod turn;

pub use generate_narrative::GenerateNarrative;
pub use recognize_intent::RecognizeIntent;
pub use turn::{TakeTurn, TurnError, TurnOutcome};
