pub mod canonical;
pub mod error;
pub mod ids;
pub mod intent;
pub mod item;
pub mod state;
pub mod template;
pub mod transition;

pub use canonical::canonical_bytes;
pub use error::DomainError;
pub use ids::ItemId;
pub use intent::{Action, Intent, Target};
pub use item::{Clue, Item};
pub use state::{GameState, PlayerProfile};
pub use template::{HintRung, WorldTemplate};
pub use transition::Engine;
