//! Turn orchestration - the verify, recognize, apply, narrate, sign pipeline.

use std::sync::Arc;

use lockroom_domain::{canonical_bytes, Engine, GameState, WorldTemplate};
use thiserror::Error;

use crate::infrastructure::integrity::{AuthError, StateSigner};
use crate::infrastructure::ports::{LlmError, LlmPort};
use crate::use_cases::generate_narrative::GenerateNarrative;
use crate::use_cases::recognize_intent::RecognizeIntent;

/// Result of a completed turn: the successor state, the prose shown to the
/// player, and the tag the client must echo back with the state.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub state: GameState,
    pub narrative: String,
    pub state_tag: String,
}

/// Errors a turn can end with. Unknown intents are not among them: the
/// engine absorbs those as ordinary outcomes.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("State authentication failed: {0}")]
    Authentication(#[from] AuthError),

    #[error("LLM collaborator failed: {0}")]
    Collaborator(#[from] LlmError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Runs one player turn against a client-supplied state.
///
/// The pipeline is strict about order: the supplied state is authenticated
/// before anything else runs, intent recognition failures abort before the
/// engine mutates anything, and only the post-transition state is signed.
pub struct TakeTurn {
    template: Arc<WorldTemplate>,
    engine: Engine,
    signer: StateSigner,
    recognizer: RecognizeIntent,
    narrator: GenerateNarrative,
}

impl TakeTurn {
    pub fn new(template: Arc<WorldTemplate>, signer: StateSigner, llm: Arc<dyn LlmPort>) -> Self {
        Self {
            engine: Engine::new(template.clone()),
            signer,
            recognizer: RecognizeIntent::new(llm.clone()),
            narrator: GenerateNarrative::new(llm),
            template,
        }
    }

    /// Start a fresh session: the template's initial state, signed, with the
    /// room description as the opening narrative.
    pub fn new_session(&self) -> Result<TurnOutcome, TurnError> {
        let state = self.template.initial_state();
        let state_tag = self.signer.sign(&state)?;

        Ok(TurnOutcome {
            narrative: state.room_description.clone(),
            state,
            state_tag,
        })
    }

    pub async fn execute(
        &self,
        user_input: &str,
        state: GameState,
        state_tag: Option<&str>,
    ) -> Result<TurnOutcome, TurnError> {
        if user_input.trim().is_empty() {
            return Err(TurnError::Validation(
                "User input must not be empty".to_string(),
            ));
        }

        self.authenticate(&state, state_tag)?;

        let intent = self.recognizer.execute(&state, user_input).await?;
        tracing::debug!(action = ?intent.action, object = %intent.object, "Intent recognized");

        let (next, outcome) = self.engine.apply(&state, &intent);
        tracing::debug!(outcome = %outcome, escaped = next.escaped, "Transition applied");

        // Once the player has escaped, the scripted win message replaces
        // generated prose. The model must not be able to garble the ending.
        let narrative = if next.escaped {
            self.template.win_message.clone()
        } else {
            self.narrator.execute(&next, user_input).await
        };

        let state_tag = self.signer.sign(&next)?;

        Ok(TurnOutcome {
            state: next,
            narrative,
            state_tag,
        })
    }

    /// A state must carry a valid tag, with one exception: a state that is
    /// bit-identical to the template's initial state is accepted untagged,
    /// so clients can start a game without calling the new-session endpoint.
    fn authenticate(&self, state: &GameState, tag: Option<&str>) -> Result<(), TurnError> {
        if tag.is_none() && self.is_initial_state(state)? {
            return Ok(());
        }
        self.signer.verify(state, tag).map_err(TurnError::from)
    }

    fn is_initial_state(&self, state: &GameState) -> Result<bool, TurnError> {
        let supplied =
            canonical_bytes(state).map_err(|e| TurnError::Internal(e.to_string()))?;
        let fresh = canonical_bytes(&self.template.initial_state())
            .map_err(|e| TurnError::Internal(e.to_string()))?;
        Ok(supplied == fresh)
    }
}
