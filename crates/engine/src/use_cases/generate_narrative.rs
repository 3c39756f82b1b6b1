//! Narrative generation - wraps the transition outcome in game-master prose.

use std::sync::Arc;

use lockroom_domain::GameState;

use crate::infrastructure::ports::{ChatMessage, LlmPort, LlmRequest};
use crate::prompts;

/// Narrative shown when the model fails or returns nothing usable.
pub const FALLBACK_NARRATIVE: &str = "Nothing seems to happen.";

const NARRATIVE_TEMPERATURE: f32 = 0.7;
const NARRATIVE_MAX_TOKENS: u32 = 200;

/// Produces the player-facing prose for a completed turn.
///
/// Narration is decorative: the state transition has already happened, so a
/// model failure degrades to [`FALLBACK_NARRATIVE`] instead of failing the
/// turn. The player keeps their progress either way.
pub struct GenerateNarrative {
    llm: Arc<dyn LlmPort>,
}

impl GenerateNarrative {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self { llm }
    }

    pub async fn execute(&self, state: &GameState, user_input: &str) -> String {
        let request = LlmRequest::new(vec![ChatMessage::user(prompts::narrator_user_prompt(
            state, user_input,
        ))])
        .with_system_prompt(prompts::NARRATOR_SYSTEM_PROMPT)
        .with_temperature(NARRATIVE_TEMPERATURE)
        .with_max_tokens(NARRATIVE_MAX_TOKENS);

        match self.llm.generate(request).await {
            Ok(response) if !response.content.trim().is_empty() => response.content,
            Ok(_) => {
                tracing::warn!("Narrator returned empty content");
                FALLBACK_NARRATIVE.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Narrative generation failed");
                FALLBACK_NARRATIVE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{LlmError, LlmResponse, MockLlmPort};
    use lockroom_domain::WorldTemplate;

    fn state() -> GameState {
        WorldTemplate::curator_study().initial_state()
    }

    #[tokio::test]
    async fn returns_model_prose_on_success() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .withf(|request| {
                request.temperature == Some(NARRATIVE_TEMPERATURE)
                    && request.max_tokens == Some(NARRATIVE_MAX_TOKENS)
                    && !request.json_response
            })
            .returning(|_| {
                Ok(LlmResponse {
                    content: "The desk drawer rattles but holds fast.".to_string(),
                })
            });

        let use_case = GenerateNarrative::new(Arc::new(llm));

        let narrative = use_case.execute(&state(), "open the drawer").await;

        assert_eq!(narrative, "The desk drawer rattles but holds fast.");
    }

    #[tokio::test]
    async fn falls_back_when_generation_fails() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Err(LlmError::RequestFailed("timeout".to_string())));

        let use_case = GenerateNarrative::new(Arc::new(llm));

        let narrative = use_case.execute(&state(), "look around").await;

        assert_eq!(narrative, FALLBACK_NARRATIVE);
    }

    #[tokio::test]
    async fn falls_back_when_content_is_blank() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate().returning(|_| {
            Ok(LlmResponse {
                content: "   \n".to_string(),
            })
        });

        let use_case = GenerateNarrative::new(Arc::new(llm));

        let narrative = use_case.execute(&state(), "look around").await;

        assert_eq!(narrative, FALLBACK_NARRATIVE);
    }
}
