//! Intent recognition - maps free-form player input onto a structured intent.

use std::sync::Arc;

use lockroom_domain::{GameState, Intent};

use crate::infrastructure::ports::{ChatMessage, LlmError, LlmPort, LlmRequest};
use crate::prompts;

/// Temperature for intent recognition. Low, because the output must be a
/// stable mapping rather than creative text.
const INTENT_TEMPERATURE: f32 = 0.1;

/// Turns a player's raw text into an [`Intent`] via the LLM.
///
/// Recognition is strict: if the model's reply does not contain a parseable
/// intent object, the error propagates and the turn is aborted. A guessed
/// intent could mutate state in a way the player never asked for.
pub struct RecognizeIntent {
    llm: Arc<dyn LlmPort>,
}

impl RecognizeIntent {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self { llm }
    }

    pub async fn execute(&self, state: &GameState, user_input: &str) -> Result<Intent, LlmError> {
        let request = LlmRequest::new(vec![ChatMessage::user(user_input)])
            .with_system_prompt(prompts::intent_system_prompt(state))
            .with_temperature(INTENT_TEMPERATURE)
            .with_json_response();

        let response = self.llm.generate(request).await?;
        parse_intent(&response.content)
    }
}

/// Extract the outermost JSON object from the model's reply and parse it.
///
/// Models occasionally wrap JSON in prose or code fences even when asked
/// not to, so we cut from the first `{` to the last `}` before parsing.
fn parse_intent(content: &str) -> Result<Intent, LlmError> {
    let json_start = content.find('{');
    let json_end = content.rfind('}');

    let json_str = match (json_start, json_end) {
        (Some(start), Some(end)) if end > start => &content[start..=end],
        _ => {
            tracing::warn!(content = %content, "No JSON object found in intent response");
            return Err(LlmError::InvalidResponse(
                "No JSON object found in intent response".to_string(),
            ));
        }
    };

    serde_json::from_str(json_str).map_err(|e| {
        tracing::warn!(error = %e, json = %json_str, "Failed to parse intent JSON");
        LlmError::InvalidResponse(format!("Failed to parse intent JSON: {e}"))
    })
}
