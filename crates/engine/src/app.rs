// App struct holds the scenario template - kept for handlers that need it
#![allow(dead_code)]

//! Application state and composition.

use std::sync::Arc;

use lockroom_domain::WorldTemplate;

use crate::infrastructure::integrity::StateSigner;
use crate::infrastructure::ports::LlmPort;
use crate::use_cases::TakeTurn;

/// Main application state.
///
/// Holds the scenario template and the turn use case.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub template: Arc<WorldTemplate>,
    pub turn: TakeTurn,
}

impl App {
    pub fn new(template: Arc<WorldTemplate>, signer: StateSigner, llm: Arc<dyn LlmPort>) -> Self {
        Self {
            turn: TakeTurn::new(template.clone(), signer, llm),
            template,
        }
    }
}
