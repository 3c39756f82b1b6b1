//! Lockroom Engine library.
//!
//! This crate contains all server-side code for the lockroom game engine.
//!
//! ## Structure
//!
//! - `use_cases/` - Turn orchestration and its LLM collaborators
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `prompts` - Prompt assembly for the LLM collaborators
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod prompts;
pub mod use_cases;

pub use app::App;
