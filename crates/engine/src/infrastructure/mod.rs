//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies and the
//! state signing service.

pub mod integrity;
pub mod ollama;
pub mod ports;
