// Typed errors with thiserror. Surface meaningful messages to JS.
// Content-section failures are contained at the call site, never propagated across sections.

use thiserror::Error;

/// Engine error types.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Fetch failed for {path}: {reason}")]
    Fetch { path: String, reason: String },

    #[error("Unexpected status {status} for {path}")]
    Status { path: String, status: u16 },

    #[error("Malformed JSON at {path}: {reason}")]
    Json { path: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EngineError {
    /// Tag a serde_json failure with the resource it came from.
    pub fn json(path: &str, err: serde_json::Error) -> Self {
        EngineError::Json {
            path: path.to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}
