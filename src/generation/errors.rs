//! Error types for the generation domain

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while materializing generated output.
///
/// Validation and I/O failures are fatal and propagate to the caller;
/// command failures only ever reach callers as data inside a
/// [`crate::generation::BuildOutcome`].
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported output kind: {0}")]
    UnsupportedKind(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Command '{command}' failed to start: {message}")]
    CommandFailed { command: String, message: String },

    #[error("Command '{command}' timed out after {timeout:?}")]
    CommandTimeout { command: String, timeout: Duration },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GenerationError {
    /// Validation failure for an empty primary slot, shared by the parser
    /// and the writer precondition check.
    pub fn primary_empty() -> Self {
        GenerationError::Validation("primary content empty".to_string())
    }
}
