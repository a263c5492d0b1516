//! Application layer error types

use thiserror::Error;

use crate::generation::OutputKind;

/// Application layer errors
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Generation error: {0}")]
    Generation(#[from] crate::generation::GenerationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Validation errors for requests
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("App id must be a positive identifier")]
    InvalidAppId,

    #[error("Model text cannot be empty for {0} output")]
    EmptyModelText(OutputKind),
}
