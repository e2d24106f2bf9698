//! Scoring error types.
//!
//! Every failure the scoring core can report is a distinct variant here so a
//! caller can render a specific message. Orchestration layers wrap these in
//! `anyhow::Error`; they stay reachable through `downcast_ref::<ScoreError>()`.

use thiserror::Error;

/// Errors produced (or propagated) by the scoring core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// The answer key is empty or contains malformed entries.
    #[error("invalid answer key: {0}")]
    InvalidKey(String),

    /// A count, total, response id, or table entry is out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The section type is not one of the recognized sections.
    #[error("unknown section type: {0}")]
    UnknownSection(String),

    /// An extraction collaborator could not produce questions or a key.
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
}

impl ScoreError {
    /// Stable machine-readable identifier for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ScoreError::InvalidKey(_) => "invalid_key",
            ScoreError::InvalidInput(_) => "invalid_input",
            ScoreError::UnknownSection(_) => "unknown_section",
            ScoreError::ExtractionFailed(_) => "extraction_failed",
        }
    }

    /// Find a `ScoreError` anywhere in an `anyhow` error chain.
    pub fn find_in(err: &anyhow::Error) -> Option<&ScoreError> {
        err.chain().find_map(|cause| cause.downcast_ref::<ScoreError>())
    }
}
