use thiserror::Error;

use crate::llm::{ServiceError, VerdictError};

/// Errors surfaced by the story loop and its stages
#[derive(Error, Debug)]
pub enum StoryError {
    #[error("Story request is empty")]
    EmptyRequest,

    #[error("Invalid loop configuration: {0}")]
    InvalidConfig(String),

    #[error("Text generation failed: {0}")]
    Service(#[from] ServiceError),

    #[error("Judge returned a malformed verdict ({reason}): {excerpt}")]
    MalformedVerdict {
        reason: VerdictError,
        /// Leading fragment of the raw judge response
        excerpt: String,
    },
}

impl StoryError {
    pub fn is_malformed_verdict(&self) -> bool {
        matches!(self, StoryError::MalformedVerdict { .. })
    }
}
