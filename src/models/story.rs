use serde::Serialize;

use crate::error::StoryError;

/// Free-text description of the story the user wants
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UserRequest(String);

impl UserRequest {
    /// Wrap a request, rejecting empty or whitespace-only text.
    ///
    /// The text is kept exactly as given; trimming is only used for the check.
    pub fn new(text: impl Into<String>) -> Result<Self, StoryError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(StoryError::EmptyRequest);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The current draft under evaluation or revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Candidate(String);

impl Candidate {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    /// Whitespace-delimited word count
    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }

    pub fn into_text(self) -> String {
        self.0
    }
}
