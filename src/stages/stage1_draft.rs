use tracing::{debug, info};

use crate::error::StoryError;
use crate::llm::{build_draft_messages, GenerationRequest, TextService, DRAFT_SAMPLING};
use crate::models::{Candidate, UserRequest};

/// Stage 1: write the first candidate from the user's request.
///
/// The service output is returned verbatim. Service faults propagate unchanged.
pub async fn draft(service: &dyn TextService, request: &UserRequest) -> Result<Candidate, StoryError> {
    let generation = GenerationRequest {
        messages: build_draft_messages(request),
        temperature: DRAFT_SAMPLING.temperature,
        max_tokens: DRAFT_SAMPLING.max_tokens,
    };

    debug!(request_len = request.as_str().len(), "Drafting story");
    let text = service.generate(&generation).await?;
    let candidate = Candidate::new(text);

    info!(words = candidate.word_count(), "Draft ready");
    Ok(candidate)
}
