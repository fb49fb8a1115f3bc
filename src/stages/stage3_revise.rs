use tracing::info;

use crate::error::StoryError;
use crate::llm::{build_revision_messages, GenerationRequest, TextService, REVISION_SAMPLING};
use crate::models::{Candidate, UserRequest, Verdict};

/// Stage 3: rewrite the candidate applying only the judge's fixes
pub async fn revise(
    service: &dyn TextService,
    candidate: &Candidate,
    verdict: &Verdict,
    request: &UserRequest,
) -> Result<Candidate, StoryError> {
    let generation = GenerationRequest {
        messages: build_revision_messages(candidate, verdict, request),
        temperature: REVISION_SAMPLING.temperature,
        max_tokens: REVISION_SAMPLING.max_tokens,
    };

    let revised = Candidate::new(service.generate(&generation).await?);
    info!(
        words_before = candidate.word_count(),
        words_after = revised.word_count(),
        "Story revised"
    );
    Ok(revised)
}
