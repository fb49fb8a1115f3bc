use tracing::{debug, info, warn};

use crate::error::StoryError;
use crate::llm::{build_judge_messages, parse_verdict, GenerationRequest, TextService, JUDGE_SAMPLING};
use crate::models::{Candidate, Verdict};

/// Stage 2: score a candidate against the rubric.
///
/// Fails with [`StoryError::MalformedVerdict`] when the judge output cannot be
/// parsed. No repair or retry happens here.
pub async fn evaluate(service: &dyn TextService, candidate: &Candidate) -> Result<Verdict, StoryError> {
    let generation = GenerationRequest {
        messages: build_judge_messages(candidate),
        temperature: JUDGE_SAMPLING.temperature,
        max_tokens: JUDGE_SAMPLING.max_tokens,
    };

    let raw = service.generate(&generation).await?;
    debug!(response_len = raw.len(), "Judge responded");

    let verdict = parse_verdict(&raw)?;

    let counted = candidate.word_count();
    if verdict.length_words > 0 && verdict.length_words as usize != counted {
        debug!(
            reported = verdict.length_words,
            counted, "Judge word count differs from local count"
        );
    }
    if verdict.has_blocking_issues() {
        warn!(issues = ?verdict.blocking_issues, "Judge reported blocking issues");
    }
    info!(
        score = verdict.overall_score,
        suggestions = verdict.suggestions.len(),
        "Story evaluated"
    );

    Ok(verdict)
}

/// Evaluate an existing story outside the revision loop
pub async fn judge_only(service: &dyn TextService, candidate: &Candidate) -> Result<Verdict, StoryError> {
    evaluate(service, candidate).await
}
