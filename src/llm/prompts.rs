use serde_json::json;

use crate::llm::ChatMessage;
use crate::models::{Candidate, UserRequest, Verdict};

/// Word count the reviser is asked to stay near
pub const REVISION_TARGET_WORDS: u32 = 550;

/// Temperature and output ceiling for one kind of call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Drafting favors variety
pub const DRAFT_SAMPLING: Sampling = Sampling {
    temperature: 0.5,
    max_tokens: 1200,
};

/// Judging should be as deterministic as the service allows
pub const JUDGE_SAMPLING: Sampling = Sampling {
    temperature: 0.0,
    max_tokens: 700,
};

pub const REVISION_SAMPLING: Sampling = Sampling {
    temperature: 0.4,
    max_tokens: 1200,
};

pub const STORYTELLER_SYSTEM: &str = r#"You are a kind children's storyteller writing for ages 5-10.
Write warm, imaginative stories with:
- A clear beginning, middle, and end (gentle conflict and resolution)
- Friendly characters and vivid but simple imagery
- A soft moral (kindness, curiosity, perseverance) that is shown, not preached
- Simple sentences and age-appropriate vocabulary
- A safe, comforting tone (no violence, fear, complex romance, or dark themes)
Aim for about 400-700 words unless the request asks for something else.
Keep paragraphs short (2-4 sentences)."#;

pub const JUDGE_SYSTEM: &str = r#"You are a meticulous judge of children's stories for ages 5-10.
Evaluate the story against this rubric:
- age_fit: age fit and safety
- arc: story arc clarity (beginning, middle, end; conflict and resolution)
- characters: characters and setting (friendly, vivid, imaginative)
- moral: moral or theme (gentle, uplifting, integrated)
- clarity_length: clarity and length (simple sentences; about 400-700 words unless specified)
- engagement: rhythm, sensory details, gentle humor

Return STRICT JSON with exactly these keys:
- overall_score: number 0-10
- scores: object with keys "age_fit", "arc", "characters", "moral", "clarity_length", "engagement", each 0-10
- suggestions: array of concrete, concise improvements
- blocking_issues: array of safety or age-appropriateness issues (may be empty)
- length_words: integer word count

Output a single JSON object only. No prose and no code fences."#;

pub const REVISION_SYSTEM: &str = r#"You are revising a children's story for ages 5-10.
Apply ONLY the improvements requested in the judge feedback and keep what already works.
Keep the tone safe, warm, and comforting. Keep about 400-700 words unless specified.
Return ONLY the revised story text: no commentary, no headings."#;

pub fn build_draft_messages(request: &UserRequest) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(STORYTELLER_SYSTEM),
        ChatMessage::user(format!(
            "Please write a bedtime story. User request/theme: {}",
            request.as_str()
        )),
    ]
}

pub fn build_judge_messages(candidate: &Candidate) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(JUDGE_SYSTEM),
        ChatMessage::user(format!(
            "Here is the story to evaluate:\n\n{}",
            candidate.text()
        )),
    ]
}

/// Condensed feedback handed to the reviser
pub fn revision_feedback(verdict: &Verdict) -> String {
    json!({
        "overall_score": verdict.overall_score,
        "suggestions": verdict.suggestions,
        "blocking_issues": verdict.blocking_issues,
        "keep_length_target_words": REVISION_TARGET_WORDS,
    })
    .to_string()
}

pub fn build_revision_messages(
    candidate: &Candidate,
    verdict: &Verdict,
    request: &UserRequest,
) -> Vec<ChatMessage> {
    let mut prompt = String::new();
    prompt.push_str("Revise the following story for ages 5-10 based on the judge feedback JSON.\n");
    prompt.push_str(&format!("User request/theme: {}\n\n", request.as_str()));
    prompt.push_str(&format!("JUDGE_JSON:\n{}\n\n", revision_feedback(verdict)));
    prompt.push_str(&format!("STORY:\n{}", candidate.text()));

    vec![
        ChatMessage::system(REVISION_SYSTEM),
        ChatMessage::user(prompt),
    ]
}
