use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::StoryError;
use crate::models::{RubricDimension, Verdict};

/// Characters of raw judge output kept for diagnostics
pub const EXCERPT_CHARS: usize = 300;

const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = 10.0;

/// Why a judge response could not be turned into a [`Verdict`]
#[derive(Error, Debug)]
pub enum VerdictError {
    #[error("no JSON object found")]
    NoJsonObject,

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("JSON value is not an object")]
    NotAnObject,

    #[error("missing required key `{0}`")]
    MissingKey(&'static str),

    #[error("invalid `{key}`: {reason}")]
    InvalidField { key: &'static str, reason: String },
}

/// Greedy span from the first `{` to the last `}`
pub fn extract_json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

/// First [`EXCERPT_CHARS`] characters of `raw`
pub fn excerpt(raw: &str) -> String {
    raw.chars().take(EXCERPT_CHARS).collect()
}

/// Parse a raw judge response into a [`Verdict`].
///
/// The response may carry prose or code fences around the JSON. Only the
/// span from the first `{` to the last `}` is parsed. `overall_score`,
/// `suggestions` and `scores` must be present; `blocking_issues` and
/// `length_words` default to empty and zero.
pub fn parse_verdict(raw: &str) -> Result<Verdict, StoryError> {
    parse_verdict_value(raw).map_err(|reason| StoryError::MalformedVerdict {
        reason,
        excerpt: excerpt(raw),
    })
}

fn parse_verdict_value(raw: &str) -> Result<Verdict, VerdictError> {
    let span = extract_json_span(raw).ok_or(VerdictError::NoJsonObject)?;
    let value: Value = serde_json::from_str(span)?;
    let object = value.as_object().ok_or(VerdictError::NotAnObject)?;

    let overall_score = overall_score(require(object, "overall_score")?)?;
    let suggestions = string_list("suggestions", require(object, "suggestions")?)?;
    let scores = dimension_scores(require(object, "scores")?)?;
    let blocking_issues = match object.get("blocking_issues") {
        Some(v) => string_list("blocking_issues", v)?,
        None => Vec::new(),
    };
    let length_words = object.get("length_words").map(word_count).unwrap_or(0);

    debug!(
        overall_score,
        suggestions = suggestions.len(),
        blocking_issues = blocking_issues.len(),
        dimensions = scores.len(),
        "Parsed verdict"
    );

    Ok(Verdict {
        overall_score,
        scores,
        suggestions,
        blocking_issues,
        length_words,
    })
}

fn require<'a>(object: &'a Map<String, Value>, key: &'static str) -> Result<&'a Value, VerdictError> {
    object.get(key).ok_or(VerdictError::MissingKey(key))
}

/// Numbers, or strings holding a number
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn overall_score(value: &Value) -> Result<f64, VerdictError> {
    let score = as_number(value)
        .filter(|s| s.is_finite())
        .ok_or_else(|| VerdictError::InvalidField {
            key: "overall_score",
            reason: format!("expected a number, got {}", value),
        })?;
    Ok(clamp_score("overall_score", score))
}

fn clamp_score(key: &str, score: f64) -> f64 {
    let clamped = score.clamp(MIN_SCORE, MAX_SCORE);
    if clamped != score {
        warn!(key, score, clamped, "Judge score out of range, clamping");
    }
    clamped
}

fn string_list(key: &'static str, value: &Value) -> Result<Vec<String>, VerdictError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) if s.trim().is_empty() => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => Ok(items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()),
        other => Err(VerdictError::InvalidField {
            key,
            reason: format!("expected an array, got {}", other),
        }),
    }
}

fn dimension_scores(value: &Value) -> Result<BTreeMap<RubricDimension, f64>, VerdictError> {
    let object = value.as_object().ok_or_else(|| VerdictError::InvalidField {
        key: "scores",
        reason: format!("expected an object, got {}", value),
    })?;

    let mut scores = BTreeMap::new();
    for (key, raw) in object {
        let Some(dimension) = RubricDimension::from_key(key) else {
            debug!(key = %key, "Ignoring unknown rubric dimension");
            continue;
        };
        match as_number(raw).filter(|s| s.is_finite()) {
            Some(score) => {
                scores.insert(dimension, clamp_score(dimension.key(), score));
            }
            None => warn!(dimension = %dimension, value = %raw, "Skipping non-numeric dimension score"),
        }
    }
    Ok(scores)
}

fn word_count(value: &Value) -> u32 {
    as_number(value)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.min(u32::MAX as f64) as u32)
        .unwrap_or(0)
}
