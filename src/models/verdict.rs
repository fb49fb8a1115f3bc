use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Rubric axes the judge scores a story on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricDimension {
    /// Age fit and safety
    AgeFit,
    /// Beginning, middle and end with gentle conflict and resolution
    Arc,
    /// Friendly characters and vivid setting
    Characters,
    /// Gentle, integrated moral or theme
    Moral,
    /// Simple sentences and target length
    ClarityLength,
    /// Rhythm, sensory detail, gentle humor
    Engagement,
}

impl RubricDimension {
    pub const ALL: [RubricDimension; 6] = [
        RubricDimension::AgeFit,
        RubricDimension::Arc,
        RubricDimension::Characters,
        RubricDimension::Moral,
        RubricDimension::ClarityLength,
        RubricDimension::Engagement,
    ];

    /// Key used in the judge's JSON output
    pub fn key(self) -> &'static str {
        match self {
            RubricDimension::AgeFit => "age_fit",
            RubricDimension::Arc => "arc",
            RubricDimension::Characters => "characters",
            RubricDimension::Moral => "moral",
            RubricDimension::ClarityLength => "clarity_length",
            RubricDimension::Engagement => "engagement",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.key() == key)
    }
}

impl fmt::Display for RubricDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Structured result of one judge pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// Overall score, 0-10
    pub overall_score: f64,
    /// Per-dimension scores (only dimensions the judge reported)
    pub scores: BTreeMap<RubricDimension, f64>,
    /// Improvement items, in the judge's order
    pub suggestions: Vec<String>,
    /// Safety or appropriateness violations; must be empty to accept
    pub blocking_issues: Vec<String>,
    /// Word count as reported by the judge (not verified)
    pub length_words: u32,
}

impl Verdict {
    /// Acceptance rule: score meets the threshold and nothing is blocking
    pub fn passes(&self, min_score: f64) -> bool {
        self.overall_score >= min_score && self.blocking_issues.is_empty()
    }

    pub fn has_blocking_issues(&self) -> bool {
        !self.blocking_issues.is_empty()
    }

    pub fn score(&self, dimension: RubricDimension) -> Option<f64> {
        self.scores.get(&dimension).copied()
    }
}
