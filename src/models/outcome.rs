use serde::Serialize;

use crate::models::{Candidate, Verdict};

/// How the story loop terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    /// A verdict met the threshold with no blocking issues
    Accepted,
    /// The round budget ran out; the verdict reflects the last candidate
    Exhausted,
}

/// Final story, its verdict, and the round the loop stopped on
#[derive(Debug, Clone, Serialize)]
pub struct LoopResult {
    pub candidate: Candidate,
    pub verdict: Verdict,
    pub rounds: u32,
    pub state: LoopState,
    /// Judge calls that produced a verdict
    pub evaluations: u32,
    pub revisions: u32,
}

impl LoopResult {
    pub fn is_accepted(&self) -> bool {
        self.state == LoopState::Accepted
    }
}
