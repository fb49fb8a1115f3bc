use anyhow::{Context, Result};

use crate::models::{LoopResult, LoopState, Verdict};

const BANNER_WIDTH: usize = 80;

/// Pretty-printed verdict JSON
pub fn verdict_json(verdict: &Verdict) -> Result<String> {
    serde_json::to_string_pretty(verdict).context("Failed to serialize verdict")
}

/// Human-readable report: final story, judge JSON, and how the loop ended
pub fn format_report(result: &LoopResult) -> Result<String> {
    let mut output = String::new();

    output.push_str(&banner("FINAL STORY"));
    output.push_str(result.candidate.text().trim_end());
    output.push_str("\n\n");

    output.push_str(&banner("JUDGE REPORT (JSON)"));
    output.push_str(&verdict_json(&result.verdict)?);
    output.push_str("\n\n");

    output.push_str(&outcome_line(result));
    output.push('\n');
    Ok(output)
}

fn banner(title: &str) -> String {
    let rule = "#".repeat(BANNER_WIDTH);
    format!("{}\n{}\n{}\n\n", rule, title, rule)
}

fn outcome_line(result: &LoopResult) -> String {
    match result.state {
        LoopState::Accepted => format!(
            "Accepted in round {} with score {:.1}",
            result.rounds, result.verdict.overall_score
        ),
        LoopState::Exhausted => {
            let mut line = format!(
                "Not accepted after {} rounds; final score {:.1}",
                result.rounds, result.verdict.overall_score
            );
            if result.verdict.has_blocking_issues() {
                line.push_str(&format!(
                    " ({} blocking issues)",
                    result.verdict.blocking_issues.len()
                ));
            }
            line
        }
    }
}
