use tracing::{info, warn};

use crate::error::StoryError;
use crate::llm::TextService;
use crate::models::{Candidate, LoopResult, LoopState, UserRequest, Verdict};
use crate::stages::{draft, evaluate, revise};

/// Configuration for the generate, judge, revise loop
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Minimum overall score for acceptance
    pub min_score: f64,
    /// Maximum number of evaluate-then-revise rounds
    pub max_rounds: u32,
    /// Immediate re-evaluations allowed when the judge output is malformed
    pub malformed_retries: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            min_score: 8.5,
            max_rounds: 3,
            malformed_retries: 0,
        }
    }
}

impl LoopConfig {
    pub fn validate(&self) -> Result<(), StoryError> {
        if self.max_rounds == 0 {
            return Err(StoryError::InvalidConfig(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        if !self.min_score.is_finite() {
            return Err(StoryError::InvalidConfig(format!(
                "min_score must be a finite number, got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}

/// Draft a story, then judge and revise it until it passes or rounds run out.
///
/// Every failing round is followed by a revision, so after the last round the
/// newest candidate is judged once more and that verdict is returned with
/// [`LoopState::Exhausted`]. Acceptance is only checked against a verdict for
/// the current candidate.
pub async fn run_story_loop(
    service: &dyn TextService,
    request: &UserRequest,
    config: &LoopConfig,
) -> Result<LoopResult, StoryError> {
    config.validate()?;

    info!(
        min_score = config.min_score,
        max_rounds = config.max_rounds,
        "Starting story loop"
    );

    let mut candidate = draft(service, request).await?;
    let mut evaluations = 0;
    let mut revisions = 0;

    for round in 1..=config.max_rounds {
        let verdict = evaluate_with_retries(service, &candidate, config).await?;
        evaluations += 1;

        if verdict.passes(config.min_score) {
            info!(round, score = verdict.overall_score, "Story accepted");
            return Ok(LoopResult {
                candidate,
                verdict,
                rounds: round,
                state: LoopState::Accepted,
                evaluations,
                revisions,
            });
        }

        info!(
            round,
            score = verdict.overall_score,
            blocking_issues = verdict.blocking_issues.len(),
            "Below threshold, revising"
        );
        candidate = revise(service, &candidate, &verdict, request).await?;
        revisions += 1;
    }

    let verdict = evaluate_with_retries(service, &candidate, config).await?;
    evaluations += 1;

    warn!(
        rounds = config.max_rounds,
        score = verdict.overall_score,
        "Round budget exhausted"
    );
    Ok(LoopResult {
        candidate,
        verdict,
        rounds: config.max_rounds,
        state: LoopState::Exhausted,
        evaluations,
        revisions,
    })
}

/// Evaluate, re-asking the judge only when its output was malformed
async fn evaluate_with_retries(
    service: &dyn TextService,
    candidate: &Candidate,
    config: &LoopConfig,
) -> Result<Verdict, StoryError> {
    let mut attempt = 0;
    loop {
        match evaluate(service, candidate).await {
            Err(e) if e.is_malformed_verdict() && attempt < config.malformed_retries => {
                attempt += 1;
                warn!(
                    attempt,
                    max = config.malformed_retries,
                    error = %e,
                    "Malformed verdict, re-evaluating"
                );
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::scripted::{ScriptedService, Stage};
    use crate::llm::ServiceError;

    const PASSING: &str = r#"{"overall_score": 9, "suggestions": [], "scores": {"arc": 9}, "blocking_issues": []}"#;
    const FAILING: &str = r#"{"overall_score": 5, "suggestions": ["Add a gentle conflict"], "scores": {"arc": 4}}"#;

    fn request() -> UserRequest {
        UserRequest::new("a kitten who learns to share").unwrap()
    }

    fn config(max_rounds: u32) -> LoopConfig {
        LoopConfig {
            max_rounds,
            ..Default::default()
        }
    }

    fn five_hundred_words() -> String {
        vec!["word"; 500].join(" ")
    }

    #[tokio::test]
    async fn test_passing_first_verdict_stops_immediately() {
        let service = ScriptedService::new().draft("Draft").verdict(PASSING);

        let result = run_story_loop(&service, &request(), &config(3)).await.unwrap();

        assert_eq!(result.state, LoopState::Accepted);
        assert_eq!(result.rounds, 1);
        assert_eq!(result.candidate.text(), "Draft");
        assert_eq!(service.count(Stage::Judge), 1);
        assert_eq!(service.count(Stage::Revise), 0);
    }

    #[tokio::test]
    async fn test_accepts_after_one_revision() {
        let service = ScriptedService::new()
            .draft(&five_hundred_words())
            .verdict(r#"{"overall_score": 6, "suggestions": ["Name the kitten"], "scores": {}}"#)
            .verdict(r#"{"overall_score": 9, "suggestions": [], "scores": {}, "blocking_issues": []}"#)
            .revision("Revised story");

        let result = run_story_loop(&service, &request(), &LoopConfig::default())
            .await
            .unwrap();

        assert_eq!(result.state, LoopState::Accepted);
        assert_eq!(result.rounds, 2);
        assert_eq!(result.candidate.text(), "Revised story");
        assert_eq!(result.verdict.overall_score, 9.0);
        assert_eq!(service.count(Stage::Revise), 1);
        assert_eq!(service.count(Stage::Judge), 2);

        let revision = &service.requests(Stage::Revise)[0];
        assert!(revision.messages[1].content.contains("Name the kitten"));
    }

    #[tokio::test]
    async fn test_never_passing_exhausts_budget() {
        let service = ScriptedService::new()
            .draft("Draft")
            .verdict(FAILING)
            .revision("Revision");

        let result = run_story_loop(&service, &request(), &config(2)).await.unwrap();

        assert_eq!(result.state, LoopState::Exhausted);
        assert_eq!(result.rounds, 2);
        assert_eq!(result.verdict.overall_score, 5.0);
        assert_eq!(service.count(Stage::Revise), 2);
        assert_eq!(service.count(Stage::Judge), 3);
        assert_eq!(result.revisions, 2);
        assert_eq!(result.evaluations, 3);
    }

    #[tokio::test]
    async fn test_worst_case_call_counts_scale_with_budget() {
        for max_rounds in 1..=4 {
            let service = ScriptedService::new()
                .draft("Draft")
                .verdict(FAILING)
                .revision("Revision");

            let result = run_story_loop(&service, &request(), &config(max_rounds))
                .await
                .unwrap();

            assert_eq!(result.rounds, max_rounds);
            assert_eq!(service.count(Stage::Draft), 1);
            assert_eq!(service.count(Stage::Revise), max_rounds as usize);
            assert_eq!(service.count(Stage::Judge), max_rounds as usize + 1);
        }
    }

    #[tokio::test]
    async fn test_blocking_issue_forces_revision_despite_high_score() {
        let service = ScriptedService::new()
            .draft("Draft")
            .verdict(r#"{"overall_score": 9.5, "suggestions": [], "scores": {}, "blocking_issues": ["The storm is too scary"]}"#)
            .verdict(PASSING)
            .revision("Calmer story");

        let result = run_story_loop(&service, &request(), &config(3)).await.unwrap();

        assert_eq!(result.state, LoopState::Accepted);
        assert_eq!(result.rounds, 2);
        assert_eq!(result.candidate.text(), "Calmer story");
    }

    #[tokio::test]
    async fn test_final_verdict_scores_last_revision() {
        let service = ScriptedService::new()
            .draft("Draft")
            .verdict(FAILING)
            .verdict(PASSING)
            .revision("Last revision");

        let result = run_story_loop(&service, &request(), &config(1)).await.unwrap();

        assert_eq!(result.state, LoopState::Exhausted);
        assert_eq!(result.rounds, 1);
        assert_eq!(result.candidate.text(), "Last revision");
        assert_eq!(result.verdict.overall_score, 9.0);

        let judged = service.requests(Stage::Judge);
        assert!(judged[1].messages[1].content.ends_with("Last revision"));
    }

    #[tokio::test]
    async fn test_malformed_verdict_propagates_by_default() {
        let service = ScriptedService::new()
            .draft("Draft")
            .verdict("I think it deserves a nine.");

        let err = run_story_loop(&service, &request(), &config(3)).await.unwrap_err();

        assert!(err.is_malformed_verdict());
        assert_eq!(service.count(Stage::Revise), 0);
    }

    #[tokio::test]
    async fn test_malformed_verdict_can_be_re_evaluated() {
        let service = ScriptedService::new()
            .draft("Draft")
            .verdict("not json")
            .verdict(PASSING);
        let config = LoopConfig {
            malformed_retries: 1,
            ..Default::default()
        };

        let result = run_story_loop(&service, &request(), &config).await.unwrap();

        assert_eq!(result.state, LoopState::Accepted);
        assert_eq!(result.rounds, 1);
        assert_eq!(result.evaluations, 1);
        assert_eq!(service.count(Stage::Judge), 2);
    }

    #[tokio::test]
    async fn test_service_fault_is_not_retried_by_loop() {
        let service = ScriptedService::new()
            .draft("Draft")
            .verdict_error(ServiceError::RateLimited("busy".into()));

        let err = run_story_loop(&service, &request(), &config(3)).await.unwrap_err();

        assert!(matches!(err, StoryError::Service(_)));
        assert_eq!(service.count(Stage::Judge), 1);
    }

    #[tokio::test]
    async fn test_rejects_zero_rounds() {
        let service = ScriptedService::new().draft("Draft");

        let err = run_story_loop(&service, &request(), &config(0)).await.unwrap_err();

        assert!(matches!(err, StoryError::InvalidConfig(_)));
        assert_eq!(service.count(Stage::Draft), 0);
    }
}
