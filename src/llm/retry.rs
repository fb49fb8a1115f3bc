use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, timeout};
use tracing::warn;

use crate::llm::{GenerationRequest, ServiceError, TextService};

/// Bounded retry with exponential backoff for transient service faults
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Upper bound on a single attempt (None = rely on the transport)
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            attempt_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Wraps a [`TextService`] so transient faults are retried below the stages
pub struct RetryingService<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: TextService> RetryingService<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn attempt(&self, request: &GenerationRequest) -> Result<String, ServiceError> {
        match self.policy.attempt_timeout {
            Some(limit) => timeout(limit, self.inner.generate(request))
                .await
                .unwrap_or(Err(ServiceError::Timeout(limit))),
            None => self.inner.generate(request).await,
        }
    }
}

#[async_trait]
impl<S: TextService> TextService for RetryingService<S> {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ServiceError> {
        let mut retry = 0;
        loop {
            match self.attempt(request).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && retry < self.policy.max_retries => {
                    retry += 1;
                    let delay = self.policy.backoff(retry);
                    warn!(
                        attempt = retry,
                        max_retries = self.policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Transient service fault, retrying"
                    );
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
