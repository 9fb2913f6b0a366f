//! Bounded retry with exponential backoff around a `Transport`.

use std::sync::Arc;
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::errors::GatewayResult;
use crate::domain::models::{Envelope, RequestSpec, RetryConfig};
use crate::domain::ports::Transport;

/// Randomization applied to each delay when jitter is enabled.
const JITTER_FACTOR: f64 = 0.5;

/// Retry policy with exponential backoff
///
/// Attempt 1 runs immediately; attempt `n > 1` waits
/// `min(base * 2^(n-2), max)`. Only failures classified retryable by
/// `GatewayError::is_retryable` are retried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub base_backoff: Duration,
    /// Upper bound for any single delay
    pub max_backoff: Duration,
    /// Randomize delays by +/-50%
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_backoff: Duration::from_millis(config.base_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms.max(config.base_backoff_ms)),
            jitter: config.jitter,
        }
    }
}

impl RetryPolicy {
    /// Delay schedule for one call. Each call gets a fresh schedule.
    fn schedule(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.base_backoff)
            .with_multiplier(2.0)
            .with_randomization_factor(if self.jitter { JITTER_FACTOR } else { 0.0 })
            .with_max_interval(self.max_backoff)
            .with_max_elapsed_time(None)
            .build()
    }
}

/// Executes requests through a transport, retrying transient failures.
#[derive(Clone)]
pub struct RetryExecutor {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Create an executor over `transport`.
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// The policy in use.
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute with the policy's attempt budget.
    pub async fn execute_with_retry(&self, spec: &RequestSpec) -> GatewayResult<Envelope> {
        self.execute_with_attempts(spec, self.policy.max_attempts)
            .await
    }

    /// Execute with an explicit attempt budget.
    ///
    /// Surfaces the last failure unchanged once the budget is spent or a
    /// terminal failure occurs. A budget of 0 is treated as 1.
    pub async fn execute_with_attempts(
        &self,
        spec: &RequestSpec,
        max_attempts: u32,
    ) -> GatewayResult<Envelope> {
        let max_attempts = max_attempts.max(1);
        let mut schedule = self.policy.schedule();
        let mut attempt = 1;

        loop {
            match self.transport.execute(spec).await {
                Ok(envelope) => {
                    if attempt > 1 {
                        debug!(
                            method = %spec.method,
                            path = %spec.path,
                            attempt,
                            "request succeeded after retry"
                        );
                    }
                    return Ok(envelope);
                }
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let delay = schedule.next_backoff().unwrap_or(self.policy.max_backoff);
                    warn!(
                        method = %spec.method,
                        path = %spec.path,
                        attempt,
                        max_attempts,
                        error = %err,
                        delay = ?delay,
                        "retryable failure, backing off"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_retryable() {
                        warn!(
                            method = %spec.method,
                            path = %spec.path,
                            attempts = attempt,
                            error = %err,
                            "giving up after exhausting retry attempts"
                        );
                    } else {
                        debug!(
                            method = %spec.method,
                            path = %spec.path,
                            attempt,
                            error = %err,
                            "terminal failure, not retrying"
                        );
                    }
                    return Err(err);
                }
            }
        }
    }
}
