//! Retry policy with exponential backoff for simulation runs.
//!
//! Backoff doubles with each retry: 1s, 2s, 4s, ... capped at the maximum.
//! Every error counts as a failure worth retrying except caller
//! cancellation and a missing backend.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::errors::DomainError;
use crate::domain::models::RetryConfig;

/// Successful outcome of [`RetryPolicy::execute`].
#[derive(Debug)]
pub struct Retried<T> {
    pub value: T,
    /// Failed attempts before the successful one
    pub retry_count: u32,
    pub elapsed: Duration,
}

/// Last failure once [`RetryPolicy::execute`] gives up.
#[derive(Debug)]
pub struct RetryExhausted {
    pub error: DomainError,
    pub retry_count: u32,
    pub elapsed: Duration,
}

/// Retry policy configuration for handling failed generation runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Backoff before the first retry
    pub initial_backoff: Duration,
    /// Upper bound for any single backoff
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
            max_backoff,
        }
    }

    /// Policy that tries exactly once.
    pub fn no_retry() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }

    /// Execute an operation with exponential backoff retry logic
    ///
    /// `operation` is called up to `max_retries + 1` times. Non-retryable
    /// errors are returned immediately.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<Retried<T>, RetryExhausted>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let started = Instant::now();
        let mut attempt = 0;

        loop {
            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(retry_count = attempt, "operation succeeded after retries");
                    }
                    return Ok(Retried {
                        value,
                        retry_count: attempt,
                        elapsed: started.elapsed(),
                    });
                }
                Err(error) => {
                    if !self.should_retry(&error, attempt) {
                        if error.is_retryable() {
                            warn!(attempts = attempt + 1, error = %error, "operation failed after all retries");
                        } else {
                            debug!(error = %error, "permanent error, not retrying");
                        }
                        return Err(RetryExhausted {
                            error,
                            retry_count: attempt,
                            elapsed: started.elapsed(),
                        });
                    }

                    attempt += 1;
                    let backoff = self.calculate_backoff(attempt);
                    warn!(
                        attempt,
                        max_retries = self.max_retries,
                        backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "attempt failed, retrying"
                    );
                    sleep(backoff).await;
                }
            }
        }
    }

    /// Backoff before retry number `attempt` (1-indexed).
    ///
    /// Formula: min(initial_backoff * 2^(attempt-1), max_backoff)
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.initial_backoff
            .saturating_mul(2_u32.saturating_pow(exponent))
            .min(self.max_backoff)
    }

    fn should_retry(&self, error: &DomainError, attempt: u32) -> bool {
        attempt < self.max_retries && error.is_retryable()
    }
}
