//! Bounded retry with exponential backoff.
//!
//! Used by the sound detail fetch path. Failures classified as "not found"
//! are returned immediately: retrying a missing resource cannot succeed.

use async_trait::async_trait;
use clipdeck_core::RetrySettings;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Classifies errors for the retry loop.
pub trait Retryable {
    /// Whether the resource definitively does not exist
    fn is_not_found(&self) -> bool;
}

/// Delay provider, injectable so tests can observe backoff without waiting.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retry parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one (0 behaves like 1)
    pub max_attempts: u32,
    /// Delay after the first failure; doubles after each further failure
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
        }
    }
}

impl From<RetrySettings> for RetryPolicy {
    fn from(settings: RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            initial_delay: settings.initial_delay,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }

    /// Delay after the failure of attempt `attempt_index` (0-based)
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        2u32.checked_pow(attempt_index)
            .and_then(|factor| self.initial_delay.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }
}

/// Run `operation` until it succeeds, fails with "not found", or the
/// attempt budget is spent. Returns the last error on exhaustion.
pub async fn retry<T, E, F, Fut>(
    policy: RetryPolicy,
    sleeper: &dyn Sleeper,
    mut operation: F,
) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Retryable + Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt: u32 = 0;

    loop {
        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if error.is_not_found() {
            debug!(attempt = attempt + 1, error = %error, "Not found, not retrying");
            return Err(error);
        }

        attempt += 1;
        if attempt >= max_attempts {
            warn!(attempts = attempt, error = %error, "Giving up after retries");
            return Err(error);
        }

        let delay = policy.delay_for(attempt - 1);
        debug!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Attempt failed, backing off"
        );
        sleeper.sleep(delay).await;
    }
}
