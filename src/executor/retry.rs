//! Retry policy for the request executor.
//!
//! Built once at executor construction and read-only afterwards. Retry is a
//! transport concern: by the time a failure reaches the classifier, the
//! policy has already been exhausted.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::time::Duration;

/// Statuses worth a further attempt: request timeout, rate limiting, and the
/// transient 5xx family.
pub static DEFAULT_RETRYABLE_STATUSES: Lazy<HashSet<u16>> =
    Lazy::new(|| [408, 429, 500, 502, 503, 504].into_iter().collect());

/// Bounded sequential retry with quadratic backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Always ≥ 1.
    pub max_attempts: u32,
    /// Backoff unit; the wait after attempt `n` is `n² × unit`.
    pub backoff_unit: Duration,
    /// Response statuses that trigger a retry. Anything else propagates
    /// immediately.
    pub retryable_statuses: HashSet<u16>,
}

impl RetryPolicy {
    /// Backoff before the attempt following `attempt` (1-based): 1 s / 4 s
    /// with the default unit and three attempts.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff_unit
            .saturating_mul(attempt.saturating_mul(attempt))
    }

    pub fn retries(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_millis(1000),
            retryable_statuses: DEFAULT_RETRYABLE_STATUSES.clone(),
        }
    }
}
