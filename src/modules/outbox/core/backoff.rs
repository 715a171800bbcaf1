// Backoff policy: a pure mapping from attempt count to delay and verdict.
//
// Purpose
// - Decide, after a failed publish, whether a row retries later or is parked
//   as Failed, and how long the retry delay is.
//
// Boundaries
// - No clocks and no storage. Callers add the delay to their own `now`.

use chrono::Duration;

#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// Delay after the first failure.
    pub initial_backoff: Duration,
    /// Exponential growth factor per subsequent failure.
    pub multiplier: f64,
    /// Attempt count at which a row stops retrying.
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffDecision {
    Retry { delay: Duration },
    Failed { delay: Duration },
}

impl BackoffPolicy {
    /// `attempt` is 1-indexed: the first failure is attempt 1.
    /// delay = initial_backoff * multiplier^(attempt - 1)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let millis = self.initial_backoff.num_milliseconds() as f64
            * self.multiplier.powi(exponent as i32);
        Duration::milliseconds(millis.round() as i64)
    }

    pub fn decide(&self, attempt: u32) -> BackoffDecision {
        let delay = self.delay_for(attempt);
        if attempt >= self.max_attempts {
            BackoffDecision::Failed { delay }
        } else {
            BackoffDecision::Retry { delay }
        }
    }
}
