//! Retry policy with exponential backoff.
//!
//! The policy is pure: given the kind of the latest failure and how many
//! retries have already happened, it decides whether to try again and how long
//! to wait first. Sleeping and re-issuing the request belong to the caller.

use std::time::Duration;

use crate::error::FailureKind;

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait `delay`, then make retry number `attempt` (1-based).
    Retry { attempt: u32, delay: Duration },
    /// The failure was retryable but the retry budget is spent.
    Exhausted,
    /// The failure is not retryable; surface it as-is.
    GiveUp,
}

/// Configuration for retry behavior with exponential backoff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: 5,
        }
    }
}

impl RetryPolicy {
    /// Creates a new retry policy with the specified parameters.
    pub fn new(base_delay: Duration, max_delay: Duration, max_retries: u32) -> Self {
        Self {
            base_delay,
            max_delay,
            max_retries,
        }
    }

    /// A policy that never retries.
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay to wait before retry number `attempt` (1-based).
    ///
    /// Computed as `base_delay * 2^(attempt - 1)`, capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return self.base_delay.min(self.max_delay);
        }

        let exponent = (attempt - 1).min(31);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }

    /// Only rate-limit failures are retried.
    pub fn is_retryable(kind: FailureKind) -> bool {
        matches!(kind, FailureKind::RateLimited)
    }

    /// Decide what to do after a failure of `kind`, when `retries_so_far`
    /// retries have already been made for this logical call.
    pub fn decide(&self, retries_so_far: u32, kind: FailureKind) -> RetryDecision {
        if !Self::is_retryable(kind) {
            return RetryDecision::GiveUp;
        }
        if retries_so_far >= self.max_retries {
            return RetryDecision::Exhausted;
        }

        let attempt = retries_so_far + 1;
        RetryDecision::Retry {
            attempt,
            delay: self.delay_for(attempt),
        }
    }
}
