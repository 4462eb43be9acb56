//! Bounded retry policies.
//!
//! Each retryable call site owns a [`RetryBudget`] built from a
//! [`RetryPolicy`]. The budget counts failures, answers whether another try is
//! allowed and how long to back off first. Nothing here blocks; the caller
//! schedules the next try on a later tick.

use reroll_events::SimTime;

/// Maximum number of failures tolerated at a call site, plus a fixed
/// delay before each new try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_failures: u32,
    pub backoff_ms: u64,
}

impl RetryPolicy {
    pub fn fixed(max_failures: u32, backoff_ms: u64) -> Self {
        Self {
            max_failures,
            backoff_ms,
        }
    }

    pub fn budget(self) -> RetryBudget {
        RetryBudget::new(self)
    }
}

/// Verdict after recording a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again once `not_before` has passed.
    Retry { not_before: SimTime },
    /// The budget is spent.
    GiveUp,
}

/// Failure counter for one call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryBudget {
    policy: RetryPolicy,
    failures: u32,
}

impl RetryBudget {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            failures: 0,
        }
    }

    /// Records a failure observed at `now`.
    pub fn record_failure(&mut self, now: SimTime) -> RetryDecision {
        self.failures = self.failures.saturating_add(1);
        if self.failures >= self.policy.max_failures {
            RetryDecision::GiveUp
        } else {
            RetryDecision::Retry {
                not_before: now.plus_millis(self.policy.backoff_ms),
            }
        }
    }

    /// Clears the count after a success.
    pub fn reset(&mut self) {
        self.failures = 0;
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn max_failures(&self) -> u32 {
        self.policy.max_failures
    }

    pub fn is_exhausted(&self) -> bool {
        self.failures >= self.policy.max_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_gives_up_on_last_failure() {
        let mut budget = RetryPolicy::fixed(3, 0).budget();
        let now = SimTime::from_millis(0);

        assert!(matches!(budget.record_failure(now), RetryDecision::Retry { .. }));
        assert!(matches!(budget.record_failure(now), RetryDecision::Retry { .. }));
        assert_eq!(budget.record_failure(now), RetryDecision::GiveUp);
        assert!(budget.is_exhausted());
        assert_eq!(budget.failures(), 3);
    }

    #[test]
    fn test_reset_restores_full_budget() {
        let mut budget = RetryPolicy::fixed(2, 0).budget();
        let now = SimTime::ZERO;

        budget.record_failure(now);
        budget.reset();

        assert_eq!(budget.failures(), 0);
        assert!(matches!(budget.record_failure(now), RetryDecision::Retry { .. }));
    }

    #[test]
    fn test_fixed_backoff_schedules_next_try() {
        let mut budget = RetryPolicy::fixed(50, 100).budget();
        let decision = budget.record_failure(SimTime::from_millis(1_000));

        assert_eq!(
            decision,
            RetryDecision::Retry {
                not_before: SimTime::from_millis(1_100)
            }
        );
    }

    #[test]
    fn test_zero_budget_gives_up_immediately() {
        let mut budget = RetryPolicy::fixed(0, 0).budget();
        assert_eq!(budget.record_failure(SimTime::ZERO), RetryDecision::GiveUp);
    }
}
