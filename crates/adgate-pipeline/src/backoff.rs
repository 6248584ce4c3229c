//! Jittered exponential backoff for the classified retry wrapper.
//!
//! Matches `tenacity.wait_exponential_jitter(initial=1, max=10)`'s
//! behavior: the delay is drawn uniformly from `[0, min(initial *
//! 2^attempt, max)]` on each attempt.

use std::time::Duration;

/// `min(initial * 2^attempt, max)`, then a uniform random draw over
/// `[0, that]` — matching `tenacity.wait_exponential_jitter`.
#[derive(Debug, Clone, Copy)]
pub struct Jittered {
    pub initial: Duration,
    pub max: Duration,
}

impl Jittered {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { initial, max }
    }

    /// `attempt` is zero-based (the delay before the *second* call is
    /// `next(0)`).
    pub fn next(&self, attempt: u32) -> Duration {
        let capped = self
            .initial
            .saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX))
            .min(self.max);
        let fraction: f64 = rand::random();
        capped.mul_f64(fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_exceeds_the_configured_cap() {
        let backoff = Jittered::new(Duration::from_secs(1), Duration::from_secs(10));
        for attempt in 0..10 {
            assert!(backoff.next(attempt) <= Duration::from_secs(10));
        }
    }

    #[test]
    fn grows_toward_the_cap_as_attempts_increase() {
        let backoff = Jittered::new(Duration::from_millis(1), Duration::from_secs(10));
        assert!(backoff.next(0) <= Duration::from_millis(1));
        // At attempt 20, 1ms * 2^20 vastly exceeds the 10s cap, so the
        // undilated ceiling should already be pinned at `max`.
        assert!(backoff.next(20) <= Duration::from_secs(10));
    }
}
