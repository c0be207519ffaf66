//! Fetch policy: retry, backoff and pacing for batch lookups.
//!
//! [`FetchPolicy`] groups the static parameters that control the loop in
//! [`RunBatchUseCase`](crate::use_cases::run_batch::RunBatchUseCase).
//! The defaults keep a single client well under the registry limit of
//! 2000 requests per 5 minutes.
//!
//! | Parameter | Default |
//! |-----------|---------|
//! | `max_attempts` | 3 |
//! | `rate_limit_cooldown` | 5 min |
//! | `network_retry_delay` | 10 s |
//! | `pacing_delay` | 200 ms |
//! | `countdown_tick` | 1 s |
//! | `large_batch_threshold` | 100 ids |

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Batch fetch loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchPolicy {
    /// Attempts per identifier for retryable outcomes (429, network errors).
    pub max_attempts: u32,
    /// Wait after a 429 before the next attempt.
    pub rate_limit_cooldown: Duration,
    /// Wait after a network error before the next attempt.
    pub network_retry_delay: Duration,
    /// Gap between identifiers that resolved on the first attempt.
    pub pacing_delay: Duration,
    /// Granularity of backoff countdown updates.
    pub countdown_tick: Duration,
    /// Batches larger than this get a rate-limit notice up front.
    pub large_batch_threshold: usize,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_cooldown: Duration::from_secs(300),
            network_retry_delay: Duration::from_secs(10),
            pacing_delay: Duration::from_millis(200),
            countdown_tick: Duration::from_secs(1),
            large_batch_threshold: 100,
        }
    }
}

impl FetchPolicy {
    // ==================== Builder Methods ====================

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max.max(1);
        self
    }

    pub fn with_rate_limit_cooldown(mut self, cooldown: Duration) -> Self {
        self.rate_limit_cooldown = cooldown;
        self
    }

    pub fn with_network_retry_delay(mut self, delay: Duration) -> Self {
        self.network_retry_delay = delay;
        self
    }

    pub fn with_pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay = delay;
        self
    }

    pub fn with_countdown_tick(mut self, tick: Duration) -> Self {
        self.countdown_tick = tick;
        self
    }

    pub fn with_large_batch_threshold(mut self, threshold: usize) -> Self {
        self.large_batch_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let policy = FetchPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.rate_limit_cooldown, Duration::from_secs(300));
        assert_eq!(policy.network_retry_delay, Duration::from_secs(10));
        assert_eq!(policy.pacing_delay, Duration::from_millis(200));
        assert_eq!(policy.large_batch_threshold, 100);
    }

    #[test]
    fn test_builder() {
        let policy = FetchPolicy::default()
            .with_max_attempts(5)
            .with_rate_limit_cooldown(Duration::from_secs(60))
            .with_pacing_delay(Duration::ZERO);

        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.rate_limit_cooldown, Duration::from_secs(60));
        assert_eq!(policy.pacing_delay, Duration::ZERO);
    }

    #[test]
    fn test_max_attempts_never_zero() {
        assert_eq!(FetchPolicy::default().with_max_attempts(0).max_attempts, 1);
    }
}
