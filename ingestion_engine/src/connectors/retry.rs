// @file: ingestion_engine/src/connectors/retry.rs
// @description: Exponential backoff schedule for transient fetch failures.
// @author: LAS.

use tokio::time::Duration;


//
// CONSTANTS
//

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);


//
// POLICY
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl BackoffPolicy {
    /// Delay to wait after the given failed attempt (1-based), or None once
    /// the attempt cap is reached.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.max_attempts {
            return None;
        }

        // 2^(attempt-1), saturating so large caps cannot overflow
        let factor: u32 = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        let delay: Duration = self.base_delay.saturating_mul(factor);
        Some(delay.min(self.max_delay))
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        BackoffPolicy {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}
