use std::thread;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

const CANCEL_POLL: Duration = Duration::from_millis(50);

/// Bounded per-item retry with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; 0 is treated as 1.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay before 1-based `attempt`: zero for the first, then backoff, 2x, 4x...
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(attempt - 2).unwrap_or(u32::MAX);
        self.backoff.saturating_mul(factor)
    }

    /// Sleeps before `attempt`; returns false if the token was cancelled meanwhile.
    pub fn wait(&self, attempt: u32, token: &CancellationToken) -> bool {
        let deadline = Instant::now() + self.delay_before(attempt);
        loop {
            if token.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep((deadline - now).min(CANCEL_POLL));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use super::RetryPolicy;

    #[test]
    fn backoff_doubles_after_second_attempt() {
        let policy = RetryPolicy {
            max_attempts: 4,
            backoff: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_before(1), Duration::ZERO);
        assert_eq!(policy.delay_before(2), Duration::from_millis(100));
        assert_eq!(policy.delay_before(3), Duration::from_millis(200));
        assert_eq!(policy.delay_before(4), Duration::from_millis(400));
    }

    #[test]
    fn zero_attempts_still_runs_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.attempts(), 1);
    }

    #[test]
    fn wait_aborts_when_cancelled() {
        let policy = RetryPolicy {
            max_attempts: 2,
            backoff: Duration::from_secs(60),
        };
        let token = CancellationToken::new();
        token.cancel();
        assert!(!policy.wait(2, &token));
    }
}
