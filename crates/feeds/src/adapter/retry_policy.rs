//! Bounded exponential backoff.

use std::time::Duration;

/// Default attempts per endpoint.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry.
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Default ceiling for any single delay.
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(8);

/// Retry budget applied to each endpoint independently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per endpoint, including the first. Zero behaves as one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Growth factor between consecutive delays.
    pub multiplier: u32,
    /// Ceiling for any single delay, including server-requested ones.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            multiplier: 2,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay after the `failed_attempts`-th consecutive failure (1-based).
    ///
    /// `base_delay * multiplier^(failed_attempts - 1)`, raised to
    /// `server_hint` when the server asked for longer, and capped at
    /// `max_delay`.
    pub fn delay_for(&self, failed_attempts: u32, server_hint: Option<Duration>) -> Duration {
        let exponent = failed_attempts.saturating_sub(1);
        let factor = self.multiplier.max(1).checked_pow(exponent).unwrap_or(u32::MAX);
        let backoff = self
            .base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay);

        let delay = match server_hint {
            Some(hint) if hint > backoff => hint,
            _ => backoff,
        };
        delay.min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_growth() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            multiplier: 2,
            max_delay: Duration::from_secs(30),
        };
        assert_eq!(policy.delay_for(1, None), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2, None), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3, None), Duration::from_millis(400));
        assert_eq!(policy.delay_for(4, None), Duration::from_millis(800));
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(20, None), DEFAULT_MAX_DELAY);
        assert_eq!(policy.delay_for(u32::MAX, None), DEFAULT_MAX_DELAY);
    }

    #[test]
    fn test_server_hint_only_lengthens() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.delay_for(1, Some(Duration::from_secs(2))),
            Duration::from_secs(2)
        );
        assert_eq!(
            policy.delay_for(1, Some(Duration::from_millis(10))),
            DEFAULT_BASE_DELAY
        );
        assert_eq!(
            policy.delay_for(1, Some(Duration::from_secs(3600))),
            DEFAULT_MAX_DELAY
        );
    }

    #[test]
    fn test_zero_attempts_behaves_as_one() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.attempts(), 1);
    }
}
