// Poll backoff
use super::constants::{DEFAULT_INITIAL_POLL_DELAY, MAX_POLL_DELAY, POLL_BACKOFF_FACTOR};
use crate::error::{ListingError, Result};
use serde::Deserialize;
use std::time::Duration;

/// Poll pacing settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PollConfig {
    /// Delay before the first poll, in seconds
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,
    /// Cap for the doubling delay, in seconds
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

fn default_initial_delay_secs() -> u64 {
    DEFAULT_INITIAL_POLL_DELAY.as_secs()
}

fn default_max_delay_secs() -> u64 {
    MAX_POLL_DELAY.as_secs()
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: default_initial_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

impl PollConfig {
    /// Reject zero delays and an initial delay above the cap
    pub fn validate(&self) -> Result<()> {
        if self.initial_delay_secs == 0 {
            return Err(ListingError::Config(
                "poll.initial_delay_secs must be > 0".to_string(),
            ));
        }
        if self.max_delay_secs < self.initial_delay_secs {
            return Err(ListingError::Config(format!(
                "poll.max_delay_secs ({}) must be >= poll.initial_delay_secs ({})",
                self.max_delay_secs, self.initial_delay_secs
            )));
        }
        Ok(())
    }

    pub fn backoff(&self) -> PollBackoff {
        PollBackoff::new(
            Duration::from_secs(self.initial_delay_secs),
            Duration::from_secs(self.max_delay_secs),
        )
    }
}

/// Doubling delay between polls, capped at a maximum
///
/// Each call to [`PollBackoff::next_delay`] hands out the delay for the poll
/// being scheduled now and doubles the one after it: 1, 2, 4, 4, 4, ...
#[derive(Debug, Clone)]
pub struct PollBackoff {
    next: Duration,
    max: Duration,
}

impl PollBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            next: initial.min(max),
            max,
        }
    }

    /// Delay the upcoming poll will wait, without advancing
    pub fn peek(&self) -> Duration {
        self.next
    }

    pub fn next_delay(&mut self) -> Duration {
        let current = self.next;
        self.next = current
            .checked_mul(POLL_BACKOFF_FACTOR)
            .map_or(self.max, |doubled| doubled.min(self.max));
        current
    }
}

impl Default for PollBackoff {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_POLL_DELAY, MAX_POLL_DELAY)
    }
}

impl Iterator for PollBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.next_delay())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|s| Duration::from_secs(*s)).collect()
    }

    #[test]
    fn test_default_sequence_doubles_then_caps() {
        let delays: Vec<Duration> = PollBackoff::default().take(6).collect();
        assert_eq!(delays, secs(&[1, 2, 4, 4, 4, 4]));
    }

    #[test]
    fn test_sequence_never_exceeds_cap() {
        let max = Duration::from_secs(4);
        assert!(PollBackoff::default().take(100).all(|d| d <= max));
    }

    #[test]
    fn test_peek_does_not_advance() {
        let mut backoff = PollBackoff::default();
        assert_eq!(backoff.peek(), Duration::from_secs(1));
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
        assert_eq!(backoff.peek(), Duration::from_secs(2));
    }

    #[test]
    fn test_initial_above_cap_is_clamped() {
        let delays: Vec<Duration> =
            PollBackoff::new(Duration::from_secs(10), Duration::from_secs(3))
                .take(2)
                .collect();
        assert_eq!(delays, secs(&[3, 3]));
    }

    #[test]
    fn test_config_validation() {
        tokio_test::assert_ok!(PollConfig::default().validate());

        let zero = PollConfig {
            initial_delay_secs: 0,
            max_delay_secs: 4,
        };
        tokio_test::assert_err!(zero.validate());

        let inverted = PollConfig {
            initial_delay_secs: 5,
            max_delay_secs: 2,
        };
        let err = inverted.validate().unwrap_err();
        assert!(err.to_string().contains("max_delay_secs"));
    }

    #[test]
    fn test_config_backoff_uses_configured_values() {
        let config = PollConfig {
            initial_delay_secs: 2,
            max_delay_secs: 10,
        };
        let delays: Vec<Duration> = config.backoff().take(4).collect();
        assert_eq!(delays, secs(&[2, 4, 8, 10]));
    }
}
