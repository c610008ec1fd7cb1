//! Poller configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How job status is polled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Fixed delay between status queries (milliseconds).
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    /// Maximum number of status queries before giving up (0 = unlimited).
    /// The default gives a job about half an hour at the default interval.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_interval() -> u64 {
    5000 // 5 seconds
}

fn default_max_attempts() -> u32 {
    360
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// `None` when polling is unbounded.
    pub fn attempt_limit(&self) -> Option<u32> {
        (self.max_attempts > 0).then_some(self.max_attempts)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PollingConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(5));
        assert_eq!(config.attempt_limit(), Some(360));
    }

    #[test]
    fn test_zero_attempts_is_unbounded() {
        let toml = r#"
            max_attempts = 0
        "#;
        let config: PollingConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.interval_ms, 5000);
        assert_eq!(config.attempt_limit(), None);
    }
}
