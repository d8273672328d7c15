//! Poller configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shortest interval accepted for any timer
pub(crate) const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for the polling timers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Telemetry poll interval (ms)
    pub telemetry_interval_ms: u64,
    /// Balance poll interval (ms)
    pub balance_interval_ms: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            telemetry_interval_ms: 2000,
            balance_interval_ms: 5000,
        }
    }
}

impl PollerConfig {
    pub fn telemetry_interval(&self) -> Duration {
        Duration::from_millis(self.telemetry_interval_ms).max(MIN_INTERVAL)
    }

    pub fn balance_interval(&self) -> Duration {
        Duration::from_millis(self.balance_interval_ms).max(MIN_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PollerConfig::default();
        assert_eq!(config.telemetry_interval(), Duration::from_secs(2));
        assert_eq!(config.balance_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_interval_clamped() {
        let config = PollerConfig {
            telemetry_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.telemetry_interval(), MIN_INTERVAL);
    }
}
