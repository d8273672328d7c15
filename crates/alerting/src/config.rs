//! Alerting configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::sink::VibrationPattern;

/// Alert configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// How often an active alert is re-checked and its notification re-fired (ms)
    pub continuation_interval_ms: u64,
    /// Vibration pulse length (ms)
    pub vibrate_on_ms: u64,
    /// Pause between pulses (ms)
    pub vibrate_off_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            continuation_interval_ms: 2000,
            vibrate_on_ms: 500,
            vibrate_off_ms: 500,
        }
    }
}

impl AlertConfig {
    pub fn continuation_interval(&self) -> Duration {
        Duration::from_millis(self.continuation_interval_ms)
    }

    /// Repeating pattern played while an alert is active
    pub fn pattern(&self) -> VibrationPattern {
        VibrationPattern {
            on_ms: self.vibrate_on_ms,
            off_ms: self.vibrate_off_ms,
            repeat: true,
        }
    }
}
