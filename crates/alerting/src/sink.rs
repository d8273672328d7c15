//! Notification output port

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Tactile pattern played on the operator's device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VibrationPattern {
    /// Pulse length (ms)
    pub on_ms: u64,
    /// Pause length (ms)
    pub off_ms: u64,
    /// Loop until stopped
    pub repeat: bool,
}

impl Default for VibrationPattern {
    fn default() -> Self {
        Self {
            on_ms: 500,
            off_ms: 500,
            repeat: true,
        }
    }
}

/// Where alert notifications go.
///
/// The notifier guarantees `start` and `stop` alternate: never two starts
/// in a row, never a stop without a start.
pub trait NotificationSink: Send {
    /// Begin the repeating notification
    fn start(&mut self, pattern: &VibrationPattern);

    /// Cancel it
    fn stop(&mut self);

    /// Called on every continuation tick while the alert is still backed by
    /// live data. Devices whose pattern loop can lapse re-assert it here.
    fn repeat(&mut self, _pattern: &VibrationPattern) {}
}

impl<S: NotificationSink + ?Sized> NotificationSink for Box<S> {
    fn start(&mut self, pattern: &VibrationPattern) {
        (**self).start(pattern)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn repeat(&mut self, pattern: &VibrationPattern) {
        (**self).repeat(pattern)
    }
}

/// Sink for headless deployments: the notification is a log line and the
/// UI picks the alert up from the published dashboard state.
#[derive(Debug, Default)]
pub struct LogSink {
    active: bool,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl NotificationSink for LogSink {
    fn start(&mut self, pattern: &VibrationPattern) {
        self.active = true;
        warn!(
            on_ms = pattern.on_ms,
            off_ms = pattern.off_ms,
            "Operator notification started"
        );
    }

    fn stop(&mut self) {
        self.active = false;
        info!("Operator notification stopped");
    }
}
