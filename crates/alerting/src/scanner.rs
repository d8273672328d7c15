//! Alert Scanner
//!
//! Picks the single alert to surface from a telemetry snapshot.

use andon_protocol::{AlertKind, TelemetryRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ledger::ConfirmationLedger;

/// The one alert currently surfaced to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAlert {
    /// Line the alarm was first seen on
    pub line: String,
    /// Shift of that line at the time
    pub shift: String,
    pub kind: AlertKind,
}

impl fmt::Display for CurrentAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {} (shift {})", self.kind, self.line, self.shift)
    }
}

/// Scans snapshots in record order, channels in [`AlertKind::PRIORITY`] order
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertScanner;

impl AlertScanner {
    pub fn new() -> Self {
        Self
    }

    /// First active channel whose kind is neither confirmed nor the one
    /// already on display.
    pub fn scan(
        &self,
        records: &[TelemetryRecord],
        ledger: &ConfirmationLedger,
        displayed: Option<AlertKind>,
    ) -> Option<CurrentAlert> {
        records.iter().find_map(|record| {
            record
                .channels()
                .find(|ch| ch.is_active() && Some(ch.kind) != displayed && !ledger.contains(ch.kind))
                .map(|ch| CurrentAlert {
                    line: record.name.clone(),
                    shift: record.shift().to_string(),
                    kind: ch.kind,
                })
        })
    }

    /// Whether any line still has this kind of alarm raised
    pub fn still_active(&self, records: &[TelemetryRecord], kind: AlertKind) -> bool {
        records.iter().any(|r| r.is_active(kind))
    }
}
