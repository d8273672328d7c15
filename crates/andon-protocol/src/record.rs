//! Per-Line Telemetry Records and Alarm Channels
//!
//! One [`TelemetryRecord`] per production line, recreated on every poll of
//! `/latest-data`. Each record carries four alarm channels; a channel is
//! active whenever its flag is anything other than `"0"`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::wire::{inactive, lenient_string, INACTIVE};

/// Alarm categories, in scan priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    #[serde(rename = "Qualité")]
    Quality,
    #[serde(rename = "Prüftechnik")]
    Inspection,
    #[serde(rename = "Logistique")]
    Logistics,
    #[serde(rename = "Maintenance")]
    Maintenance,
}

impl AlertKind {
    /// All kinds, highest priority first
    pub const PRIORITY: [AlertKind; 4] = [
        AlertKind::Quality,
        AlertKind::Inspection,
        AlertKind::Logistics,
        AlertKind::Maintenance,
    ];

    /// Label shown on the shop floor (and used as the supervisor `type`)
    pub fn label(&self) -> &'static str {
        match self {
            AlertKind::Quality => "Qualité",
            AlertKind::Inspection => "Prüftechnik",
            AlertKind::Logistics => "Logistique",
            AlertKind::Maintenance => "Maintenance",
        }
    }

    /// Stable ASCII identifier for logs and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Quality => "quality",
            AlertKind::Inspection => "inspection",
            AlertKind::Logistics => "logistics",
            AlertKind::Maintenance => "maintenance",
        }
    }

    /// Wire name of the flag field for this channel
    pub fn flag_field(&self) -> &'static str {
        match self {
            AlertKind::Quality => "AQ",
            AlertKind::Inspection => "APU",
            AlertKind::Logistics => "AL",
            AlertKind::Maintenance => "AM",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AlertKind {
    type Err = String;

    /// Accepts the shop-floor label or the ASCII identifier, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AlertKind::PRIORITY
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(s) || k.as_str().eq_ignore_ascii_case(s))
            .or_else(|| {
                // "Prüftechnik" has a non-ASCII char, so compare it fully lowercased
                let lower = s.to_lowercase();
                AlertKind::PRIORITY
                    .into_iter()
                    .find(|k| k.label().to_lowercase() == lower)
            })
            .ok_or_else(|| format!("unknown alert kind: {s:?}"))
    }
}

/// One alarm channel of a record, borrowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmChannel<'a> {
    pub kind: AlertKind,
    /// Raw flag; `"0"` means inactive
    pub flag: &'a str,
    /// Elapsed time since the alarm was raised, as reported
    pub elapsed: &'a str,
    /// How many times the alarm fired this shift, as reported
    pub frequency: &'a str,
}

impl AlarmChannel<'_> {
    pub fn is_active(&self) -> bool {
        self.flag != INACTIVE
    }
}

/// Telemetry for one production line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Line name, the only identity that survives between polls
    pub name: String,
    /// Active shift (A/B/C)
    #[serde(default, deserialize_with = "crate::wire::lenient_opt_string")]
    pub post: Option<String>,

    #[serde(rename = "AQ", default = "inactive", deserialize_with = "lenient_string")]
    pub quality_flag: String,
    #[serde(rename = "TQ", default = "inactive", deserialize_with = "lenient_string")]
    pub quality_elapsed: String,
    #[serde(rename = "FQ", default = "inactive", deserialize_with = "lenient_string")]
    pub quality_frequency: String,

    #[serde(rename = "APU", default = "inactive", deserialize_with = "lenient_string")]
    pub inspection_flag: String,
    #[serde(rename = "TPU", default = "inactive", deserialize_with = "lenient_string")]
    pub inspection_elapsed: String,
    #[serde(rename = "FPU", default = "inactive", deserialize_with = "lenient_string")]
    pub inspection_frequency: String,

    #[serde(rename = "AL", default = "inactive", deserialize_with = "lenient_string")]
    pub logistics_flag: String,
    #[serde(rename = "TL", default = "inactive", deserialize_with = "lenient_string")]
    pub logistics_elapsed: String,
    #[serde(rename = "FL", default = "inactive", deserialize_with = "lenient_string")]
    pub logistics_frequency: String,

    #[serde(rename = "AM", default = "inactive", deserialize_with = "lenient_string")]
    pub maintenance_flag: String,
    #[serde(rename = "TM", default = "inactive", deserialize_with = "lenient_string")]
    pub maintenance_elapsed: String,
    #[serde(rename = "FM", default = "inactive", deserialize_with = "lenient_string")]
    pub maintenance_frequency: String,
}

impl TelemetryRecord {
    /// Create a record with every channel inactive
    pub fn idle(name: impl Into<String>, post: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            post: Some(post.into()),
            quality_flag: inactive(),
            quality_elapsed: inactive(),
            quality_frequency: inactive(),
            inspection_flag: inactive(),
            inspection_elapsed: inactive(),
            inspection_frequency: inactive(),
            logistics_flag: inactive(),
            logistics_elapsed: inactive(),
            logistics_frequency: inactive(),
            maintenance_flag: inactive(),
            maintenance_elapsed: inactive(),
            maintenance_frequency: inactive(),
        }
    }

    /// Builder-style flag setter, mostly for tests and fixtures
    pub fn with_flag(mut self, kind: AlertKind, flag: impl Into<String>) -> Self {
        let flag = flag.into();
        match kind {
            AlertKind::Quality => self.quality_flag = flag,
            AlertKind::Inspection => self.inspection_flag = flag,
            AlertKind::Logistics => self.logistics_flag = flag,
            AlertKind::Maintenance => self.maintenance_flag = flag,
        }
        self
    }

    /// Shift, or an empty string when the backend omitted it
    pub fn shift(&self) -> &str {
        self.post.as_deref().unwrap_or("")
    }

    /// Borrow one alarm channel
    pub fn channel(&self, kind: AlertKind) -> AlarmChannel<'_> {
        let (flag, elapsed, frequency) = match kind {
            AlertKind::Quality => (&self.quality_flag, &self.quality_elapsed, &self.quality_frequency),
            AlertKind::Inspection => (
                &self.inspection_flag,
                &self.inspection_elapsed,
                &self.inspection_frequency,
            ),
            AlertKind::Logistics => (
                &self.logistics_flag,
                &self.logistics_elapsed,
                &self.logistics_frequency,
            ),
            AlertKind::Maintenance => (
                &self.maintenance_flag,
                &self.maintenance_elapsed,
                &self.maintenance_frequency,
            ),
        };
        AlarmChannel {
            kind,
            flag,
            elapsed,
            frequency,
        }
    }

    /// All four channels in priority order
    pub fn channels(&self) -> impl Iterator<Item = AlarmChannel<'_>> {
        AlertKind::PRIORITY.into_iter().map(move |k| self.channel(k))
    }

    pub fn is_active(&self, kind: AlertKind) -> bool {
        self.channel(kind).is_active()
    }
}
