//! Published dashboard state

use alerting::NotifierState;
use andon_protocol::{AlertKind, ApiError, TelemetryRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The two polled feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    Telemetry,
    Balance,
}

impl Feed {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feed::Telemetry => "telemetry",
            Feed::Balance => "balance",
        }
    }
}

/// Last failure of a feed, kept until its next successful poll
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollError {
    pub feed: Feed,
    /// Server reachable but its answer unusable, as opposed to a
    /// connectivity failure
    pub server_error: bool,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl PollError {
    pub fn new(feed: Feed, err: &ApiError) -> Self {
        Self {
            feed,
            server_error: err.is_server_error(),
            message: err.to_string(),
            at: Utc::now(),
        }
    }
}

/// Everything the dashboard screen renders
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardView {
    /// Session timers are running
    pub running: bool,
    /// No poll has completed yet
    pub loading: bool,
    /// Latest telemetry snapshot; kept as-is when a poll fails
    pub records: Vec<TelemetryRecord>,
    pub balance: Option<f64>,
    pub telemetry_updated_at: Option<DateTime<Utc>>,
    pub balance_updated_at: Option<DateTime<Utc>>,
    pub telemetry_error: Option<PollError>,
    pub balance_error: Option<PollError>,
    pub alert: NotifierState,
    /// Kinds confirmed this session
    pub confirmed: Vec<AlertKind>,
}

impl DashboardView {
    pub(crate) fn starting() -> Self {
        Self {
            running: true,
            loading: true,
            ..Default::default()
        }
    }
}
