//! Andon Line-Alert Protocol
//!
//! Wire model and async HTTP client for the Andon dashboard API: live
//! per-line telemetry, the balance feed, supervisor records and line shift
//! assignments.

mod client;
mod error;
mod record;
mod search;
mod source;
mod supervisor;
mod wire;

pub use client::{AndonClient, ClientConfig};
pub use error::ApiError;
pub use record::{AlarmChannel, AlertKind, TelemetryRecord};
pub use search::{filter_by_name, Named};
pub use source::{DashboardSource, SourceFuture};
pub use supervisor::{BalanceReport, LineAssignment, Shift, Supervisor};

/// Remote API paths
pub mod endpoint {
    /// Supervisor collection
    pub const USERS: &str = "users";
    /// Line/shift assignments
    pub const TEST_DATA: &str = "test-data";
    /// Shift update for a single line
    pub const UPDATE_POST: &str = "update-post";
    /// Balance feed
    pub const GET_BALANCE: &str = "get-balance";
    /// Telemetry snapshot feed
    pub const LATEST_DATA: &str = "latest-data";
}
