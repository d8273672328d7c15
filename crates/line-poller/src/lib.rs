//! Live Dashboard Polling
//!
//! A [`PollingSession`] owns the three dashboard timers (telemetry poll,
//! balance poll, alert continuation) and the alert state they drive. Start
//! it when the dashboard becomes active, stop it when it goes away.

mod config;
mod error;
mod session;
mod view;

pub use config::PollerConfig;
pub use error::SessionError;
pub use session::PollingSession;
pub use view::{DashboardView, Feed, PollError};
