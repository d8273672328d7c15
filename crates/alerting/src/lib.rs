//! Andon Alerting
//!
//! Turns telemetry snapshots into at most one active alert, drives the
//! repeating operator notification while it lasts, and remembers which
//! alert kinds were already confirmed this session.
//!
//! ```text
//! snapshot ──▶ AlertScanner ──▶ AlertNotifier ──▶ NotificationSink
//!                   ▲                 │
//!                   └── ConfirmationLedger ◀── confirm()
//! ```

mod config;
mod ledger;
mod notifier;
mod scanner;
mod sink;

pub use config::AlertConfig;
pub use ledger::ConfirmationLedger;
pub use notifier::{AlertNotifier, NotifierState, Transition};
pub use scanner::{AlertScanner, CurrentAlert};
pub use sink::{LogSink, NotificationSink, VibrationPattern};
