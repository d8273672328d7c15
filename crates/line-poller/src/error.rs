//! Session Error Types

use thiserror::Error;

/// Errors returned by [`PollingSession`](crate::PollingSession) operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The session was stopped or its task has exited
    #[error("Polling session is not running")]
    NotRunning,
}
