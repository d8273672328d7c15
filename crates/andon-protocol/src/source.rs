//! Feed abstraction used by the polling session

use std::future::Future;
use std::pin::Pin;

use crate::error::ApiError;
use crate::record::TelemetryRecord;

/// Boxed future returned by [`DashboardSource`] methods
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// The two feeds a live dashboard polls.
///
/// [`AndonClient`](crate::AndonClient) is the production implementation;
/// tests plug in scripted sources.
pub trait DashboardSource: Send + Sync {
    /// Latest telemetry snapshot, one record per line
    fn latest_data(&self) -> SourceFuture<'_, Vec<TelemetryRecord>>;

    /// Current balance
    fn balance(&self) -> SourceFuture<'_, f64>;
}
