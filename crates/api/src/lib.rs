//! Andon Dashboard Service
//!
//! Runs the polling session against the Andon backend and exposes the live
//! dashboard, alert actions and the supervisor directory as a local REST API.

use alerting::LogSink;
use andon_protocol::AndonClient;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use line_poller::PollingSession;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use supervisors::Directory;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub mod config;
mod error;
mod routes;

pub use config::Settings;
pub use error::{AppError, ErrorBody};

/// Application state shared across handlers
pub struct AppState {
    /// Live polling session
    pub session: PollingSession,
    /// Supervisor directory with its pending confirmations
    pub directory: Directory,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
    /// Balance above this is reported healthy
    pub balance_threshold: f64,
    /// Prometheus exposition, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create new application state
    pub fn new(
        session: PollingSession,
        directory: Directory,
        balance_threshold: f64,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            session,
            directory,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
            balance_threshold,
            metrics,
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub session: SessionHealth,
}

/// Polling session status
#[derive(Debug, Serialize)]
pub struct SessionHealth {
    pub running: bool,
    pub loading: bool,
    pub lines: usize,
    pub telemetry_ok: bool,
    pub balance_ok: bool,
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/lines", get(routes::lines::get_lines))
        .route("/api/v1/balance", get(routes::lines::get_balance))
        .route("/api/v1/alert", get(routes::alerts::get_alert))
        .route("/api/v1/alert/confirm", post(routes::alerts::confirm_alert))
        .route("/api/v1/alert/dismiss", post(routes::alerts::dismiss_alert))
        .route(
            "/api/v1/supervisors",
            get(routes::supervisors::list_supervisors).post(routes::supervisors::create_supervisor),
        )
        .route(
            "/api/v1/supervisors/:id",
            put(routes::supervisors::update_supervisor).delete(routes::supervisors::delete_supervisor),
        )
        .route(
            "/api/v1/pending/:id/confirm",
            post(routes::supervisors::confirm_pending),
        )
        .route("/api/v1/pending/:id", delete(routes::supervisors::cancel_pending))
        .route("/api/v1/lines/assignments", get(routes::lines::get_assignments))
        .route("/api/v1/lines/assignments/:name", put(routes::lines::put_assignment))
        .route("/metrics", get(metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let view = state.session.view();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let telemetry_ok = view.telemetry_error.is_none();
    let balance_ok = view.balance_error.is_none();
    let status = if view.running && telemetry_ok && balance_ok {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        session: SessionHealth {
            running: view.running,
            loading: view.loading,
            lines: view.records.len(),
            telemetry_ok,
            balance_ok,
        },
    })
}

/// Prometheus text exposition
async fn metrics_handler(State(state): State<SharedState>) -> Response {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => AppError::NotFound("metrics recorder").into_response(),
    }
}

/// Initialize logging. `RUST_LOG` overrides the default `info` level.
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("failed to set tracing subscriber: {e}"))
}

/// Start the session, serve until Ctrl-C, then stop the session
pub async fn run_server(settings: Settings, metrics: Option<PrometheusHandle>) -> anyhow::Result<()> {
    let client = Arc::new(AndonClient::new(&settings.api)?);
    info!("Using Andon backend at {}", client.base_url());

    let session = PollingSession::start(
        client.clone(),
        LogSink::new(),
        &settings.poller,
        &settings.alerting,
    );
    let directory = Directory::new(client);
    let state = Arc::new(AppState::new(
        session,
        directory,
        settings.dashboard.balance_healthy_threshold,
        metrics,
    ));
    let app = create_router(state.clone());

    info!("Starting API server on {}", settings.server.bind);

    let listener = tokio::net::TcpListener::bind(&settings.server.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.session.stop().await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
