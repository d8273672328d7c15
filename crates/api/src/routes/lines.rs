//! Line Routes

use andon_protocol::{filter_by_name, BalanceReport, LineAssignment, Shift, TelemetryRecord};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use line_poller::PollError;
use serde::{Deserialize, Serialize};

use super::SearchQuery;
use crate::error::AppError;
use crate::SharedState;

/// Response for the live lines endpoint
#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub data: Vec<TelemetryRecord>,
    pub meta: LinesMeta,
    /// Last telemetry failure, if the latest poll failed
    pub error: Option<PollError>,
}

#[derive(Debug, Serialize)]
pub struct LinesMeta {
    pub count: usize,
    pub total: usize,
    pub loading: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Response for the balance endpoint
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: Option<f64>,
    /// Above the configured threshold; `None` before the first reading
    pub healthy: Option<bool>,
    pub threshold: f64,
    pub updated_at: Option<DateTime<Utc>>,
    pub error: Option<PollError>,
}

/// Response for the shift assignment list
#[derive(Debug, Serialize)]
pub struct AssignmentsResponse {
    pub data: Vec<LineAssignment>,
    pub count: usize,
}

/// Body of a shift change
#[derive(Debug, Deserialize)]
pub struct ShiftChange {
    pub post: Shift,
}

/// Get the latest telemetry snapshot, filtered by line name
pub async fn get_lines(
    State(state): State<SharedState>,
    Query(params): Query<SearchQuery>,
) -> Json<LinesResponse> {
    let view = state.session.view();
    let data: Vec<TelemetryRecord> = filter_by_name(&view.records, &params.search)
        .into_iter()
        .cloned()
        .collect();

    Json(LinesResponse {
        meta: LinesMeta {
            count: data.len(),
            total: view.records.len(),
            loading: view.loading,
            updated_at: view.telemetry_updated_at,
        },
        data,
        error: view.telemetry_error,
    })
}

/// Get the last balance reading
pub async fn get_balance(State(state): State<SharedState>) -> Json<BalanceResponse> {
    let view = state.session.view();
    let threshold = state.balance_threshold;

    Json(BalanceResponse {
        balance: view.balance,
        healthy: view
            .balance
            .map(|balance| BalanceReport::is_healthy(balance, threshold)),
        threshold,
        updated_at: view.balance_updated_at,
        error: view.balance_error,
    })
}

/// List line to shift assignments
pub async fn get_assignments(
    State(state): State<SharedState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<AssignmentsResponse>, AppError> {
    let data = state.directory.assignments(&params.search).await?;
    Ok(Json(AssignmentsResponse {
        count: data.len(),
        data,
    }))
}

/// Move a line to another shift
pub async fn put_assignment(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    Json(change): Json<ShiftChange>,
) -> Result<Json<LineAssignment>, AppError> {
    state.directory.change_shift(&name, change.post).await?;
    Ok(Json(LineAssignment {
        name,
        post: Some(change.post.to_string()),
    }))
}
