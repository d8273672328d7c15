//! Supervisor Routes
//!
//! Create, update and delete only stage the change and answer `202` with a
//! pending id and the question to ask; the change is sent upstream by
//! `POST /pending/{id}/confirm`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use supervisors::{Completed, PendingAction, PendingId, SupervisorForm};

use andon_protocol::Supervisor;

use super::SearchQuery;
use crate::error::AppError;
use crate::SharedState;

/// Response for the supervisor list
#[derive(Debug, Serialize)]
pub struct SupervisorsResponse {
    pub data: Vec<Supervisor>,
    pub count: usize,
}

/// A staged change awaiting confirmation
#[derive(Debug, Serialize)]
pub struct PendingResponse {
    pub pending_id: PendingId,
    pub prompt: &'static str,
    pub action: PendingAction,
}

/// List supervisors, filtered by name
pub async fn list_supervisors(
    State(state): State<SharedState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SupervisorsResponse>, AppError> {
    let data = state.directory.supervisors(&params.search).await?;
    Ok(Json(SupervisorsResponse {
        count: data.len(),
        data,
    }))
}

/// Validate and stage a new supervisor
pub async fn create_supervisor(
    State(state): State<SharedState>,
    Json(form): Json<SupervisorForm>,
) -> Result<(StatusCode, Json<PendingResponse>), AppError> {
    let id = state.directory.stage_create(&form)?;
    staged(&state, id)
}

/// Validate and stage an update
pub async fn update_supervisor(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(form): Json<SupervisorForm>,
) -> Result<(StatusCode, Json<PendingResponse>), AppError> {
    let pending = state.directory.stage_update(&id, &form)?;
    staged(&state, pending)
}

/// Stage a deletion
pub async fn delete_supervisor(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<PendingResponse>), AppError> {
    let pending = state.directory.stage_delete(&id);
    staged(&state, pending)
}

/// Execute a staged change
pub async fn confirm_pending(
    State(state): State<SharedState>,
    Path(id): Path<PendingId>,
) -> Result<Json<Completed>, AppError> {
    Ok(Json(state.directory.confirm(id).await?))
}

/// Drop a staged change
pub async fn cancel_pending(
    State(state): State<SharedState>,
    Path(id): Path<PendingId>,
) -> Result<StatusCode, AppError> {
    state.directory.cancel(id)?;
    Ok(StatusCode::NO_CONTENT)
}

fn staged(
    state: &SharedState,
    pending_id: PendingId,
) -> Result<(StatusCode, Json<PendingResponse>), AppError> {
    let action = state
        .directory
        .pending(pending_id)
        .ok_or(AppError::NotFound("pending action"))?;
    Ok((
        StatusCode::ACCEPTED,
        Json(PendingResponse {
            pending_id,
            prompt: action.prompt(),
            action,
        }),
    ))
}
