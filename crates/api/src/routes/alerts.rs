//! Alert Routes

use alerting::{CurrentAlert, NotifierState};
use andon_protocol::AlertKind;
use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppError;
use crate::SharedState;

/// Notifier state plus this session's confirmations
#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub state: NotifierState,
    pub confirmed: Vec<AlertKind>,
}

/// Result of a confirm or dismiss request
#[derive(Debug, Serialize)]
pub struct AlertActionResponse {
    /// The alert acted on; `None` when nothing was alerting
    pub alert: Option<CurrentAlert>,
    pub state: NotifierState,
}

/// Get the current alert
pub async fn get_alert(State(state): State<SharedState>) -> Json<AlertResponse> {
    let view = state.session.view();
    Json(AlertResponse {
        state: view.alert,
        confirmed: view.confirmed,
    })
}

/// Confirm the alert on display
pub async fn confirm_alert(
    State(state): State<SharedState>,
) -> Result<Json<AlertActionResponse>, AppError> {
    let alert = state.session.confirm().await?;
    Ok(Json(AlertActionResponse {
        alert,
        state: state.session.view().alert,
    }))
}

/// Dismiss the alert on display without confirming it
pub async fn dismiss_alert(
    State(state): State<SharedState>,
) -> Result<Json<AlertActionResponse>, AppError> {
    let alert = state.session.dismiss().await?;
    Ok(Json(AlertActionResponse {
        alert,
        state: state.session.view().alert,
    }))
}
