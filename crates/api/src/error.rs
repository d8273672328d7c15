//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use line_poller::SessionError;
use serde::Serialize;
use std::collections::BTreeMap;
use supervisors::DirectoryError;
use thiserror::Error;

/// Errors a handler can return
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("{0} not found")]
    NotFound(&'static str),
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    /// Per-field validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<&'static str, String>>,
    /// Upstream answered but with something unusable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_error: Option<bool>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Directory(DirectoryError::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Directory(DirectoryError::UnknownPending(_)) => StatusCode::NOT_FOUND,
            AppError::Directory(DirectoryError::Api(_)) => StatusCode::BAD_GATEWAY,
            AppError::Session(SessionError::NotRunning) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("Request failed with {}: {}", status, self);
        }

        let body = ErrorBody {
            error: self.to_string(),
            fields: match &self {
                AppError::Directory(DirectoryError::Invalid(errors)) => Some(errors.by_field()),
                _ => None,
            },
            server_error: match &self {
                AppError::Directory(DirectoryError::Api(err)) => Some(err.is_server_error()),
                _ => None,
            },
        };
        (status, Json(body)).into_response()
    }
}
