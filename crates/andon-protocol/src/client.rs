//! Andon API Client
//!
//! Async JSON-over-HTTP client for every endpoint the dashboard uses.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::endpoint;
use crate::error::ApiError;
use crate::record::TelemetryRecord;
use crate::source::{DashboardSource, SourceFuture};
use crate::supervisor::{BalanceReport, LineAssignment, Shift, Supervisor};

/// Default deployment of the Andon backend
const DEFAULT_BASE_URL: &str = "https://andonapi.c2i.tn";

/// Default timeout for a single request
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Maximum number of body characters kept when the server sends non-JSON
const BODY_PREVIEW_CHARS: usize = 200;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the Andon backend
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// HTTP client for the Andon backend
#[derive(Debug, Clone)]
pub struct AndonClient {
    http: Client,
    base: Url,
}

impl AndonClient {
    /// Create a new client
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }

        let http = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        info!("Creating Andon client for {}", base);
        Ok(Self { http, base })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Fetch the latest telemetry snapshot
    pub async fn fetch_latest_data(&self) -> Result<Vec<TelemetryRecord>, ApiError> {
        let url = self.url(&[endpoint::LATEST_DATA])?;
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    /// Fetch the balance; a non-"ok" code is an error
    pub async fn fetch_balance(&self) -> Result<f64, ApiError> {
        let url = self.url(&[endpoint::GET_BALANCE])?;
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        let report: BalanceReport = read_json(response).await?;
        report
            .value()
            .ok_or_else(|| ApiError::InvalidBalance(report.code.clone()))
    }

    /// List all supervisors
    pub async fn list_supervisors(&self) -> Result<Vec<Supervisor>, ApiError> {
        let url = self.url(&[endpoint::USERS])?;
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    /// Create a supervisor and return the stored record
    pub async fn create_supervisor(&self, supervisor: &Supervisor) -> Result<Supervisor, ApiError> {
        let url = self.url(&[endpoint::USERS])?;
        info!("Creating supervisor {:?}", supervisor.name);
        let response = self.http.post(url).json(supervisor).send().await?;
        read_json(response).await
    }

    /// Replace a supervisor record
    pub async fn update_supervisor(&self, id: &str, supervisor: &Supervisor) -> Result<(), ApiError> {
        let url = self.url(&[endpoint::USERS, id])?;
        info!("Updating supervisor {}", id);
        let response = self.http.put(url).json(supervisor).send().await?;
        check_status(response)?;
        Ok(())
    }

    /// Delete a supervisor record
    pub async fn delete_supervisor(&self, id: &str) -> Result<(), ApiError> {
        let url = self.url(&[endpoint::USERS, id])?;
        info!("Deleting supervisor {}", id);
        let response = self.http.delete(url).send().await?;
        check_status(response)?;
        Ok(())
    }

    /// List every line with its current shift
    pub async fn list_assignments(&self) -> Result<Vec<LineAssignment>, ApiError> {
        let url = self.url(&[endpoint::TEST_DATA])?;
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    /// Move a line to another shift
    pub async fn update_post(&self, line: &str, shift: Shift) -> Result<(), ApiError> {
        let url = self.url(&[endpoint::UPDATE_POST, line])?;
        info!("Moving line {:?} to shift {}", line, shift);
        let response = self
            .http
            .put(url)
            .json(&serde_json::json!({ "post": shift }))
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }

    /// Resolve path segments against the base URL, percent-encoding each one
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl DashboardSource for AndonClient {
    fn latest_data(&self) -> SourceFuture<'_, Vec<TelemetryRecord>> {
        Box::pin(self.fetch_latest_data())
    }

    fn balance(&self) -> SourceFuture<'_, f64> {
        Box::pin(self.fetch_balance())
    }
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
        });
    }
    Ok(response)
}

/// Decode a JSON body, rejecting non-JSON content types up front
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check_status(response)?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.contains("application/json") {
        let body: String = response
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(BODY_PREVIEW_CHARS)
            .collect();
        warn!("Expected JSON, received {:?}: {}", content_type, body);
        return Err(ApiError::UnexpectedContentType {
            content_type: if content_type.is_empty() {
                "no content type".to_string()
            } else {
                content_type
            },
            body,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
