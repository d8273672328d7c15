//! Andon API Error Types

use thiserror::Error;

/// Errors that can occur while talking to the Andon API
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Connection could not be established or was dropped
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request did not complete within the client timeout
    #[error("Request timed out")]
    Timeout,

    /// Server answered with a non-success status
    #[error("Server returned status {status}")]
    Status { status: u16 },

    /// Server answered with something other than JSON
    #[error("Server error: expected JSON response, got {content_type}")]
    UnexpectedContentType { content_type: String, body: String },

    /// JSON body did not match the expected shape
    #[error("Server error: malformed response: {0}")]
    Parse(String),

    /// Balance feed answered with a non-"ok" code
    #[error("Invalid balance response (code {0:?})")]
    InvalidBalance(String),

    /// Base URL cannot carry the requested path
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// True when the server was reachable but its answer was unusable.
    ///
    /// The dashboard reports these as "server error" rather than as a
    /// connectivity problem.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            ApiError::UnexpectedContentType { .. } | ApiError::Parse(_) | ApiError::InvalidBalance(_)
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_classification() {
        assert!(ApiError::Parse("eof".into()).is_server_error());
        assert!(ApiError::UnexpectedContentType {
            content_type: "text/html".into(),
            body: "<html>".into(),
        }
        .is_server_error());
        assert!(ApiError::InvalidBalance("ko".into()).is_server_error());

        assert!(!ApiError::Transport("refused".into()).is_server_error());
        assert!(!ApiError::Timeout.is_server_error());
        assert!(!ApiError::Status { status: 500 }.is_server_error());
    }

    #[test]
    fn test_display_mentions_server_error() {
        let err = ApiError::UnexpectedContentType {
            content_type: "text/html".into(),
            body: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "Server error: expected JSON response, got text/html"
        );
    }
}
