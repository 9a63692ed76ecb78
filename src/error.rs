//! Error types
//!
//! `RemoteError` covers everything that can go wrong talking to the backing
//! key-value service and never leaves the cache layer. `AppError` is what the
//! HTTP surface reports.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Remote Error Enum ==
/// Failures talking to the backing key-value service.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Establishing the connection failed
    #[error("Connection failed: {0}")]
    Connect(String),

    /// A connect or command did not answer in time
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// A single command failed on a live connection
    #[error("Command {command} failed: {message}")]
    Command {
        command: &'static str,
        message: String,
    },

    /// The live connection dropped
    #[error("Connection lost: {0}")]
    ConnectionLost(String),
}

impl From<redis::RedisError> for RemoteError {
    fn from(err: redis::RedisError) -> Self {
        RemoteError::Connect(err.to_string())
    }
}

// == App Error Enum ==
/// Unified error type for the HTTP surface.
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP surface.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::NotFound("user 9".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_request_maps_to_400() {
        let response = AppError::InvalidRequest("empty name".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_remote_error_display() {
        let err = RemoteError::Command {
            command: "GET",
            message: "broken pipe".to_string(),
        };
        assert_eq!(err.to_string(), "Command GET failed: broken pipe");
    }
}
