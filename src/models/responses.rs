//! Response DTOs for the HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::HealthReport;

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Result of the cache round trip
    pub cache: HealthReport,
}

impl HealthResponse {
    /// Creates a HealthResponse from a cache report with the current timestamp
    pub fn from_report(cache: HealthReport) -> Self {
        let status = if cache.is_ok() { "healthy" } else { "degraded" };
        Self {
            status: status.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            cache,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.cache.is_ok()
    }
}
