//! Cache health check
//!
//! Verifies a store end to end with a synthetic set/get/delete round trip.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::cache::CacheStore;

static PROBE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Outcome of a health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

/// Structured health check result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub message: String,
    /// Connectivity as reported by the store itself
    pub connected: bool,
}

impl HealthReport {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Ok,
            message: message.into(),
            connected: true,
        }
    }

    fn error(message: impl Into<String>, connected: bool) -> Self {
        Self {
            status: HealthStatus::Error,
            message: message.into(),
            connected,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}

/// Runs a write/read/delete round trip against `store`.
///
/// An unhealthy store is reported without attempting any I/O.
pub async fn check_health(store: &dyn CacheStore) -> HealthReport {
    if !store.is_healthy() {
        return HealthReport::error("Cache store is not connected", false);
    }

    let key = format!(
        "health:probe:{}:{}",
        chrono::Utc::now().timestamp_millis(),
        PROBE_SEQ.fetch_add(1, Ordering::Relaxed)
    );
    let probe = json!({ "probe": key });

    if !store.set(&key, probe.clone(), Some(10)).await {
        warn!(key, "Health probe write failed");
        return HealthReport::error("Cache write failed", true);
    }

    let read_back = store.get(&key).await;
    // Best-effort cleanup, the probe expires on its own anyway
    store.delete(&key).await;

    match read_back {
        Some(value) if value == probe => HealthReport::ok("Cache round trip succeeded"),
        Some(_) => HealthReport::error("Cache returned a different value than written", true),
        None => HealthReport::error("Cache read failed after write", true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LocalCacheStore;

    #[tokio::test]
    async fn test_local_store_is_healthy() {
        let store = LocalCacheStore::new(300);

        let report = check_health(&store).await;

        assert!(report.is_ok());
        assert!(report.connected);
        assert!(store.is_empty().await, "Probe key should be removed");
    }

    #[test]
    fn test_report_serialization() {
        let report = HealthReport::error("Cache store is not connected", false);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["status"], "error");
        assert_eq!(json["connected"], false);
        assert_eq!(json["message"], "Cache store is not connected");
    }
}
