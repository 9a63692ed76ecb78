//! TTL Cleanup Task
//!
//! Background task that periodically purges expired local cache entries.
//! Reads never depend on it; it only bounds memory held by dead entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::LocalCacheStore;

/// Spawns a background task that periodically purges expired entries.
///
/// The task runs until aborted, sleeping for the specified interval between
/// sweeps.
///
/// # Arguments
/// * `store` - shared local store
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(store: Arc<LocalCacheStore>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.purge_expired().await;

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let store = Arc::new(LocalCacheStore::new(300));
        store.set("expire_soon", json!("value"), Some(1)).await;

        let handle = spawn_cleanup_task(store.clone(), 1);

        // Wait for entry to expire and a sweep to run
        tokio::time::sleep(Duration::from_millis(2500)).await;

        // Physically gone, not just hidden by lazy expiry
        assert_eq!(store.len().await, 0, "Expired entry should have been purged");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let store = Arc::new(LocalCacheStore::new(300));
        store.set("long_lived", json!("value"), Some(3600)).await;

        let handle = spawn_cleanup_task(store.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(store.get("long_lived").await, Some(json!("value")));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let store = Arc::new(LocalCacheStore::new(300));

        let handle = spawn_cleanup_task(store, 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
