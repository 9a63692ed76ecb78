//! Local Cache Store Module
//!
//! In-process cache backed by a HashMap with lazy TTL expiration.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStore};

/// Default TTL in seconds for local entries written without an explicit TTL.
pub const LOCAL_DEFAULT_TTL: u64 = 300;

// == Local Cache Store ==
/// In-process cache. Always available, so every operation succeeds.
///
/// Expired entries are never returned: `get` and `has` check expiry at access
/// time. [`LocalCacheStore::purge_expired`] removes them physically and is
/// driven by the optional sweep task.
#[derive(Debug)]
pub struct LocalCacheStore {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// Default TTL in seconds for entries without explicit TTL
    default_ttl: u64,
}

impl LocalCacheStore {
    // == Constructor ==
    /// Creates an empty store with the given default TTL (seconds).
    pub fn new(default_ttl: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of physically held entries, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if no entries are held.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for LocalCacheStore {
    fn default() -> Self {
        Self::new(LOCAL_DEFAULT_TTL)
    }
}

#[async_trait]
impl CacheStore for LocalCacheStore {
    async fn get(&self, key: &str) -> Option<Value> {
        // Write lock so an expired entry can be dropped on the way out
        let mut entries = self.entries.write().await;
        let entry = entries.get(key)?;

        if entry.is_expired() {
            entries.remove(key);
            debug!(key, "Local cache entry expired");
            return None;
        }

        Some(entry.value.clone())
    }

    async fn set(&self, key: &str, value: Value, ttl: Option<u64>) -> bool {
        let entry = CacheEntry::new(value, ttl.unwrap_or(self.default_ttl));
        self.entries.write().await.insert(key.to_string(), entry);
        true
    }

    async fn delete(&self, key: &str) -> bool {
        self.entries.write().await.remove(key);
        true
    }

    async fn has(&self, key: &str) -> bool {
        self.entries
            .read()
            .await
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    async fn flush(&self) {
        self.entries.write().await.clear();
    }

    fn is_healthy(&self) -> bool {
        true
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_store_new() {
        let store = LocalCacheStore::new(300);
        assert_eq!(store.len().await, 0);
        assert!(store.is_empty().await);
        assert!(store.is_healthy());
    }

    #[tokio::test]
    async fn test_store_set_and_get() {
        let store = LocalCacheStore::new(300);

        assert!(store.set("key1", json!("value1"), None).await);

        assert_eq!(store.get("key1").await, Some(json!("value1")));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_get_nonexistent() {
        let store = LocalCacheStore::new(300);

        assert_eq!(store.get("nonexistent").await, None);
        assert!(!store.has("nonexistent").await);
    }

    #[tokio::test]
    async fn test_store_delete() {
        let store = LocalCacheStore::new(300);

        store.set("key1", json!("value1"), None).await;
        assert!(store.delete("key1").await);

        assert!(store.is_empty().await);
        assert_eq!(store.get("key1").await, None);
    }

    #[tokio::test]
    async fn test_store_delete_nonexistent_succeeds() {
        let store = LocalCacheStore::new(300);

        assert!(store.delete("nonexistent").await);
    }

    #[tokio::test]
    async fn test_store_overwrite() {
        let store = LocalCacheStore::new(300);

        store.set("key1", json!("value1"), None).await;
        store.set("key1", json!({"v": 2}), None).await;

        assert_eq!(store.get("key1").await, Some(json!({"v": 2})));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_ttl_expiration() {
        let store = LocalCacheStore::new(300);

        store.set("key1", json!("value1"), Some(1)).await;
        assert!(store.has("key1").await);

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(!store.has("key1").await);
        assert_eq!(store.get("key1").await, None);
        assert_eq!(store.len().await, 0, "Expired entry is dropped on read");
    }

    #[tokio::test]
    async fn test_store_overwrite_resets_ttl() {
        let store = LocalCacheStore::new(300);

        store.set("key1", json!("short"), Some(1)).await;
        store.set("key1", json!("long"), Some(60)).await;

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(store.get("key1").await, Some(json!("long")));
    }

    #[tokio::test]
    async fn test_store_zero_ttl_never_expires() {
        let store = LocalCacheStore::new(1);

        store.set("pinned", json!(true), Some(0)).await;
        store.set("default", json!(true), None).await;

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(store.has("pinned").await);
        assert!(!store.has("default").await);
    }

    #[tokio::test]
    async fn test_store_huge_ttl_is_kept() {
        let store = LocalCacheStore::new(300);

        assert!(store.set("forever", json!(1), Some(u64::MAX)).await);
        assert!(store.set("almost", json!(2), Some(u64::MAX / 1000)).await);

        assert_eq!(store.get("forever").await, Some(json!(1)));
        assert_eq!(store.get("almost").await, Some(json!(2)));
        assert_eq!(store.purge_expired().await, 0);
    }

    #[tokio::test]
    async fn test_store_flush() {
        let store = LocalCacheStore::new(300);

        store.set("key1", json!(1), None).await;
        store.set("key2", json!(2), None).await;
        store.flush().await;

        assert!(store.is_empty().await);
        assert_eq!(store.get("key1").await, None);
    }

    #[tokio::test]
    async fn test_store_purge_expired() {
        let store = LocalCacheStore::new(300);

        store.set("key1", json!("value1"), Some(1)).await;
        store.set("key2", json!("value2"), Some(10)).await;

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.has("key2").await);
    }
}
