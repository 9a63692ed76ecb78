//! Cache Store Module
//!
//! The contract every cache implementation honours, plus the combinators
//! consumers build on top of it.

use std::future::Future;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

// == Cache Store ==
/// Key/value cache contract shared by the local and remote stores.
///
/// No method reports cache trouble as an error. A miss, an expired entry and
/// an unreachable backing service all degrade to the documented fallback:
///
/// | operation | fallback |
/// |-----------|----------|
/// | `get`     | `None`   |
/// | `set`     | `false`  |
/// | `delete`  | `false`  |
/// | `has`     | `false`  |
/// | `flush`   | no-op    |
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the value stored under `key` if present and unexpired.
    async fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// `ttl` is in seconds; `None` selects the store default and `Some(0)`
    /// stores without expiry. Returns `false` when the write was not accepted.
    async fn set(&self, key: &str, value: Value, ttl: Option<u64>) -> bool;

    /// Removes `key`. Reports whether the attempt succeeded, not whether the
    /// key existed.
    async fn delete(&self, key: &str) -> bool;

    /// Checks whether an unexpired entry exists for `key`.
    async fn has(&self, key: &str) -> bool;

    /// Removes every entry.
    async fn flush(&self);

    /// Reports current connectivity.
    fn is_healthy(&self) -> bool;
}

// == Cache Store Extensions ==
/// Typed helpers available on every [`CacheStore`], including `dyn CacheStore`.
#[async_trait]
pub trait CacheStoreExt: CacheStore {
    /// Reads `key` and deserializes it into `T`.
    ///
    /// A value that does not fit `T` counts as a miss.
    async fn get_json<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned + Send,
    {
        let raw = self.get(key).await?;
        match serde_json::from_value(raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "Cached value has an unexpected shape, treating as miss");
                None
            }
        }
    }

    /// Serializes `value` and stores it under `key`.
    async fn set_json<T>(&self, key: &str, value: &T, ttl: Option<u64>) -> bool
    where
        T: Serialize + Sync,
    {
        match serde_json::to_value(value) {
            Ok(json) => self.set(key, json, ttl).await,
            Err(err) => {
                warn!(key, error = %err, "Failed to serialize value for cache");
                false
            }
        }
    }

    /// Returns the cached value for `key`, computing and storing it on a miss.
    ///
    /// `compute` runs at most once per call and only its error is propagated.
    /// Storage after a miss is best-effort. When the store is unhealthy the
    /// value is computed and returned without touching the cache.
    ///
    /// Concurrent callers missing the same key each run `compute`; there is
    /// no single-flight deduplication.
    async fn get_or_set<T, E, F, Fut>(&self, key: &str, compute: F, ttl: Option<u64>) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        E: Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
    {
        if !self.is_healthy() {
            debug!(key, "Cache unavailable, computing without storage");
            return compute().await;
        }

        if let Some(cached) = self.get_json::<T>(key).await {
            debug!(key, "Cache HIT");
            return Ok(cached);
        }

        debug!(key, "Cache MISS");
        let value = compute().await?;
        if !self.set_json(key, &value, ttl).await {
            debug!(key, "Computed value was not cached");
        }
        Ok(value)
    }
}

impl<S: CacheStore + ?Sized> CacheStoreExt for S {}
