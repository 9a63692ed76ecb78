//! Cache Entry Module
//!
//! Defines the structure for individual local cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// A single value held by the local store.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_seconds` from now.
    ///
    /// A TTL of `0` produces an entry that never expires, as does a TTL too
    /// large to represent as a timestamp.
    pub fn new(value: Value, ttl_seconds: u64) -> Self {
        let expires_at = if ttl_seconds == 0 {
            None
        } else {
            ttl_seconds
                .checked_mul(1000)
                .and_then(|ttl_ms| current_timestamp_ms().checked_add(ttl_ms))
        };

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Checks expiry against an explicit timestamp (Unix milliseconds).
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
