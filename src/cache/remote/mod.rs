//! Remote Cache Store Module
//!
//! Cache client for an external key-value service that keeps working through
//! outages of that service. While the connection is down every operation
//! returns its fallback without attempting I/O, and a supervisor task brings
//! the connection back on its own.

mod backend;
mod redis_connector;
mod state;
mod supervisor;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;

pub use backend::{Connection, Connector};
pub use redis_connector::RedisConnector;
pub use state::{ConnectionState, ConnectionStatus, ReconnectPolicy};

use supervisor::{supervise, Link};

/// Default TTL in seconds for remote entries written without an explicit TTL.
pub const REMOTE_DEFAULT_TTL: u64 = 3600;

// == Remote Cache Store ==
/// Network-backed cache with automatic reconnection.
///
/// Meant to be built once per process and shared; each instance owns one
/// connection and one supervisor task.
pub struct RemoteCacheStore {
    link: Arc<Link>,
    supervisor: Mutex<Option<JoinHandle<()>>>,
    default_ttl: u64,
}

impl RemoteCacheStore {
    // == Constructor ==
    /// Creates the store with the default policy and TTL, and starts
    /// connecting in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(connector: impl Connector) -> Self {
        Self::with_policy(connector, ReconnectPolicy::default(), REMOTE_DEFAULT_TTL)
    }

    /// Creates the store with explicit reconnection timing and default TTL.
    pub fn with_policy(connector: impl Connector, policy: ReconnectPolicy, default_ttl: u64) -> Self {
        let link = Arc::new(Link::new());
        let supervisor = tokio::spawn(supervise(link.clone(), Arc::new(connector), policy));

        Self {
            link,
            supervisor: Mutex::new(Some(supervisor)),
            default_ttl,
        }
    }

    // == Status ==
    /// Current snapshot of the connection state machine.
    pub fn status(&self) -> ConnectionStatus {
        self.link.status()
    }

    /// True iff the store is connected.
    pub fn is_available(&self) -> bool {
        self.status().is_connected()
    }

    // == Reconnect ==
    /// Starts the next periodic reconnection cycle now instead of waiting for
    /// the timer.
    ///
    /// Returns `false` and does nothing while connecting or connected.
    pub fn request_reconnect(&self) -> bool {
        self.link.request_reconnect()
    }

    // == Disconnect ==
    /// Stops all reconnection activity and closes the connection.
    ///
    /// No timer fires after this returns. Close failures are logged and
    /// swallowed.
    pub async fn disconnect(&self) {
        if let Some(handle) = self.supervisor.lock().await.take() {
            handle.abort();
            // Cancelled is the expected outcome
            let _ = handle.await;
        }

        if let Some(connection) = self.link.reset().await {
            if let Err(err) = connection.close().await {
                debug!(error = %err, "Ignoring error while closing cache connection");
            }
        }

        info!("Cache connection closed");
    }

    async fn live_connection(&self, op: &'static str, key: &str) -> Option<Arc<dyn Connection>> {
        let connection = self.link.connection().await;
        if connection.is_none() {
            debug!(op, key, "Cache unavailable, skipping");
        }
        connection
    }
}

impl Drop for RemoteCacheStore {
    fn drop(&mut self) {
        if let Some(handle) = self.supervisor.get_mut().take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl CacheStore for RemoteCacheStore {
    async fn get(&self, key: &str) -> Option<Value> {
        let connection = self.live_connection("GET", key).await?;

        let raw = match connection.get(key).await {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(key, error = %err, "Cache GET failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "Failed to decode cached payload, treating as miss");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: Value, ttl: Option<u64>) -> bool {
        let Some(connection) = self.live_connection("SET", key).await else {
            return false;
        };

        let payload = match serde_json::to_string(&value) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(key, error = %err, "Failed to encode cache payload");
                return false;
            }
        };

        match connection.set(key, &payload, ttl.unwrap_or(self.default_ttl)).await {
            Ok(()) => true,
            Err(err) => {
                warn!(key, error = %err, "Cache SET failed");
                false
            }
        }
    }

    async fn delete(&self, key: &str) -> bool {
        let Some(connection) = self.live_connection("DEL", key).await else {
            return false;
        };

        match connection.del(key).await {
            Ok(()) => true,
            Err(err) => {
                warn!(key, error = %err, "Cache DEL failed");
                false
            }
        }
    }

    async fn has(&self, key: &str) -> bool {
        let Some(connection) = self.live_connection("EXISTS", key).await else {
            return false;
        };

        connection.exists(key).await.unwrap_or_else(|err| {
            warn!(key, error = %err, "Cache EXISTS failed");
            false
        })
    }

    async fn flush(&self) {
        let Some(connection) = self.live_connection("FLUSHALL", "*").await else {
            return;
        };

        if let Err(err) = connection.flush_all().await {
            warn!(error = %err, "Cache FLUSHALL failed");
        }
    }

    fn is_healthy(&self) -> bool {
        self.is_available()
    }
}
