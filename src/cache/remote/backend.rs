//! Seam between the remote store and the backing key-value service.
//!
//! Anything that can connect, get, set with expiry, delete, test existence,
//! flush and close over a persistent connection can back a `RemoteCacheStore`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RemoteError;

/// Opens connections to the backing service.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Makes one connection attempt. Must resolve in bounded time.
    async fn connect(&self) -> Result<Arc<dyn Connection>, RemoteError>;
}

/// A live connection to the backing service.
///
/// Payloads are text; the store owns encoding.
#[async_trait]
pub trait Connection: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<String>, RemoteError>;

    /// Stores `value`; `ttl_secs == 0` stores without expiry.
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), RemoteError>;

    async fn del(&self, key: &str) -> Result<(), RemoteError>;

    async fn exists(&self, key: &str) -> Result<bool, RemoteError>;

    async fn flush_all(&self) -> Result<(), RemoteError>;

    /// Resolves once the connection has failed, yielding the failure.
    ///
    /// This is the connection-level error event; a single failed command is
    /// not.
    async fn closed(&self) -> RemoteError;

    /// Gracefully closes the connection.
    async fn close(&self) -> Result<(), RemoteError>;
}
