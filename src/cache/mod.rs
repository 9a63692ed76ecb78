//! Cache Module
//!
//! A key/value cache contract with two implementations: an in-process store
//! and a network-backed store that survives outages of its backing service.

mod entry;
mod health;
mod local;
pub mod remote;
mod store;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

// Re-export public types
pub use entry::CacheEntry;
pub use health::{check_health, HealthReport, HealthStatus};
pub use local::{LocalCacheStore, LOCAL_DEFAULT_TTL};
pub use remote::{
    ConnectionState, ConnectionStatus, ReconnectPolicy, RedisConnector, RemoteCacheStore,
    REMOTE_DEFAULT_TTL,
};
pub use store::{CacheStore, CacheStoreExt};

use crate::config::{CacheDriver, Config};
use crate::tasks::spawn_cleanup_task;

// == Cache Backend ==
/// The cache implementation chosen at process start, with whatever background
/// work it owns.
pub enum CacheBackend {
    Local {
        store: Arc<LocalCacheStore>,
        sweeper: JoinHandle<()>,
    },
    Remote(Arc<RemoteCacheStore>),
}

impl CacheBackend {
    /// Builds the configured store. Must be called from within a tokio runtime.
    ///
    /// A Redis URL that does not parse falls back to the local store.
    pub fn from_config(config: &Config) -> Self {
        match config.cache_driver {
            CacheDriver::Redis => match RedisConnector::new(&config.redis_url) {
                Ok(connector) => {
                    info!("Using remote cache store");
                    let ttl = config.default_ttl.unwrap_or(REMOTE_DEFAULT_TTL);
                    CacheBackend::Remote(Arc::new(RemoteCacheStore::with_policy(
                        connector,
                        config.reconnect,
                        ttl,
                    )))
                }
                Err(err) => {
                    warn!(error = %err, "Invalid REDIS_URL, falling back to local cache store");
                    Self::local(config)
                }
            },
            CacheDriver::Local => {
                info!("Using local cache store");
                Self::local(config)
            }
        }
    }

    fn local(config: &Config) -> Self {
        let store = Arc::new(LocalCacheStore::new(
            config.default_ttl.unwrap_or(LOCAL_DEFAULT_TTL),
        ));
        let sweeper = spawn_cleanup_task(store.clone(), config.cleanup_interval);
        CacheBackend::Local { store, sweeper }
    }

    /// The store as seen by consumers.
    pub fn store(&self) -> Arc<dyn CacheStore> {
        match self {
            CacheBackend::Local { store, .. } => store.clone() as Arc<dyn CacheStore>,
            CacheBackend::Remote(store) => store.clone() as Arc<dyn CacheStore>,
        }
    }

    /// Stops background work and releases the connection, if any.
    pub async fn shutdown(self) {
        match self {
            CacheBackend::Local { sweeper, .. } => sweeper.abort(),
            CacheBackend::Remote(store) => store.disconnect().await,
        }
    }
}
