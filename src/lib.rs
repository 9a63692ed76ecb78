//! Resilient Cache - a cache layer that never fails its callers
//!
//! Provides a key/value cache contract with an in-process store and a
//! network-backed store that reconnects on its own, plus a small user service
//! that reads through it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod users;

pub use api::AppState;
pub use cache::{CacheBackend, CacheStore, CacheStoreExt, LocalCacheStore, RemoteCacheStore};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
