//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::ReconnectPolicy;

/// Default connection URL of the backing key-value service.
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

/// Which cache implementation the process wires in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDriver {
    /// In-process store
    Local,
    /// Network-backed store talking to Redis
    Redis,
}

impl FromStr for CacheDriver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "memory" => Ok(CacheDriver::Local),
            "redis" | "remote" => Ok(CacheDriver::Redis),
            other => Err(format!("Unknown cache driver '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache implementation to use
    pub cache_driver: CacheDriver,
    /// Connection URL of the backing key-value service
    pub redis_url: String,
    /// Override of the store's default TTL in seconds
    pub default_ttl: Option<u64>,
    /// Local store sweep interval in seconds
    pub cleanup_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Remote store reconnection timing
    pub reconnect: ReconnectPolicy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DRIVER` - `local` or `redis` (default: local)
    /// - `REDIS_URL` - Backing service URL (default: redis://localhost:6379)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300 local, 3600 redis)
    /// - `CLEANUP_INTERVAL` - Local sweep frequency in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_MAX_ATTEMPTS` - Connection attempts before periodic mode (default: 3)
    /// - `CACHE_RETRY_DELAY` - Seconds between attempts (default: 5)
    /// - `CACHE_RECONNECT_INTERVAL` - Seconds between periodic cycles (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache_driver: parse_var("CACHE_DRIVER").unwrap_or(defaults.cache_driver),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            default_ttl: parse_var("CACHE_DEFAULT_TTL"),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            reconnect: ReconnectPolicy {
                max_attempts: parse_var("CACHE_MAX_ATTEMPTS")
                    .unwrap_or(defaults.reconnect.max_attempts),
                retry_delay: parse_var("CACHE_RETRY_DELAY")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.reconnect.retry_delay),
                reconnect_interval: parse_var("CACHE_RECONNECT_INTERVAL")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.reconnect.reconnect_interval),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_driver: CacheDriver::Local,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            default_ttl: None,
            cleanup_interval: 60,
            server_port: 3000,
            reconnect: ReconnectPolicy::default(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
