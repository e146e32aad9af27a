//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::error::{ProxyError, Result};

/// Which backing store the proxy reads through to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Remote Redis instance (default)
    Redis,
    /// In-process map, for local runs without Redis
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(ProxyError::InvalidConfig(format!(
                "unknown store backend '{}'",
                other
            ))),
        }
    }
}

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Seconds a cached value stays visible to reads
    pub cache_ttl_secs: u64,
    /// Maximum number of entries the cache can hold
    pub cache_capacity: usize,
    /// Backing Redis host
    pub redis_host: String,
    /// Backing Redis port
    pub redis_port: u16,
    /// Maximum number of requests processed concurrently
    pub max_clients: usize,
    /// HTTP listen host
    pub proxy_host: String,
    /// HTTP listen port
    pub proxy_port: u16,
    /// Backing store implementation
    pub store_backend: StoreBackend,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_EXPIRY_TIME` - Cache TTL in seconds (default: 300)
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `REDIS_HOST` - Backing Redis host (default: localhost)
    /// - `REDIS_PORT` - Backing Redis port (default: 6379)
    /// - `MAX_CLIENTS` - Concurrent request limit (default: 20)
    /// - `PROXY_HOST` - HTTP listen host (default: 0.0.0.0)
    /// - `PROXY_PORT` - HTTP listen port (default: 8000)
    /// - `STORE_BACKEND` - `redis` or `memory` (default: redis)
    ///
    /// Values that fail to parse fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_ttl_secs: parse_var("CACHE_EXPIRY_TIME").unwrap_or(defaults.cache_ttl_secs),
            cache_capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.cache_capacity),
            redis_host: env::var("REDIS_HOST").unwrap_or(defaults.redis_host),
            redis_port: parse_var("REDIS_PORT").unwrap_or(defaults.redis_port),
            max_clients: parse_var("MAX_CLIENTS").unwrap_or(defaults.max_clients),
            proxy_host: env::var("PROXY_HOST").unwrap_or(defaults.proxy_host),
            proxy_port: parse_var("PROXY_PORT").unwrap_or(defaults.proxy_port),
            store_backend: parse_var("STORE_BACKEND").unwrap_or(defaults.store_backend),
        }
    }

    /// Rejects values the cache and gate cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(ProxyError::InvalidConfig(
                "CACHE_CAPACITY must be greater than 0".to_string(),
            ));
        }
        if self.cache_ttl_secs == 0 {
            return Err(ProxyError::InvalidConfig(
                "CACHE_EXPIRY_TIME must be greater than 0".to_string(),
            ));
        }
        if self.max_clients == 0 {
            return Err(ProxyError::InvalidConfig(
                "MAX_CLIENTS must be greater than 0".to_string(),
            ));
        }
        if self.max_clients > Semaphore::MAX_PERMITS {
            return Err(ProxyError::InvalidConfig(format!(
                "MAX_CLIENTS must not exceed {}",
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(())
    }

    /// Cache TTL as a duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            cache_capacity: 1000,
            redis_host: "localhost".to_string(),
            redis_port: 6379,
            max_clients: 20,
            proxy_host: "0.0.0.0".to_string(),
            proxy_port: 8000,
            store_backend: StoreBackend::Redis,
        }
    }
}
