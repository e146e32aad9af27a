//! Backing Store Module
//!
//! The remote key-value store the cache reads through to on a miss.

mod memory;
mod redis;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::warn;

use crate::config::{Config, StoreBackend};
use crate::error::Result;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

// == Remote Store ==
/// Read-only view of a key-value store.
///
/// `Ok(None)` means the store answered and the key does not exist. Transport
/// faults are returned as errors and are never retried by the caller.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetches the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;
}

// == Construction ==
/// Builds the backing store selected by `config`.
///
/// For Redis this connects eagerly and fails with `StoreUnavailable` if the
/// server cannot be reached.
pub async fn from_config(config: &Config) -> Result<Arc<dyn RemoteStore>> {
    match config.store_backend {
        StoreBackend::Redis => {
            let store = RedisStore::connect(&config.redis_host, config.redis_port).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            warn!("Using empty in-process store; every lookup will miss");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_config_memory_backend() {
        let config = Config {
            store_backend: StoreBackend::Memory,
            ..Config::default()
        };
        let store = from_config(&config).await.unwrap();
        assert_eq!(store.get("anything").await.unwrap(), None);
    }
}
