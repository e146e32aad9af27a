//! Redis-backed store.

use async_trait::async_trait;
use bytes::Bytes;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{info, warn};

use super::RemoteStore;
use crate::error::{ProxyError, Result};

// == Redis Store ==
/// Backing store talking to a Redis server through a shared connection manager.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    // == Connect ==
    /// Connects to `redis://host:port/` and verifies the server answers `PING`.
    ///
    /// Any failure is reported as `ProxyError::StoreUnavailable`; the proxy
    /// does not start without its backing store.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let url = format!("redis://{}:{}/", host, port);
        let client = redis::Client::open(url.as_str())
            .map_err(|e| ProxyError::StoreUnavailable(format!("{}: {}", url, e)))?;

        // Probe with a plain connection first: the manager retries with backoff
        let mut probe = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| ProxyError::StoreUnavailable(format!("{}: {}", url, e)))?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut probe)
            .await
            .map_err(|e| ProxyError::StoreUnavailable(format!("{}: {}", url, e)))?;
        if pong != "PONG" {
            return Err(ProxyError::StoreUnavailable(format!(
                "{}: unexpected PING reply '{}'",
                url, pong
            )));
        }

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| ProxyError::StoreUnavailable(format!("{}: {}", url, e)))?;

        info!("Connected to Redis at {}", url);
        Ok(Self { conn })
    }
}

#[async_trait]
impl RemoteStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        // ConnectionManager is a cheap handle onto one multiplexed connection
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(|e| {
            warn!("Redis GET {} failed: {}", key, e);
            ProxyError::Store(e.to_string())
        })?;
        Ok(value.map(Bytes::from))
    }
}
