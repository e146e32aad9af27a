//! In-process store.
//!
//! Stands in for Redis in tests and in `STORE_BACKEND=memory` local runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use super::RemoteStore;
use crate::error::{ProxyError, Result};

// == Memory Store ==
/// Thread-safe map implementing `RemoteStore`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, Bytes>>,
    latency: Option<Duration>,
    failing: AtomicBool,
    fetches: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store that answers immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store whose every `get` takes `latency` to answer.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Bytes>) {
        self.write().insert(key.into(), value.into());
    }

    /// Deletes `key`, returning whether it was present.
    pub fn remove(&self, key: &str) -> bool {
        self.write().remove(key).is_some()
    }

    /// Makes subsequent `get` calls fail with `ProxyError::Store` while `failing` is set.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `get` calls this store has served.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Bytes>> {
        // A panic while holding this lock cannot leave the map half-updated
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProxyError::Store(format!("injected failure for '{}'", key)));
        }

        let data = self
            .data
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(data.get(key).cloned())
    }
}
