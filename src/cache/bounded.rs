//! Bounded Cache Module
//!
//! Read-through cache engine combining the LRU list with TTL visibility checks
//! in front of a backing store.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruList};
use crate::error::Result;
use crate::store::RemoteStore;

/// Upper bound on slots reserved up front; larger caches grow on demand.
const PREALLOCATED_ENTRIES: usize = 1024;

// == Cache State ==
/// Everything guarded by the cache lock.
#[derive(Debug)]
struct CacheState {
    entries: LruList<CacheEntry>,
    stats: CacheStats,
}

// == Bounded Cache ==
/// Size-bounded, time-expiring LRU cache that reads through to a `RemoteStore`.
///
/// Expiry only governs whether a resident entry may be served; expired entries
/// keep their slot until they are looked up again or evicted by size.
pub struct BoundedCache {
    state: Mutex<CacheState>,
    store: Arc<dyn RemoteStore>,
    capacity: usize,
    ttl: Duration,
}

impl BoundedCache {
    // == Constructor ==
    /// Creates a new cache in front of `store`.
    ///
    /// # Arguments
    /// * `store` - Backing store consulted on a miss
    /// * `capacity` - Maximum number of resident entries, clamped to at least 1
    /// * `ttl` - How long a fetched value may be served from memory
    pub fn new(store: Arc<dyn RemoteStore>, capacity: usize, ttl: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(CacheState {
                entries: LruList::with_capacity(capacity.min(PREALLOCATED_ENTRIES)),
                stats: CacheStats::new(),
            }),
            store,
            capacity,
            ttl,
        }
    }

    // == Get ==
    /// Returns the value for `key`, from memory when fresh, otherwise from the store.
    ///
    /// The lock is held for the whole lookup, including the store fetch, so
    /// concurrent misses on one key fetch it once. Store absence is returned as
    /// `Ok(None)` and never cached. Store faults propagate unchanged and leave
    /// the cache as it was, minus any expired entry for `key`.
    pub async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        if let Some(entry) = state.entries.peek(key) {
            if entry.is_fresh(now, self.ttl) {
                let value = entry.value.clone();
                state.entries.touch(key);
                state.stats.record_hit();
                debug!(key, "cache hit");
                return Ok(Some(value));
            }

            state.entries.remove(key);
            state.stats.record_expiration();
            debug!(key, "cache entry expired");
        }

        state.stats.record_miss();
        let fetched = self.store.get(key).await?;

        let Some(value) = fetched else {
            state.stats.record_store_miss();
            debug!(key, "key absent from backing store");
            return Ok(None);
        };

        // Stamp at fetch completion so a slow store does not eat into the TTL
        let entry = CacheEntry::new(value.clone(), Instant::now());
        state.entries.push_back(key.to_string(), entry);
        self.evict_overflow(&mut state);
        debug!(key, "cache populated from backing store");

        Ok(Some(value))
    }

    // == Eviction ==
    /// Drops least recently used entries until the size bound holds.
    fn evict_overflow(&self, state: &mut CacheState) {
        while state.entries.len() > self.capacity {
            match state.entries.pop_front() {
                Some((evicted, _)) => {
                    state.stats.record_eviction();
                    debug!(key = %evicted, "evicted least recently used entry");
                }
                None => break,
            }
        }
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        let mut stats = state.stats.clone();
        stats.entries = state.entries.len();
        stats
    }

    // == Length ==
    /// Returns the number of resident entries, including expired ones not yet looked up.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns whether `key` occupies a slot, regardless of freshness.
    pub async fn is_resident(&self, key: &str) -> bool {
        self.state.lock().await.entries.contains(key)
    }

    /// Resident keys from least to most recently used.
    pub async fn keys(&self) -> Vec<String> {
        let state = self.state.lock().await;
        state.entries.keys().into_iter().map(str::to_string).collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProxyError;
    use crate::store::MemoryStore;

    fn cache_with(
        entries: &[(&str, &str)],
        capacity: usize,
        ttl_secs: u64,
    ) -> (Arc<MemoryStore>, BoundedCache) {
        let store = Arc::new(MemoryStore::new());
        for (key, value) in entries {
            store.insert(*key, value.to_string());
        }
        let cache = BoundedCache::new(store.clone(), capacity, Duration::from_secs(ttl_secs));
        (store, cache)
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let (store, cache) = cache_with(&[("a", "1")], 10, 300);

        assert_eq!(cache.get("a").await.unwrap(), Some(Bytes::from("1")));
        assert_eq!(cache.get("a").await.unwrap(), Some(Bytes::from("1")));

        assert_eq!(store.fetch_count(), 1, "second lookup served from memory");
        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[tokio::test]
    async fn test_hit_survives_store_delete() {
        let (store, cache) = cache_with(&[("cached_key", "cached_value")], 10, 300);

        cache.get("cached_key").await.unwrap();
        store.remove("cached_key");

        assert_eq!(
            cache.get("cached_key").await.unwrap(),
            Some(Bytes::from("cached_value"))
        );
    }

    #[tokio::test]
    async fn test_store_absence_not_cached() {
        let (store, cache) = cache_with(&[], 10, 300);

        assert_eq!(cache.get("late").await.unwrap(), None);
        assert!(!cache.is_resident("late").await);

        store.insert("late", "now here");
        assert_eq!(cache.get("late").await.unwrap(), Some(Bytes::from("now here")));
        assert_eq!(cache.stats().await.store_misses, 1);
    }

    #[tokio::test]
    async fn test_lru_evicts_oldest_miss() {
        let keys = ["k0", "k1", "k2", "k3"];
        let data: Vec<(&str, &str)> = keys.iter().map(|k| (*k, "v")).collect();
        let (store, cache) = cache_with(&data, 3, 300);

        for key in keys {
            cache.get(key).await.unwrap();
        }

        assert_eq!(cache.len().await, 3);
        assert!(!cache.is_resident("k0").await);
        assert_eq!(cache.keys().await, vec!["k1", "k2", "k3"]);
        assert_eq!(cache.stats().await.evictions, 1);

        // k1..k3 are hits, k0 must be refetched
        let before = store.fetch_count();
        for key in ["k1", "k2", "k3"] {
            cache.get(key).await.unwrap();
        }
        assert_eq!(store.fetch_count(), before);
        cache.get("k0").await.unwrap();
        assert_eq!(store.fetch_count(), before + 1);
    }

    #[tokio::test]
    async fn test_hit_refreshes_recency() {
        let data = [("k0", "v"), ("k1", "v"), ("k2", "v"), ("k3", "v")];
        let (_store, cache) = cache_with(&data, 3, 300);

        for key in ["k0", "k1", "k2"] {
            cache.get(key).await.unwrap();
        }
        cache.get("k0").await.unwrap();
        cache.get("k3").await.unwrap();

        assert!(cache.is_resident("k0").await);
        assert!(!cache.is_resident("k1").await);
        assert_eq!(cache.keys().await, vec!["k2", "k0", "k3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_refetched() {
        let (store, cache) = cache_with(&[("a", "1")], 10, 5);

        cache.get("a").await.unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;

        store.insert("a", "2");
        assert_eq!(cache.get("a").await.unwrap(), Some(Bytes::from("2")));
        assert_eq!(store.fetch_count(), 2);

        let stats = cache.stats().await;
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.hits, 0);

        // The refetched value is a fresh hit
        assert_eq!(cache.get("a").await.unwrap(), Some(Bytes::from("2")));
        assert_eq!(cache.stats().await.hits, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_dropped_when_store_lost_key() {
        let (store, cache) = cache_with(&[("expiring_key", "expiring_value")], 10, 5);

        cache.get("expiring_key").await.unwrap();
        store.remove("expiring_key");
        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(cache.get("expiring_key").await.unwrap(), None);
        assert!(!cache.is_resident("expiring_key").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entries_stay_resident_until_accessed() {
        let (_store, cache) = cache_with(&[("a", "1"), ("b", "2")], 10, 5);

        cache.get("a").await.unwrap();
        cache.get("b").await.unwrap();
        tokio::time::advance(Duration::from_secs(60)).await;

        assert_eq!(cache.len().await, 2, "no proactive sweeping");
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let (store, cache) = cache_with(&[("a", "1")], 10, 300);
        store.set_failing(true);

        let result = cache.get("a").await;
        assert!(matches!(result, Err(ProxyError::Store(_))));
        assert!(cache.is_empty().await);

        store.set_failing(false);
        assert_eq!(cache.get("a").await.unwrap(), Some(Bytes::from("1")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_misses_fetch_once() {
        let store = Arc::new(MemoryStore::with_latency(Duration::from_millis(50)));
        store.insert("hot", "value");
        let cache = Arc::new(BoundedCache::new(store.clone(), 10, Duration::from_secs(300)));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get("hot").await })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), Some(Bytes::from("value")));
        }

        assert_eq!(store.fetch_count(), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_huge_capacity_allocates_lazily() {
        let (_store, cache) = cache_with(&[("a", "1"), ("b", "2")], usize::MAX, 300);
        assert_eq!(cache.capacity(), usize::MAX);

        cache.get("a").await.unwrap();
        cache.get("b").await.unwrap();
        assert_eq!(cache.keys().await, vec!["a", "b"]);
        assert_eq!(cache.stats().await.evictions, 0);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let cache = BoundedCache::new(Arc::new(MemoryStore::new()), 0, Duration::from_secs(1));
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.ttl(), Duration::from_secs(1));
    }
}
