//! Response DTOs for the proxy HTTP surface
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::gate::GateStats;

/// Response body for a cache hit (GET /:key)
#[derive(Debug, Clone, Serialize)]
pub struct ValueResponse {
    /// The stored value, decoded as UTF-8
    pub value: String,
}

impl ValueResponse {
    /// Creates a ValueResponse from raw store bytes.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn from_bytes(value: &[u8]) -> Self {
        Self {
            value: String::from_utf8_lossy(value).into_owned(),
        }
    }
}

/// Response body for the stats endpoint (GET /_proxy/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Lookups served from memory
    pub hits: u64,
    /// Lookups that consulted the backing store
    pub misses: u64,
    /// Misses caused by TTL expiry
    pub expirations: u64,
    /// Entries dropped by the LRU policy
    pub evictions: u64,
    /// Lookups the backing store could not answer with a value
    pub store_misses: u64,
    /// Resident entries
    pub entries: usize,
    /// Configured capacity
    pub capacity: usize,
    /// Configured TTL in seconds
    pub ttl_secs: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
    /// Admission gate state
    pub admission: GateStats,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache and gate snapshots
    pub fn new(cache: CacheStats, capacity: usize, ttl_secs: u64, admission: GateStats) -> Self {
        Self {
            hit_rate: cache.hit_rate(),
            hits: cache.hits,
            misses: cache.misses,
            expirations: cache.expirations,
            evictions: cache.evictions,
            store_misses: cache.store_misses,
            entries: cache.entries,
            capacity,
            ttl_secs,
            admission,
        }
    }
}

/// Response body for the health endpoint (GET /_proxy/health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for server-side failures
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
