//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and their age check.

use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;

// == Cache Entry ==
/// A value fetched from the backing store and the moment it was cached.
///
/// Entries are never mutated; a re-fetch replaces the entry wholesale.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached value
    pub value: Bytes,
    /// When the value was fetched from the backing store
    pub inserted_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with `now`.
    pub fn new(value: Bytes, now: Instant) -> Self {
        Self {
            value,
            inserted_at: now,
        }
    }

    // == Age ==
    /// Time elapsed between insertion and `now`, zero if `now` is earlier.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.inserted_at)
    }

    // == Is Fresh ==
    /// Whether the entry may still be served at `now`.
    ///
    /// Boundary condition: an entry whose age equals `ttl` is expired.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) < ttl
    }
}
