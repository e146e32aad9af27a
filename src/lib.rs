//! Redis Proxy - A read-through caching HTTP proxy
//!
//! Serves keys from an in-process LRU cache with TTL expiry, reading through to
//! a backing Redis on a miss, behind a non-queueing concurrency limit.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod gate;
pub mod models;
pub mod store;

pub use api::{create_router, AppState};
pub use cache::BoundedCache;
pub use config::Config;
pub use error::{ProxyError, Result};
pub use gate::AdmissionGate;
pub use store::{MemoryStore, RedisStore, RemoteStore};
