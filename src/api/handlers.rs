//! API Handlers
//!
//! HTTP request handlers for the proxy endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::cache::BoundedCache;
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::gate::AdmissionGate;
use crate::models::{HealthResponse, StatsResponse, ValueResponse};
use crate::store::RemoteStore;

/// Application state shared across all handlers.
///
/// Built once at startup; every request sees the same cache and gate.
#[derive(Clone)]
pub struct AppState {
    /// Read-through cache (internally synchronized)
    pub cache: Arc<BoundedCache>,
    /// Concurrency limiter for key lookups
    pub gate: AdmissionGate,
}

impl AppState {
    /// Creates a new AppState from an existing cache and gate.
    pub fn new(cache: BoundedCache, gate: AdmissionGate) -> Self {
        Self {
            cache: Arc::new(cache),
            gate,
        }
    }

    /// Creates a new AppState from configuration, reading through to `store`.
    pub fn from_config(config: &Config, store: Arc<dyn RemoteStore>) -> Self {
        let cache = BoundedCache::new(store, config.cache_capacity, config.cache_ttl());
        Self::new(cache, AdmissionGate::new(config.max_clients))
    }
}

/// Handler for GET /:key
///
/// Looks the key up through the admission gate and the read-through cache.
/// - 200 `{"value": ...}` when a value is found
/// - 204 when neither cache nor store has the key
/// - 429 when the concurrency limit is reached
/// - 500 when the backing store fails
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    // Held until the handler returns, on every path
    let Some(_permit) = state.gate.try_acquire() else {
        return Err(ProxyError::Rejected);
    };

    let value = state.cache.get(&key).await.inspect_err(|e| {
        warn!(key = %key, error = %e, "lookup failed");
    })?;

    match value {
        Some(value) => Ok(Json(ValueResponse::from_bytes(&value)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Handler for GET /_proxy/stats
///
/// Returns cache and admission statistics. Not subject to admission control.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache_stats = state.cache.stats().await;

    Json(StatsResponse::new(
        cache_stats,
        state.cache.capacity(),
        state.cache.ttl().as_secs(),
        state.gate.stats(),
    ))
}

/// Handler for GET /_proxy/health
///
/// Returns health status of the proxy.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
