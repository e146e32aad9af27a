//! API Routes
//!
//! Configures the Axum router with the proxy endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{get_handler, health_handler, stats_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /:key` - Read-through lookup of a single key
/// - `GET /_proxy/stats` - Cache and admission statistics
/// - `GET /_proxy/health` - Health check endpoint
///
/// The operational endpoints live two segments deep so they can never shadow
/// a key, which is always a single path segment.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/:key", get(get_handler))
        .route("/_proxy/stats", get(stats_handler))
        .route("/_proxy/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
