//! API Module
//!
//! HTTP handlers and routing for the caching proxy.
//!
//! # Endpoints
//! - `GET /:key` - Read-through lookup of a key
//! - `GET /_proxy/stats` - Cache and admission statistics
//! - `GET /_proxy/health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
