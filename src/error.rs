//! Error types for the caching proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Proxy Error Enum ==
/// Unified error type for the caching proxy.
///
/// A key that is absent from both the cache and the backing store is not an
/// error; `BoundedCache::get` reports it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Backing store could not be reached while starting up
    #[error("Backing store unavailable: {0}")]
    StoreUnavailable(String),

    /// Backing store call failed while serving a request
    #[error("Backing store error: {0}")]
    Store(String),

    /// Admission gate is at its concurrency limit
    #[error("Too many concurrent requests")]
    Rejected,

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::Rejected => return StatusCode::TOO_MANY_REQUESTS.into_response(),
            ProxyError::StoreUnavailable(_) | ProxyError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
