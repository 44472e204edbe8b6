//! Error types for the caching proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Proxy Error Enum ==
/// Unified error type for lookups through the proxy.
///
/// `NotFound` is an expected result rather than a fault: the key is absent
/// (or expired) in every layer that was consulted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// Key is absent in the consulted store
    #[error("key not found")]
    NotFound,

    /// Malformed lookup request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Any backing-store failure other than not-found
    #[error("Backing store error: {0}")]
    Backend(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // No body: callers read "definitely absent" from the status alone
            ProxyError::NotFound => return StatusCode::NO_CONTENT.into_response(),
            ProxyError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ProxyError::Backend(msg) => {
                tracing::error!("Lookup failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "backing store unavailable".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
