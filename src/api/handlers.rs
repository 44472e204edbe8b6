//! API Handlers
//!
//! HTTP request handlers for each proxy endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::cache::{CacheStore, KeyReader};
use crate::error::Result;
use crate::models::{HealthResponse, LookupQuery, StatsResponse};
use crate::service::CacheProxy;

/// Default per-request deadline applied by the router.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Backing store as seen by the handlers.
pub type SharedBackend = Arc<dyn KeyReader>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-through proxy over the local cache
    pub proxy: Arc<CacheProxy<CacheStore, SharedBackend>>,
    /// Deadline for each inbound request, including any backing-store fallback
    pub request_timeout: Duration,
}

impl AppState {
    /// Creates a new AppState from a cache store and a backing store.
    pub fn new(cache: CacheStore, backend: impl KeyReader + 'static) -> Self {
        let backend: SharedBackend = Arc::new(backend);
        Self {
            proxy: Arc::new(CacheProxy::new(cache, backend)),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Handler for GET /cache?key=<key>
///
/// Returns the raw value with 200, an empty 204 when the key is absent, 400
/// for a missing key and 500 when the backing store fails.
pub async fn lookup_handler(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<String> {
    let key = query.into_key()?;
    state.proxy.get(&key).await
}

/// Handler for GET /stats
///
/// Returns current cache and backing-store statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.proxy.cache().stats().await;
    Json(StatsResponse::new(cache, state.proxy.stats()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
