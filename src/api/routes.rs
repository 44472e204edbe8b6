//! API Routes
//!
//! Configures the Axum router with all proxy endpoints.

use axum::{routing::get, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use super::handlers::{health_handler, lookup_handler, stats_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /cache?key=<key>` - Read-through lookup
/// - `GET /stats` - Cache and backing-store statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Timeout: Answers 408 once `request_timeout` elapses, cancelling any
///   in-flight backing-store lookup
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let timeout = TimeoutLayer::new(state.request_timeout);

    Router::new()
        .route("/cache", get(lookup_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(timeout)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
