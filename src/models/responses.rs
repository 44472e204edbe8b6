//! Response DTOs for the proxy API
//!
//! Defines the structure of the diagnostic response bodies. Lookups answer
//! with the raw value and need no DTO.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::service::ProxyStats;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Local cache counters
    #[serde(flatten)]
    pub cache: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Backing-store counters
    #[serde(flatten)]
    pub proxy: ProxyStats,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache and proxy statistics
    pub fn new(cache: CacheStats, proxy: ProxyStats) -> Self {
        Self {
            hit_rate: cache.hit_rate(),
            cache,
            proxy,
        }
    }
}

/// Response body for the health endpoint (GET /health)
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
