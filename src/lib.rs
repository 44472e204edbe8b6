//! LRU Proxy - A read-through caching proxy
//!
//! Serves lookups from a bounded in-process LRU cache with TTL expiry and
//! falls back to a backing Redis store on a miss.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStore, KeyReader, LocalCache};
pub use config::Config;
pub use error::ProxyError;
pub use service::{CacheProxy, RedisBackend};
