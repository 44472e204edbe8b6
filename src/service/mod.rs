//! Service Module
//!
//! Read-through proxy logic and the backing-store client it falls back to.

mod proxy;
mod redis_backend;

pub use proxy::{CacheProxy, ProxyStats};
pub use redis_backend::RedisBackend;
