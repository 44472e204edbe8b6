//! Capability traits shared by the cache, the proxy and the backing store.

use async_trait::async_trait;

use crate::error::Result;

/// Read capability: a lookup by key that yields a value, `ProxyError::NotFound`,
/// or a backing-store failure.
#[async_trait]
pub trait KeyReader: Send + Sync {
    async fn get(&self, key: &str) -> Result<String>;
}

/// In-process cache capability. Infallible: a lookup either hits or misses,
/// and a write always succeeds.
#[async_trait]
pub trait LocalCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: String, value: String);
}

#[async_trait]
impl<T> KeyReader for std::sync::Arc<T>
where
    T: KeyReader + ?Sized,
{
    async fn get(&self, key: &str) -> Result<String> {
        (**self).get(key).await
    }
}
