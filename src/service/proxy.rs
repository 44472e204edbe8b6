//! Cache Proxy
//!
//! Read-through orchestration: serve from the local cache, fall back to the
//! backing store on a miss and populate the cache with what it returns.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{KeyReader, LocalCache};
use crate::error::{ProxyError, Result};

/// Serializable view of the proxy's upstream counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProxyStats {
    /// Lookups that missed locally and went to the backing store
    pub backend_fetches: u64,
    /// Backing-store lookups that failed with something other than not-found
    pub backend_failures: u64,
}

// == Cache Proxy ==
/// Read capability composed from a local cache and a backing store.
///
/// Not-found and failures from the backing store are never cached. There is
/// no de-duplication of concurrent misses: each caller missing on the same
/// key queries the backing store and writes the same value back.
#[derive(Debug)]
pub struct CacheProxy<C, B> {
    cache: C,
    backend: B,
    backend_fetches: AtomicU64,
    backend_failures: AtomicU64,
}

impl<C, B> CacheProxy<C, B>
where
    C: LocalCache,
    B: KeyReader,
{
    pub fn new(cache: C, backend: B) -> Self {
        Self {
            cache,
            backend,
            backend_fetches: AtomicU64::new(0),
            backend_failures: AtomicU64::new(0),
        }
    }

    /// The local cache this proxy populates.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn stats(&self) -> ProxyStats {
        ProxyStats {
            backend_fetches: self.backend_fetches.load(Ordering::Relaxed),
            backend_failures: self.backend_failures.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl<C, B> KeyReader for CacheProxy<C, B>
where
    C: LocalCache,
    B: KeyReader,
{
    /// Returns the value for `key`, consulting the backing store on a miss.
    ///
    /// If this future is dropped while the backing store is being queried,
    /// the cache is left untouched.
    async fn get(&self, key: &str) -> Result<String> {
        if let Some(value) = self.cache.get(key).await {
            return Ok(value);
        }

        self.backend_fetches.fetch_add(1, Ordering::Relaxed);
        match self.backend.get(key).await {
            Ok(value) => {
                self.cache.set(key.to_string(), value.clone()).await;
                Ok(value)
            }
            Err(ProxyError::NotFound) => {
                debug!("Key {} not found in backing store", key);
                Err(ProxyError::NotFound)
            }
            Err(err) => {
                self.backend_failures.fetch_add(1, Ordering::Relaxed);
                warn!("Backing store lookup for {} failed: {}", key, err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use tokio::sync::RwLock;

    use crate::cache::CacheStore;

    /// Scriptable backing store that counts how often it is queried.
    #[derive(Default)]
    struct FakeBackend {
        data: RwLock<HashMap<String, String>>,
        failure: RwLock<Option<String>>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl FakeBackend {
        fn with_delay(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::default()
            }
        }

        async fn put(&self, key: &str, value: &str) {
            self.data
                .write()
                .await
                .insert(key.to_string(), value.to_string());
        }

        async fn fail_with(&self, message: Option<&str>) {
            *self.failure.write().await = message.map(str::to_string);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl KeyReader for FakeBackend {
        async fn get(&self, key: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(message) = self.failure.read().await.clone() {
                return Err(ProxyError::Backend(message));
            }
            self.data
                .read()
                .await
                .get(key)
                .cloned()
                .ok_or(ProxyError::NotFound)
        }
    }

    fn proxy_with(backend: FakeBackend) -> CacheProxy<CacheStore, FakeBackend> {
        CacheProxy::new(CacheStore::new(100, Duration::from_secs(3600)), backend)
    }

    #[tokio::test]
    async fn test_cache_hit_skips_backend() {
        let proxy = proxy_with(FakeBackend::default());
        proxy.cache().set("key", "cached").await;

        assert_eq!(proxy.get("key").await.unwrap(), "cached");
        assert_eq!(proxy.backend.calls(), 0);
        assert_eq!(proxy.stats().backend_fetches, 0);
    }

    #[tokio::test]
    async fn test_cache_miss_backend_hit_populates_cache() {
        let backend = FakeBackend::default();
        backend.put("key", "remote").await;
        let proxy = proxy_with(backend);

        assert_eq!(proxy.get("key").await.unwrap(), "remote");
        assert_eq!(proxy.cache().get("key").await.as_deref(), Some("remote"));

        // Second lookup is served locally
        assert_eq!(proxy.get("key").await.unwrap(), "remote");
        assert_eq!(proxy.backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_backend_miss_is_not_cached() {
        let proxy = proxy_with(FakeBackend::default());

        assert_eq!(proxy.get("missing").await, Err(ProxyError::NotFound));
        assert!(proxy.cache().is_empty().await);

        // A later write upstream is visible on the very next lookup
        proxy.backend.put("missing", "now-present").await;
        assert_eq!(proxy.get("missing").await.unwrap(), "now-present");
        assert_eq!(proxy.backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_backend_failure_propagates_and_recovers() {
        let backend = FakeBackend::default();
        backend.put("key", "value").await;
        backend.fail_with(Some("connection refused")).await;
        let proxy = proxy_with(backend);

        assert_eq!(
            proxy.get("key").await,
            Err(ProxyError::Backend("connection refused".to_string()))
        );
        assert!(proxy.cache().is_empty().await);
        assert_eq!(proxy.stats().backend_failures, 1);

        proxy.backend.fail_with(None).await;
        assert_eq!(proxy.get("key").await.unwrap(), "value");
        assert_eq!(proxy.cache().len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_fallback_writes_nothing() {
        let backend = FakeBackend::with_delay(Duration::from_secs(10));
        backend.put("slow", "value").await;
        let proxy = proxy_with(backend);

        let result = tokio::time::timeout(Duration::from_secs(1), proxy.get("slow")).await;

        assert!(result.is_err(), "lookup should have timed out");
        assert_eq!(proxy.backend.calls(), 1);
        assert!(proxy.cache().is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_misses_each_fetch() {
        let backend = FakeBackend::with_delay(Duration::from_millis(10));
        backend.put("hot", "value").await;
        let proxy = std::sync::Arc::new(proxy_with(backend));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let proxy = proxy.clone();
                tokio::spawn(async move { proxy.get("hot").await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "value");
        }

        assert_eq!(proxy.backend.calls(), 8);
        assert_eq!(proxy.cache().len().await, 1);
        proxy.cache().assert_consistent().await;
    }
}
