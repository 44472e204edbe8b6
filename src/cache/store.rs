//! Cache Store Module
//!
//! Main cache engine: an `LruTable` behind a single reader/writer lock, with
//! lazy promotion on reads and sampled background expiry.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::trace;

use crate::cache::{CacheStats, LocalCache, Lookup, LruTable, StatsCounters, Sweep};
use crate::tasks::{spawn_reclaim_task, ReclaimOptions};

// == Public Constants ==
/// Fraction of the TTL that must elapse between two promotions of an entry.
pub const PROMOTION_WINDOW_FRACTION: f64 = 0.05;

/// Keys drawn per background reclamation sample.
pub const DEFAULT_SAMPLE_SIZE: usize = 20;

/// Pause between background reclamation cycles (10 per second).
pub const DEFAULT_RECLAIM_INTERVAL: Duration = Duration::from_millis(100);

/// Bounds applied to a configured reclamation interval.
pub const MIN_RECLAIM_INTERVAL: Duration = Duration::from_millis(1);
pub const MAX_RECLAIM_INTERVAL: Duration = Duration::from_secs(86_400);

// == Store Options ==
/// Construction parameters for a `CacheStore`.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Maximum number of resident entries (values below 1 are raised to 1)
    pub capacity: usize,
    /// Lifetime of every entry from its last `set`
    pub ttl: Duration,
    /// Keys drawn per reclamation sample (values below 1 are raised to 1)
    pub sample_size: usize,
    /// Pause between reclamation cycles, clamped to
    /// `MIN_RECLAIM_INTERVAL..=MAX_RECLAIM_INTERVAL`
    pub reclaim_interval: Duration,
}

impl StoreOptions {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            sample_size: DEFAULT_SAMPLE_SIZE,
            reclaim_interval: DEFAULT_RECLAIM_INTERVAL,
        }
    }
}

// == Store Inner ==
/// State shared between store handles and the reclamation worker.
#[derive(Debug)]
pub(crate) struct StoreInner {
    table: RwLock<LruTable>,
    stats: StatsCounters,
    capacity: usize,
    ttl: Duration,
    promotion_window: Duration,
}

impl StoreInner {
    // == Sample Keys ==
    /// Draws up to `amount` resident keys under the read lock.
    pub(crate) async fn sample_keys(&self, amount: usize) -> Vec<String> {
        let table = self.table.read().await;
        table.sample_keys(&mut rand::thread_rng(), amount)
    }

    // == Sweep ==
    /// Removes every expired key in `sample` under one write lock.
    ///
    /// Keys that are expired or no longer resident are dropped from the
    /// sample; live keys stay for the next sweep. Returns the number removed.
    pub(crate) async fn sweep(&self, sample: &mut Vec<String>) -> usize {
        let mut removed = 0;
        {
            let mut table = self.table.write().await;
            let now = Instant::now();
            sample.retain(|key| match table.remove_if_expired(key, now) {
                Sweep::Live => true,
                Sweep::Removed => {
                    removed += 1;
                    false
                }
                Sweep::Missing => false,
            });
        }

        if removed > 0 {
            self.stats.record_expired(removed as u64);
        }
        removed
    }
}

// == Cache Store ==
/// Bounded LRU cache with a fixed per-entry TTL.
///
/// Cloning yields another handle to the same store. Reads that neither find
/// an expired entry nor need a promotion only take the read lock; every
/// structural change takes the write lock. An entry read within its
/// promotion window keeps its position, so eviction order approximates LRU
/// rather than tracking every read.
#[derive(Debug, Clone)]
pub struct CacheStore {
    pub(crate) inner: Arc<StoreInner>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new store with the given capacity and TTL and starts its
    /// background reclamation worker.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self::with_options(StoreOptions::new(capacity, ttl))
    }

    /// Creates a new store from explicit options.
    ///
    /// The reclamation worker starts immediately and runs until every handle
    /// to this store has been dropped; it has no other stop signal. Its
    /// interval is clamped to `MIN_RECLAIM_INTERVAL..=MAX_RECLAIM_INTERVAL`.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn with_options(options: StoreOptions) -> Self {
        let table = LruTable::new(options.capacity);
        let inner = Arc::new(StoreInner {
            capacity: table.capacity(),
            table: RwLock::new(table),
            stats: StatsCounters::new(),
            ttl: options.ttl,
            promotion_window: options.ttl.mul_f64(PROMOTION_WINDOW_FRACTION),
        });

        spawn_reclaim_task(
            Arc::downgrade(&inner),
            ReclaimOptions {
                sample_size: options.sample_size.max(1),
                interval: options
                    .reclaim_interval
                    .clamp(MIN_RECLAIM_INTERVAL, MAX_RECLAIM_INTERVAL),
            },
        );

        Self { inner }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed on sight. A hit more than one promotion
    /// window after the entry's last promotion moves it to the hot end.
    pub async fn get(&self, key: &str) -> Option<String> {
        let lookup = {
            let table = self.inner.table.read().await;
            table.lookup(key, Instant::now(), self.inner.promotion_window)
        };

        match lookup {
            Lookup::Missing => {
                self.inner.stats.record_miss();
                None
            }
            Lookup::Hit {
                value,
                promote: false,
            } => {
                self.inner.stats.record_hit();
                Some(value)
            }
            Lookup::Expired | Lookup::Hit { promote: true, .. } => {
                self.get_exclusive(key).await
            }
        }
    }

    /// Re-evaluates `key` under the write lock; the entry and the clock may
    /// have moved on since the read lock was released.
    async fn get_exclusive(&self, key: &str) -> Option<String> {
        let mut table = self.inner.table.write().await;
        let now = Instant::now();

        match table.lookup(key, now, self.inner.promotion_window) {
            Lookup::Missing => {
                self.inner.stats.record_miss();
                None
            }
            Lookup::Expired => {
                table.remove(key);
                self.inner.stats.record_expired(1);
                self.inner.stats.record_miss();
                trace!("Removed expired key {} on read", key);
                None
            }
            Lookup::Hit { value, promote } => {
                if promote && table.promote(key, now) {
                    self.inner.stats.record_promotion();
                    trace!("Promoted key {}", key);
                }
                self.inner.stats.record_hit();
                Some(value)
            }
        }
    }

    // == Set ==
    /// Stores a key-value pair, expiring one TTL from now.
    ///
    /// If the key already exists, the value is overwritten and its TTL reset.
    /// A new key arriving at capacity evicts the least recently promoted entry.
    pub async fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let evicted = {
            let mut table = self.inner.table.write().await;
            table.insert(key.into(), value.into(), Instant::now(), self.inner.ttl)
        };

        if evicted.is_some() {
            self.inner.stats.record_eviction();
        }
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let len = self.len().await;
        self.inner.stats.snapshot(len, self.inner.capacity)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub async fn len(&self) -> usize {
        self.inner.table.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.table.read().await.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    pub fn promotion_window(&self) -> Duration {
        self.inner.promotion_window
    }

    // == Keys By Recency ==
    /// Resident keys from most to least recently promoted, for diagnostics.
    pub async fn keys_by_recency(&self) -> Vec<String> {
        self.inner.table.read().await.keys_by_recency()
    }

    #[cfg(test)]
    pub(crate) async fn assert_consistent(&self) {
        self.inner.table.read().await.assert_consistent();
    }
}

#[async_trait]
impl LocalCache for CacheStore {
    async fn get(&self, key: &str) -> Option<String> {
        CacheStore::get(self, key).await
    }

    async fn set(&self, key: String, value: String) {
        CacheStore::set(self, key, value).await
    }
}
