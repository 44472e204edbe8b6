//! Cache Module
//!
//! Provides the in-memory LRU cache with TTL expiry and the capability
//! traits the proxy is composed from.

mod entry;
mod lru;
mod stats;
mod store;
mod table;
mod traits;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::{LruList, SlotId};
pub use stats::{CacheStats, StatsCounters};
pub use store::{
    CacheStore, StoreOptions, DEFAULT_RECLAIM_INTERVAL, DEFAULT_SAMPLE_SIZE, MAX_RECLAIM_INTERVAL,
    MIN_RECLAIM_INTERVAL, PROMOTION_WINDOW_FRACTION,
};
pub use table::{Lookup, LruTable, Sweep};
pub use traits::{KeyReader, LocalCache};

pub(crate) use store::StoreInner;
