//! LRU Table Module
//!
//! Pairs the key index with the eviction order. Every operation takes the
//! current instant explicitly, so the table itself never reads a clock.

use std::collections::HashMap;
use std::time::Duration;

use rand::seq::IteratorRandom;
use rand::Rng;
use tokio::time::Instant;

use crate::cache::entry::deadline;
use crate::cache::{CacheEntry, LruList, SlotId};

// == Lookup Result ==
/// Outcome of a read-only lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Key is not resident
    Missing,
    /// Key is resident but past its expiry
    Expired,
    /// Key is resident and valid; `promote` is set once the promotion window
    /// since the last promotion has elapsed
    Hit { value: String, promote: bool },
}

// == Sweep Result ==
/// Outcome of checking a single key for expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    Missing,
    Removed,
    Live,
}

// == LRU Table ==
/// Key index and eviction order kept in one-to-one correspondence.
#[derive(Debug)]
pub struct LruTable {
    index: HashMap<String, SlotId>,
    order: LruList,
    capacity: usize,
}

impl LruTable {
    // == Constructor ==
    /// Creates an empty table holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        // Pre-size modestly; large capacities grow on demand
        let initial = capacity.min(1024);
        Self {
            index: HashMap::with_capacity(initial),
            order: LruList::with_capacity(initial),
            capacity,
        }
    }

    // == Lookup ==
    /// Looks up `key` without touching the eviction order.
    pub fn lookup(&self, key: &str, now: Instant, window: Duration) -> Lookup {
        let Some(entry) = self.index.get(key).and_then(|id| self.order.get(*id)) else {
            return Lookup::Missing;
        };

        if entry.is_expired(now) {
            return Lookup::Expired;
        }

        Lookup::Hit {
            value: entry.value.clone(),
            promote: entry.needs_promotion(now, window),
        }
    }

    // == Insert ==
    /// Inserts or overwrites `key`, placing it at the hot end.
    ///
    /// When a new key arrives at capacity, the coldest entry is evicted first
    /// and returned.
    pub fn insert(
        &mut self,
        key: String,
        value: String,
        now: Instant,
        ttl: Duration,
    ) -> Option<CacheEntry> {
        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.order.get_mut(id) {
                entry.value = value;
                entry.promoted_at = now;
                entry.expires_at = deadline(now, ttl);
            }
            self.order.move_to_front(id);
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.evict_coldest()
        } else {
            None
        };

        let id = self
            .order
            .push_front(CacheEntry::new(key.clone(), value, now, ttl));
        self.index.insert(key, id);

        evicted
    }

    // == Promote ==
    /// Moves `key` to the hot end and refreshes its promotion time.
    ///
    /// Returns false if the key is no longer resident.
    pub fn promote(&mut self, key: &str, now: Instant) -> bool {
        let Some(&id) = self.index.get(key) else {
            return false;
        };
        if let Some(entry) = self.order.get_mut(id) {
            entry.promoted_at = now;
        }
        self.order.move_to_front(id);
        true
    }

    // == Remove ==
    /// Removes `key` from both the index and the order.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let id = self.index.remove(key)?;
        self.order.remove(id)
    }

    // == Remove If Expired ==
    /// Removes `key` only if it has expired at `now`.
    pub fn remove_if_expired(&mut self, key: &str, now: Instant) -> Sweep {
        let expired = match self.index.get(key).and_then(|id| self.order.get(*id)) {
            None => return Sweep::Missing,
            Some(entry) => entry.is_expired(now),
        };

        if expired {
            self.remove(key);
            Sweep::Removed
        } else {
            Sweep::Live
        }
    }

    // == Sample Keys ==
    /// Draws up to `amount` resident keys using reservoir sampling.
    pub fn sample_keys<R: Rng + ?Sized>(&self, rng: &mut R, amount: usize) -> Vec<String> {
        self.index
            .keys()
            .choose_multiple(rng, amount)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Length ==
    /// Number of resident entries, derived from the index.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys ordered from the hot end to the cold end.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.order.iter().map(|(_, entry)| entry.key.clone()).collect()
    }

    fn evict_coldest(&mut self) -> Option<CacheEntry> {
        let entry = self.order.pop_back()?;
        self.index.remove(&entry.key);
        tracing::trace!("Evicted key {} at capacity {}", entry.key, self.capacity);
        Some(entry)
    }

    /// Asserts the index and order are in one-to-one correspondence.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.index.len(), self.order.len(), "index/order size drift");
        assert!(self.index.len() <= self.capacity, "capacity exceeded");

        let mut seen = std::collections::HashSet::new();
        for (id, entry) in self.order.iter() {
            assert!(seen.insert(entry.key.clone()), "duplicate node for {}", entry.key);
            assert_eq!(
                self.index.get(&entry.key),
                Some(&id),
                "index does not point at node for {}",
                entry.key
            );
        }
        assert_eq!(seen.len(), self.order.len(), "order list is not fully linked");
    }
}
