//! Cache Entry Module
//!
//! Defines a single resident entry with its expiry and promotion timestamps.

use std::time::Duration;

use tokio::time::Instant;

/// Stand-in expiry for TTLs too large to add to the clock (about 30 years).
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Returns `now + ttl`, saturating to a far-future instant on overflow.
pub(crate) fn deadline(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The key this entry is indexed under
    pub key: String,
    /// The stored value
    pub value: String,
    /// Last time the entry was moved to the hot end of the eviction order
    pub promoted_at: Instant,
    /// Absolute expiry, fixed at insertion
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry inserted at `now`, living for `ttl`.
    pub fn new(key: String, value: String, now: Instant, ttl: Duration) -> Self {
        Self {
            key,
            value,
            promoted_at: now,
            expires_at: deadline(now, ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is still valid at exactly `expires_at` and expired any time
    /// after it.
    pub fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }

    // == Needs Promotion ==
    /// Checks whether strictly more than `window` has passed since the last
    /// promotion.
    pub fn needs_promotion(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.promoted_at) > window
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn entry_at(now: Instant, ttl: Duration) -> CacheEntry {
        CacheEntry::new("key".to_string(), "value".to_string(), now, ttl)
    }

    #[test]
    fn test_entry_creation() {
        let now = Instant::now();
        let entry = entry_at(now, Duration::from_secs(60));

        assert_eq!(entry.value, "value");
        assert_eq!(entry.promoted_at, now);
        assert_eq!(entry.expires_at, now + Duration::from_secs(60));
        assert!(!entry.is_expired(now));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = entry_at(now, Duration::from_millis(10));

        assert!(!entry.is_expired(now + Duration::from_millis(9)));
        // Still valid at exactly the expiry instant
        assert!(!entry.is_expired(now + Duration::from_millis(10)));
        assert!(entry.is_expired(now + Duration::from_millis(10) + Duration::from_nanos(1)));
        assert!(entry.is_expired(now + Duration::from_millis(11)));
    }

    #[test]
    fn test_zero_ttl_expires_after_insertion_instant() {
        let now = Instant::now();
        let entry = entry_at(now, Duration::ZERO);
        assert!(!entry.is_expired(now));
        assert!(entry.is_expired(now + Duration::from_nanos(1)));
    }

    #[test]
    fn test_huge_ttl_saturates_instead_of_overflowing() {
        let now = Instant::now();
        let entry = entry_at(now, Duration::from_secs(u64::MAX));

        assert!(entry.expires_at > now + Duration::from_secs(86_400 * 365));
        assert!(!entry.is_expired(now + Duration::from_secs(86_400 * 365)));
    }

    #[test]
    fn test_promotion_window_is_exclusive() {
        let now = Instant::now();
        let entry = entry_at(now, Duration::from_secs(3600));
        let window = Duration::from_secs(180);

        assert!(!entry.needs_promotion(now + window, window));
        assert!(entry.needs_promotion(now + window + Duration::from_millis(1), window));
    }
}
