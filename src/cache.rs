// =============================================================================
// TTL Fetch Cache
// =============================================================================
//
// Time-bounded cache standing in for proper invalidation: entries expire
// after a fixed TTL and are replaced on the next fetch.  Expiry is checked on
// read; there is no background eviction.  One cache instance per payload kind
// (history series, quotes), keyed by a caller-built string such as
// `"2330.TW|6mo|1d"`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

/// Thread-safe TTL cache over cloneable values.
pub struct TtlCache<V: Clone> {
    entries: RwLock<HashMap<String, (Instant, V)>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Fetch a live entry. Expired entries read as absent and stay in the map
    /// until overwritten.
    pub fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read();
        match entries.get(key) {
            Some((stored_at, value)) if stored_at.elapsed() < self.ttl => Some(value.clone()),
            _ => None,
        }
    }

    /// Insert or replace an entry, stamping it with the current instant.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        self.entries.write().insert(key.into(), (Instant::now(), value));
    }

    /// Number of stored entries, live or expired.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_returns_live_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn zero_ttl_entries_read_as_absent() {
        let cache = TtlCache::new(Duration::from_secs(0));
        cache.insert("a", 1);
        assert_eq!(cache.get("a"), None);
        // The stale entry is still stored until overwritten.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn insert_replaces_existing_entry() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("a", 2);
        assert_eq!(cache.get("a"), Some(2));
        assert_eq!(cache.len(), 1);
    }
}
