//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with frequency-biased eviction
//! and TTL expiration. `CacheStore` is not synchronized; see [`Cache`] for the
//! shared, lock-guarded handle.
//!
//! [`Cache`]: crate::cache::Cache

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::eviction::{least_accessed, quartile_victims};
use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Main cache storage with quartile eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Time-to-live applied to every entry
    ttl: Duration,
    /// Minimum spacing between passive expiry sweeps
    cleanup_interval: Duration,
    /// When the last sweep ran
    last_cleanup: Instant,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries (a value of 0 is treated as 1)
    /// * `ttl` - Lifetime of every entry
    /// * `cleanup_interval` - Minimum time between passive sweeps triggered by `get`
    pub fn new(max_entries: usize, ttl: Duration, cleanup_interval: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
            ttl,
            cleanup_interval,
            last_cleanup: Instant::now(),
        }
    }

    // == Set ==
    /// Stores a value, resetting its age and access count.
    ///
    /// When the cache is at capacity, the lowest-count quarter of entries is
    /// evicted first. If that still leaves no room for a new key, the single
    /// least-accessed entry goes as well.
    pub fn set(&mut self, key: String, value: V) {
        if self.entries.len() >= self.max_entries {
            self.evict();

            if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
                if let Some(victim) = least_accessed(&self.entries) {
                    self.entries.remove(&victim);
                    self.stats.record_evictions(1);
                }
            }
        }

        self.entries.insert(key, CacheEntry::new(value));
        self.stats.set_size(self.entries.len());
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Runs the passive sweep when it is due. Expired entries are removed and
    /// counted as misses.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Instant::now();
        self.auto_cleanup(now);

        let expired = match self.entries.get_mut(key) {
            Some(entry) if !entry.is_expired_at(now, self.ttl) => {
                entry.touch();
                let value = entry.value.clone();
                self.stats.record_hit();
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_expirations(1);
            self.stats.set_size(self.entries.len());
        }
        self.stats.record_miss();
        None
    }

    // == Invalidate ==
    /// Removes every key containing `pattern` as a substring, or every key when
    /// `pattern` is `None`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&mut self, pattern: Option<&str>) -> usize {
        let removed = match pattern {
            Some(pattern) => {
                let before = self.entries.len();
                self.entries.retain(|key, _| !key.contains(pattern));
                before - self.entries.len()
            }
            None => {
                let count = self.entries.len();
                self.entries.clear();
                count
            }
        };

        self.stats.set_size(self.entries.len());
        removed
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        self.last_cleanup = now;

        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now, ttl));
        let removed = before - self.entries.len();

        self.stats.record_expirations(removed);
        self.stats.set_size(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_size(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the access count of a live entry without counting a hit.
    pub fn access_count(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|entry| entry.access_count)
    }

    fn auto_cleanup(&mut self, now: Instant) {
        if now.saturating_duration_since(self.last_cleanup) < self.cleanup_interval {
            return;
        }
        let removed = self.cleanup_expired();
        if removed > 0 {
            debug!(removed, "Passive sweep removed expired entries");
        }
    }

    fn evict(&mut self) -> usize {
        let victims = quartile_victims(&self.entries);
        for key in &victims {
            self.entries.remove(key);
        }
        self.stats.record_evictions(victims.len());
        victims.len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const LONG_TTL: Duration = Duration::from_secs(300);
    const LONG_INTERVAL: Duration = Duration::from_secs(60);

    fn store(max_entries: usize) -> CacheStore<String> {
        CacheStore::new(max_entries, LONG_TTL, LONG_INTERVAL)
    }

    #[test]
    fn test_store_new() {
        let store = store(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
    }

    #[test]
    fn test_store_zero_capacity_is_clamped() {
        let mut store = store(0);
        store.set("a".to_string(), "1".to_string());
        store.set("b".to_string(), "2".to_string());
        assert_eq!(store.capacity(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = store(100);

        store.set("key1".to_string(), "value1".to_string());

        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store(100);
        assert_eq!(store.get("nonexistent"), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_overwrite_resets_access_count() {
        let mut store = store(100);

        store.set("key1".to_string(), "value1".to_string());
        store.get("key1");
        store.get("key1");
        assert_eq!(store.access_count("key1"), Some(3));

        store.set("key1".to_string(), "value2".to_string());
        assert_eq!(store.access_count("key1"), Some(1));
        assert_eq!(store.get("key1"), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(100, Duration::from_millis(50), LONG_INTERVAL);

        store.set("key1".to_string(), "value1".to_string());
        assert!(store.get("key1").is_some());

        sleep(Duration::from_millis(80));

        assert_eq!(store.get("key1"), None);
        assert!(store.is_empty(), "Expired entry should be deleted on read");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expirations, 1);
    }

    #[test]
    fn test_store_evicts_least_accessed_at_capacity() {
        let mut store = store(4);

        for key in ["a", "b", "c", "d"] {
            store.set(key.to_string(), key.to_uppercase());
        }
        // b, c and d gain hits; a stays at 1
        for key in ["b", "c", "d", "c", "d", "d"] {
            store.get(key);
        }

        store.set("e".to_string(), "E".to_string());

        assert_eq!(store.len(), 4);
        assert_eq!(store.access_count("a"), None);
        assert!(store.access_count("b").is_some());
        assert!(store.access_count("e").is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_evicts_a_quarter_of_a_large_cache() {
        let mut store = store(8);
        for i in 0..8 {
            store.set(format!("key{i}"), i.to_string());
        }
        for i in 2..8 {
            store.get(&format!("key{i}"));
        }

        store.set("new".to_string(), "value".to_string());

        assert_eq!(store.len(), 7);
        assert_eq!(store.access_count("key0"), None);
        assert_eq!(store.access_count("key1"), None);
    }

    #[test]
    fn test_store_small_capacity_never_exceeded() {
        let mut store = store(2);
        store.set("a".to_string(), "1".to_string());
        store.set("b".to_string(), "2".to_string());
        store.get("b");

        store.set("c".to_string(), "3".to_string());

        assert_eq!(store.len(), 2);
        assert_eq!(store.access_count("a"), None);
        assert!(store.access_count("b").is_some());
    }

    #[test]
    fn test_store_invalidate_pattern() {
        let mut store = store(100);
        store.set("orders".to_string(), "o".to_string());
        store.set("orders:today".to_string(), "t".to_string());
        store.set("tables".to_string(), "t".to_string());

        let removed = store.invalidate(Some("orders"));

        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert!(store.access_count("tables").is_some());
    }

    #[test]
    fn test_store_invalidate_all() {
        let mut store = store(100);
        store.set("a".to_string(), "1".to_string());
        store.set("b".to_string(), "2".to_string());

        assert_eq!(store.invalidate(None), 2);
        assert!(store.is_empty());
        assert_eq!(store.stats().size, 0);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = CacheStore::new(100, Duration::from_millis(50), LONG_INTERVAL);

        store.set("key1".to_string(), "value1".to_string());
        sleep(Duration::from_millis(80));
        store.set("key2".to_string(), "value2".to_string());

        let removed = store.cleanup_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("key2").is_some());
    }

    #[test]
    fn test_get_triggers_passive_sweep_when_due() {
        let mut store = CacheStore::new(100, Duration::from_millis(30), Duration::from_millis(40));

        store.set("stale1".to_string(), "x".to_string());
        store.set("stale2".to_string(), "y".to_string());
        sleep(Duration::from_millis(60));

        // A lookup of an unrelated key sweeps both stale entries.
        assert_eq!(store.get("other"), None);
        assert!(store.is_empty());
        assert_eq!(store.stats().expirations, 2);
    }

    #[test]
    fn test_get_skips_sweep_before_interval() {
        let mut store = CacheStore::new(100, Duration::from_millis(30), LONG_INTERVAL);

        store.set("stale".to_string(), "x".to_string());
        sleep(Duration::from_millis(60));

        assert_eq!(store.get("other"), None);
        assert_eq!(store.len(), 1, "Sweep should not run before its interval");
    }

    #[test]
    fn test_store_stats() {
        let mut store = store(100);

        store.set("key1".to_string(), "value1".to_string());
        store.get("key1");
        store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }
}
