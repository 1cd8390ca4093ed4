//! Shared Cache Handle
//!
//! Wraps a [`CacheStore`] in a single coarse mutex so it can be shared across
//! request-handling tasks behind an `Arc`.

use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;

// == Cache ==
/// Thread-safe cache. Every operation is one critical section over the whole map.
///
/// The passive sweep triggered by [`Cache::get`] runs on the guard already held
/// by the caller, so no lock re-entry is needed.
#[derive(Debug)]
pub struct Cache<V> {
    inner: Mutex<CacheStore<V>>,
}

impl<V: Clone> Cache<V> {
    pub fn new(max_entries: usize, ttl: Duration, cleanup_interval: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheStore::new(max_entries, ttl, cleanup_interval)),
        }
    }

    /// Creates a cache sized and timed from the server configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.cache_max_entries,
            config.cache_ttl,
            config.cleanup_interval,
        )
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.lock().get(key)
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.inner.lock().set(key.into(), value);
    }

    pub fn invalidate(&self, pattern: Option<&str>) -> usize {
        self.inner.lock().invalidate(pattern)
    }

    pub fn cleanup_expired(&self) -> usize {
        self.inner.lock().cleanup_expired()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn ttl(&self) -> Duration {
        self.inner.lock().ttl()
    }
}
