//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and frequency-biased eviction.

mod entry;
mod eviction;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use eviction::{least_accessed, quartile_victims};
pub use shared::Cache;
pub use stats::CacheStats;
pub use store::CacheStore;
