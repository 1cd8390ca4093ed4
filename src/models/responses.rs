//! Response DTOs for the restaurant API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::config::Config;
use crate::store::Order;

/// Acknowledgement for mutations that return no data
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Response body for `POST /api/orders`
#[derive(Debug, Clone, Serialize)]
pub struct OrderCreatedResponse {
    pub success: bool,
    /// The stored order, including its assigned id
    pub order: Order,
}

impl OrderCreatedResponse {
    pub fn new(order: Order) -> Self {
        Self {
            success: true,
            order,
        }
    }
}

/// Cache statistics as reported by `/api/health` and `/api/stats`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Percentage with one decimal, e.g. `"82.5%"`
    pub hit_rate: String,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate_percent(),
            size: stats.size,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
        }
    }
}

/// Concurrency settings shown by the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionSettings {
    pub max_workers: usize,
    /// e.g. `"200/60s"`
    pub rate_limit: String,
}

/// Response body for `GET /api/health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in RFC 3339 format
    pub timestamp: String,
    pub uptime_secs: u64,
    /// Requests the caller may still make in the current window
    pub rate_limit_remaining: usize,
    pub cache_stats: CacheStatsResponse,
    pub connections: ConnectionSettings,
}

impl HealthResponse {
    pub fn healthy(
        config: &Config,
        uptime_secs: u64,
        rate_limit_remaining: usize,
        cache_stats: CacheStats,
    ) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_secs,
            rate_limit_remaining,
            cache_stats: cache_stats.into(),
            connections: ConnectionSettings {
                max_workers: config.max_workers,
                rate_limit: config.rate_limit_label(),
            },
        }
    }
}

/// Server limits shown by the stats endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ServerSettings {
    pub max_workers: usize,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: usize,
    pub rate_limit: usize,
    pub rate_limit_window_secs: u64,
    pub max_body_size: usize,
}

/// Response body for `GET /api/stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub cache: CacheStatsResponse,
    /// Distinct client keys held by the rate limiter
    pub rate_limited_clients: usize,
    pub settings: ServerSettings,
}

impl StatsResponse {
    pub fn new(config: &Config, cache_stats: CacheStats, rate_limited_clients: usize) -> Self {
        Self {
            cache: cache_stats.into(),
            rate_limited_clients,
            settings: ServerSettings {
                max_workers: config.max_workers,
                cache_ttl_secs: config.cache_ttl.as_secs(),
                cache_max_entries: config.cache_max_entries,
                rate_limit: config.rate_limit_requests,
                rate_limit_window_secs: config.rate_limit_window.as_secs(),
                max_body_size: config.max_body_size,
            },
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
