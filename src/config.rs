//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Shortest accepted spacing between cache expiry sweeps.
pub const MIN_CLEANUP_INTERVAL: Duration = Duration::from_secs(1);

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub cache_max_entries: usize,
    /// Lifetime of every cache entry
    pub cache_ttl: Duration,
    /// Minimum spacing between cache expiry sweeps
    pub cleanup_interval: Duration,
    /// Requests each client may make per rate-limit window
    pub rate_limit_requests: usize,
    /// Length of the sliding rate-limit window
    pub rate_limit_window: Duration,
    /// Number of requests handled concurrently; the rest wait in line
    pub max_workers: usize,
    /// Largest accepted request body in bytes
    pub max_body_size: usize,
    /// Address to bind
    pub server_host: String,
    /// HTTP server port
    pub server_port: u16,
    /// Backing JSON file for orders and tables
    pub data_file: PathBuf,
    /// Directory served for non-API paths
    pub static_dir: PathBuf,
    /// Number of tables in a freshly created dataset
    pub table_count: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL` - Cache entry lifetime in seconds (default: 30)
    /// - `CLEANUP_INTERVAL` - Expiry sweep spacing in seconds (default: 60, minimum: 1)
    /// - `RATE_LIMIT_REQUESTS` - Requests per client per window (default: 200)
    /// - `RATE_LIMIT_WINDOW` - Window length in seconds (default: 60)
    /// - `MAX_WORKERS` - Concurrent request ceiling (default: 100)
    /// - `MAX_BODY_SIZE` - Body limit in bytes (default: 2 MiB)
    /// - `SERVER_HOST` - Bind address (default: 127.0.0.1)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DATA_FILE` - Dataset path (default: restaurant_data.json)
    /// - `STATIC_DIR` - Static file root (default: .)
    /// - `TABLE_COUNT` - Tables in a new dataset (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cache_ttl: env_secs_or("CACHE_TTL", defaults.cache_ttl),
            cleanup_interval: env_secs_or("CLEANUP_INTERVAL", defaults.cleanup_interval)
                .max(MIN_CLEANUP_INTERVAL),
            rate_limit_requests: env_or("RATE_LIMIT_REQUESTS", defaults.rate_limit_requests),
            rate_limit_window: env_secs_or("RATE_LIMIT_WINDOW", defaults.rate_limit_window),
            max_workers: env_or("MAX_WORKERS", defaults.max_workers),
            max_body_size: env_or("MAX_BODY_SIZE", defaults.max_body_size),
            server_host: env_or("SERVER_HOST", defaults.server_host),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            data_file: env_or("DATA_FILE", defaults.data_file),
            static_dir: env_or("STATIC_DIR", defaults.static_dir),
            table_count: env_or("TABLE_COUNT", defaults.table_count),
        }
    }

    /// Human-readable rate limit, e.g. `"200/60s"`.
    pub fn rate_limit_label(&self) -> String {
        format!(
            "{}/{}s",
            self.rate_limit_requests,
            self.rate_limit_window.as_secs()
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_max_entries: 1000,
            cache_ttl: Duration::from_secs(30),
            cleanup_interval: Duration::from_secs(60),
            rate_limit_requests: 200,
            rate_limit_window: Duration::from_secs(60),
            max_workers: 100,
            max_body_size: 2 * 1024 * 1024,
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            data_file: PathBuf::from("restaurant_data.json"),
            static_dir: PathBuf::from("."),
            table_count: 10,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_secs_or(name: &str, default: Duration) -> Duration {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
