//! Restaurant Server - orders and tables over HTTP
//!
//! A shared dataset served to many concurrent clients, backed by a TTL cache,
//! a sliding-window rate limiter and a crash-safe JSON file store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod limiter;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::Cache;
pub use config::Config;
pub use error::{Result, ServerError};
pub use limiter::RateLimiter;
pub use store::{DurableStore, PersistedState};
pub use tasks::spawn_cleanup_task;
