//! Rate Limiting Module
//!
//! Sliding-window admission control keyed by client.

mod sliding_window;

pub use sliding_window::RateLimiter;
