//! Sliding Window Rate Limiter
//!
//! Per-client admission control counting only requests inside a trailing window.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::config::Config;

// == Rate Limiter ==
/// Tracks request timestamps per client key behind one mutex.
///
/// Client entries are never removed, so the map grows with every distinct key
/// ever seen. Pruning only trims the timestamps of the client being checked.
#[derive(Debug)]
pub struct RateLimiter {
    /// Client key to in-window request timestamps, oldest first
    requests: Mutex<HashMap<String, VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.rate_limit_requests, config.rate_limit_window)
    }

    // == Is Allowed ==
    /// Admits or rejects one request from `client`.
    ///
    /// A rejected request is not recorded and does not extend the window.
    pub fn is_allowed(&self, client: &str) -> bool {
        let now = Instant::now();
        let mut requests = self.requests.lock();
        let timestamps = requests.entry(client.to_string()).or_default();

        prune(timestamps, now, self.window);

        if timestamps.len() >= self.max_requests {
            return false;
        }
        timestamps.push_back(now);
        true
    }

    // == Remaining ==
    /// Requests `client` may still make in the current window. Read-only.
    pub fn remaining(&self, client: &str) -> usize {
        let now = Instant::now();
        let requests = self.requests.lock();
        let used = requests
            .get(client)
            .map(|timestamps| in_window(timestamps, now, self.window).count())
            .unwrap_or(0);
        self.max_requests.saturating_sub(used)
    }

    // == Retry After ==
    /// Time until the oldest in-window request of `client` leaves the window.
    ///
    /// Zero when the client has no requests inside the window.
    pub fn retry_after(&self, client: &str) -> Duration {
        let now = Instant::now();
        let requests = self.requests.lock();
        requests
            .get(client)
            .and_then(|timestamps| in_window(timestamps, now, self.window).next())
            .map(|oldest| self.window.saturating_sub(now.saturating_duration_since(*oldest)))
            .unwrap_or(Duration::ZERO)
    }

    /// [`retry_after`](Self::retry_after) in whole seconds for `Retry-After`.
    ///
    /// Rounded up and at least 1, so a client waiting this long is admitted.
    pub fn retry_after_secs(&self, client: &str) -> u64 {
        let wait = self.retry_after(client);
        let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
        secs.max(1)
    }

    /// Number of client keys held in memory.
    pub fn tracked_clients(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

fn prune(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = timestamps.front() {
        if now.saturating_duration_since(*oldest) < window {
            break;
        }
        timestamps.pop_front();
    }
}

fn in_window<'a>(
    timestamps: &'a VecDeque<Instant>,
    now: Instant,
    window: Duration,
) -> impl Iterator<Item = &'a Instant> + 'a {
    timestamps
        .iter()
        .filter(move |t| now.saturating_duration_since(**t) < window)
}
