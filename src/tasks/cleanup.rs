//! Cache Sweep Task
//!
//! Background task that periodically removes expired cache entries, so stale
//! data is dropped even when no lookups arrive to trigger the passive sweep.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Cache;

/// Spawns a task that sweeps `cache` every `interval`.
///
/// The returned handle is aborted during graceful shutdown.
pub fn spawn_cleanup_task<V>(cache: Arc<Cache<V>>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + 'static,
{
    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs(),
            "Starting cache cleanup task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired();
            if removed > 0 {
                info!(removed, "Cache cleanup removed expired entries");
            } else {
                debug!("Cache cleanup found no expired entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_lived_cache() -> Arc<Cache<String>> {
        Arc::new(Cache::new(
            100,
            Duration::from_millis(100),
            Duration::from_secs(3600),
        ))
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache = short_lived_cache();
        cache.set("expire_soon", "value".to_string());

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(cache.is_empty(), "Expired entry should have been swept");
        assert_eq!(cache.stats().misses, 0, "Sweeping must not count lookups");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let cache = Arc::new(Cache::new(
            100,
            Duration::from_secs(3600),
            Duration::from_secs(3600),
        ));
        cache.set("long_lived", "value".to_string());

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.get("long_lived"), Some("value".to_string()));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let handle = spawn_cleanup_task(short_lived_cache(), Duration::from_secs(1));

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
