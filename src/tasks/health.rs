//! Connection Health Check Task
//!
//! Background task that periodically pings the shared store connection so a
//! broken connection shows up in the logs before requests start failing.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::store::KvStore;

/// Spawns a background task that pings the store every `interval`.
///
/// A failed ping is logged and the task keeps running; reconnection is left
/// to the store client. Returns `None` when `interval` is zero.
///
/// The returned handle is aborted during shutdown.
pub fn spawn_health_check_task(
    store: Arc<dyn KvStore>,
    interval: Duration,
) -> Option<JoinHandle<()>> {
    if interval.is_zero() {
        info!("Store health check disabled");
        return None;
    }

    Some(tokio::spawn(async move {
        info!("Starting store health check with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            match store.ping().await {
                Ok(()) => debug!("Store health check: ok"),
                Err(e) => warn!(kind = e.kind(), "Store health check failed: {}", e),
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::error::{StoreError, StoreResult};

    /// Store that only answers pings, failing every other one.
    #[derive(Default)]
    struct PingCounter {
        pings: AtomicUsize,
    }

    #[async_trait]
    impl KvStore for PingCounter {
        async fn set(&self, _: &str, _: &str) -> StoreResult<String> {
            unreachable!()
        }
        async fn get(&self, _: &str) -> StoreResult<Option<String>> {
            unreachable!()
        }
        async fn delete(&self, _: &str) -> StoreResult<i64> {
            unreachable!()
        }
        async fn hset_many(&self, _: &str, _: &[(String, String)]) -> StoreResult<i64> {
            unreachable!()
        }
        async fn hgetall(&self, _: &str) -> StoreResult<HashMap<String, String>> {
            unreachable!()
        }
        async fn hget(&self, _: &str, _: &str) -> StoreResult<Option<String>> {
            unreachable!()
        }
        async fn hset(&self, _: &str, _: &str, _: &str) -> StoreResult<i64> {
            unreachable!()
        }
        async fn hdel(&self, _: &str, _: &str) -> StoreResult<i64> {
            unreachable!()
        }
        async fn ping(&self) -> StoreResult<()> {
            let n = self.pings.fetch_add(1, Ordering::SeqCst);
            if n % 2 == 1 {
                return Err(StoreError::Connection("connection reset".to_string()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_health_check_pings_repeatedly() {
        let store = Arc::new(PingCounter::default());

        let handle = spawn_health_check_task(store.clone(), Duration::from_millis(20))
            .expect("task should be spawned");

        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.abort();

        // Failed pings do not stop the task.
        assert!(store.pings.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_health_check_disabled_with_zero_interval() {
        let store = Arc::new(PingCounter::default());

        assert!(spawn_health_check_task(store.clone(), Duration::ZERO).is_none());
        assert_eq!(store.pings.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_awaiting_aborted_task_releases_store_handle() {
        let store = Arc::new(PingCounter::default());

        let handle =
            spawn_health_check_task(store.clone(), Duration::from_secs(3600)).unwrap();
        assert_eq!(Arc::strong_count(&store), 2);

        handle.abort();
        let _ = handle.await;

        assert_eq!(Arc::strong_count(&store), 1);
    }

    #[tokio::test]
    async fn test_health_check_can_be_aborted() {
        let store = Arc::new(PingCounter::default());

        let handle = spawn_health_check_task(store, Duration::from_secs(1)).unwrap();

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
