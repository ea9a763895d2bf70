//! Request de-duplication: identical concurrent requests share one call.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tracing::debug;

/// Failure of a shared store call, as seen by every waiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreFailure {
    #[error("store request timed out")]
    TimedOut,
    #[error("{0}")]
    Failed(String),
}

impl StoreFailure {
    fn from_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<reqwest::Error>() {
            Some(e) if e.is_timeout() => Self::TimedOut,
            _ => Self::Failed(format!("{error:#}")),
        }
    }
}

/// True when the store did not answer within the configured timeout.
pub fn is_timeout(error: &anyhow::Error) -> bool {
    matches!(error.downcast_ref::<StoreFailure>(), Some(StoreFailure::TimedOut))
}

type SharedCall = Shared<BoxFuture<'static, Result<String, StoreFailure>>>;

/// Pending calls by key. Clones share the same map.
#[derive(Default, Clone)]
pub struct InFlight {
    pending: Arc<Mutex<HashMap<String, SharedCall>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `call` unless a call with the same key is already pending, in
    /// which case its result is awaited instead.
    ///
    /// The call runs on its own task and removes its key when it finishes,
    /// even if every waiter has gone away. Nothing outlives the call.
    pub async fn run<F, Fut>(&self, key: &str, call: F) -> anyhow::Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        let shared = {
            let mut pending = self.pending.lock().await;
            match pending.get(key) {
                Some(existing) => {
                    debug!(key, "joining in-flight store request");
                    existing.clone()
                }
                None => {
                    let shared = self.spawn_call(key.to_string(), call());
                    pending.insert(key.to_string(), shared.clone());
                    shared
                }
            }
        };

        shared.await.map_err(anyhow::Error::new)
    }

    fn spawn_call<Fut>(&self, key: String, call: Fut) -> SharedCall
    where
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        let pending = Arc::clone(&self.pending);
        // the entry is inserted under the lock held by `run`, so this removal always finds it
        let handle = tokio::spawn(async move {
            let result = call.await.map_err(|e| StoreFailure::from_error(&e));
            pending.lock().await.remove(&key);
            result
        });
        handle
            .map(|joined| match joined {
                Ok(result) => result,
                Err(e) => Err(StoreFailure::Failed(format!("store task failed: {e}"))),
            })
            .boxed()
            .shared()
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counted(calls: &Arc<AtomicUsize>, body: &'static str) -> impl Future<Output = anyhow::Result<String>> + Send + 'static {
        let calls = Arc::clone(calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(body.to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_identical_requests_share_one_call() {
        let in_flight = InFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            in_flight.run("k", || counted(&calls, "{\"success\":true}")),
            in_flight.run("k", || counted(&calls, "unused")),
        );

        assert_eq!(a.unwrap(), "{\"success\":true}");
        assert_eq!(b.unwrap(), "{\"success\":true}");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(in_flight.pending_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn sequential_requests_are_not_cached() {
        let in_flight = InFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        in_flight.run("k", || counted(&calls, "one")).await.unwrap();
        let second = in_flight.run("k", || counted(&calls, "two")).await.unwrap();

        assert_eq!(second, "two");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn different_keys_run_separately() {
        let in_flight = InFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            in_flight.run("pune", || counted(&calls, "pune")),
            in_flight.run("mumbai", || counted(&calls, "mumbai")),
        );

        assert_eq!((a.unwrap(), b.unwrap()), ("pune".to_string(), "mumbai".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn errors_reach_every_waiter() {
        let in_flight = InFlight::new();
        let (a, b) = tokio::join!(
            in_flight.run("k", || async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Err::<String, _>(anyhow::anyhow!("store unavailable"))
            }),
            in_flight.run("k", || async { Ok::<_, anyhow::Error>("never".to_string()) }),
        );
        assert_eq!(a.unwrap_err().to_string(), "store unavailable");
        let b = b.unwrap_err();
        assert_eq!(b.to_string(), "store unavailable");
        assert!(!is_timeout(&b));
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_call_still_releases_its_key() {
        let in_flight = InFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let abandoned = tokio::time::timeout(Duration::from_millis(10), in_flight.run("k", || counted(&calls, "first"))).await;
        assert!(abandoned.is_err());
        assert_eq!(in_flight.pending_count().await, 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(in_flight.pending_count().await, 0);

        let fresh = in_flight.run("k", || async { Ok::<_, anyhow::Error>("fresh".to_string()) }).await.unwrap();
        assert_eq!(fresh, "fresh");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn late_joiner_gets_result_after_first_caller_left() {
        let in_flight = InFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let _ = tokio::time::timeout(Duration::from_millis(10), in_flight.run("k", || counted(&calls, "shared"))).await;
        let joined = in_flight.run("k", || counted(&calls, "unused")).await.unwrap();

        assert_eq!(joined, "shared");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(in_flight.pending_count().await, 0);
    }
}
