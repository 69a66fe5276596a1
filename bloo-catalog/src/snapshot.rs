use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::warn;

#[derive(Debug)]
struct Snapshot<T> {
    fetched_at: Instant,
    value: Arc<T>,
}

/// Holds one immutable value that is re-fetched wholesale once it is older
/// than the TTL.
///
/// Concurrent callers that observe an expired snapshot may each run the
/// loader; the loaded values are interchangeable, so the last one wins.
#[derive(Debug)]
pub struct SnapshotCache<T> {
    ttl: Duration,
    slot: RwLock<Option<Snapshot<T>>>,
}

impl<T> SnapshotCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached snapshot, refreshing it through `loader` when it is
    /// missing or expired.
    ///
    /// A failed refresh keeps serving the previous snapshot (restamped, so the
    /// next attempt happens after another TTL) and yields `None` only when
    /// nothing was ever loaded.
    pub async fn get_or_refresh<F, Fut>(&self, label: &str, loader: F) -> Option<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        {
            let slot = self.slot.read().await;
            if let Some(snapshot) = slot.as_ref()
                && snapshot.fetched_at.elapsed() < self.ttl
            {
                return Some(Arc::clone(&snapshot.value));
            }
        }

        match loader().await {
            Ok(value) => {
                let value = Arc::new(value);
                *self.slot.write().await = Some(Snapshot {
                    fetched_at: Instant::now(),
                    value: Arc::clone(&value),
                });
                Some(value)
            }
            Err(err) => {
                let mut slot = self.slot.write().await;
                match slot.as_mut() {
                    Some(snapshot) => {
                        warn!(?err, catalog = label, "catalog refresh failed; serving previous snapshot");
                        snapshot.fetched_at = Instant::now();
                        Some(Arc::clone(&snapshot.value))
                    }
                    None => {
                        warn!(?err, catalog = label, "catalog fetch failed and nothing is cached");
                        None
                    }
                }
            }
        }
    }

    /// Drop the current snapshot so the next read fetches.
    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::SnapshotCache;

    #[tokio::test]
    async fn fresh_snapshot_is_reused() {
        let cache = SnapshotCache::new(Duration::from_secs(3600));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_refresh("test", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![1, 2, 3])
                })
                .await;
            assert_eq!(value.as_deref(), Some(&vec![1, 2, 3]));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_snapshot_is_refetched() {
        let cache = SnapshotCache::new(Duration::ZERO);
        let calls = AtomicUsize::new(0);

        for expected in 1..=2 {
            let value = cache
                .get_or_refresh("test", || async {
                    Ok(calls.fetch_add(1, Ordering::SeqCst) + 1)
                })
                .await;
            assert_eq!(value.as_deref(), Some(&expected));
        }
    }

    #[tokio::test]
    async fn failed_refresh_serves_stale_snapshot() {
        let cache = SnapshotCache::new(Duration::ZERO);

        let first = cache.get_or_refresh("test", || async { Ok("first") }).await;
        assert_eq!(first.as_deref(), Some(&"first"));

        let second = cache
            .get_or_refresh("test", || async { Err(anyhow::anyhow!("offline")) })
            .await;
        assert_eq!(second.as_deref(), Some(&"first"));
    }

    #[tokio::test]
    async fn failed_first_fetch_yields_nothing() {
        let cache: SnapshotCache<String> = SnapshotCache::new(Duration::from_secs(60));

        let value = cache
            .get_or_refresh("test", || async { Err(anyhow::anyhow!("status 503")) })
            .await;
        assert!(value.is_none());

        let recovered = cache
            .get_or_refresh("test", || async { Ok("back".to_owned()) })
            .await;
        assert_eq!(recovered.as_deref().map(String::as_str), Some("back"));
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cache = SnapshotCache::new(Duration::from_secs(3600));
        let calls = AtomicUsize::new(0);
        let load = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        };

        cache.get_or_refresh("test", load).await;
        cache.invalidate().await;
        cache.get_or_refresh("test", load).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
