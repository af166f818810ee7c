use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};

struct Entry {
    body: String,
    inserted_at: Instant,
}

/// TTL-bounded cache of serialized response bodies. The forecast endpoint is
/// the only writer; entries expire on read, there is no background eviction.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    build_lock: Arc<Mutex<()>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            build_lock: Arc::new(Mutex::new(())),
            ttl,
        }
    }

    /// Return the cached body for `key`, running `producer` on a miss.
    /// Concurrent misses coalesce behind the build lock so the producer runs
    /// once per expiry window.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, producer: F) -> anyhow::Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<String>>,
    {
        if let Some(body) = self.lookup(key).await {
            return Ok(body);
        }

        let _guard = self.build_lock.lock().await;
        // Another caller may have filled the entry while we waited.
        if let Some(body) = self.lookup(key).await {
            return Ok(body);
        }

        let body = producer().await?;
        self.entries.write().await.insert(
            key.to_string(),
            Entry {
                body: body.clone(),
                inserted_at: Instant::now(),
            },
        );
        Ok(body)
    }

    async fn lookup(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|e| e.inserted_at.elapsed() < self.ttl)
            .map(|e| e.body.clone())
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn second_read_within_ttl_hits_cache() {
        let cache = ResponseCache::new(Duration::from_secs(3600));
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let body = cache
                .get_or_compute("k", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("payload".to_string())
                })
                .await
                .unwrap();
            assert_eq!(body, "payload");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clear_forces_recomputation() {
        let cache = ResponseCache::new(Duration::from_secs(3600));
        let calls = AtomicUsize::new(0);

        cache
            .get_or_compute("k", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("payload".to_string())
            })
            .await
            .unwrap();
        cache.clear().await;
        cache
            .get_or_compute("k", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("payload".to_string())
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_ttl_always_recomputes() {
        let cache = ResponseCache::new(Duration::from_secs(0));
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            cache
                .get_or_compute("k", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("payload".to_string())
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_misses_run_producer_once() {
        let cache = ResponseCache::new(Duration::from_secs(3600));
        let calls = Arc::new(AtomicUsize::new(0));

        let make = |cache: ResponseCache, calls: Arc<AtomicUsize>| async move {
            cache
                .get_or_compute("k", move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Ok("payload".to_string())
                })
                .await
                .unwrap()
        };

        let (a, b) = tokio::join!(
            make(cache.clone(), calls.clone()),
            make(cache.clone(), calls.clone())
        );

        assert_eq!(a, b);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn producer_error_leaves_cache_empty() {
        let cache = ResponseCache::new(Duration::from_secs(3600));

        let err = cache
            .get_or_compute("k", || async { anyhow::bail!("model unavailable") })
            .await;
        assert!(err.is_err());

        let body = cache
            .get_or_compute("k", || async { Ok("recovered".to_string()) })
            .await
            .unwrap();
        assert_eq!(body, "recovered");
    }
}
