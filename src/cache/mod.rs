//! Query cache with per-resource staleness windows.
//!
//! Values are stored as serialized JSON keyed by [`QueryKey`]. A read
//! inside the staleness window is served from memory; a stale entry is
//! served immediately while a background task revalidates it; a miss
//! fetches inline. Mutations invalidate whole [`QueryScope`]s — there is
//! no versioning or conflict detection, the last server response wins.

use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::StalenessConfig;
use crate::errors::ApiError;

mod keys;

pub use keys::{QueryKey, QueryScope};

/// A cached value plus the moment it was fetched. Cloned verbatim for
/// optimistic snapshots, so restoring one is bit-identical.
#[derive(Debug, Clone)]
pub struct CachedValue {
    pub value: serde_json::Value,
    pub fetched_at: Instant,
}

pub struct QueryCache {
    // Behind an Arc so background revalidation tasks can outlive the
    // borrow that spawned them.
    entries: Arc<DashMap<QueryKey, CachedValue>>,
    generations: DashMap<QueryScope, u64>,
    windows: StalenessConfig,
}

impl QueryCache {
    pub fn new(windows: StalenessConfig) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            generations: DashMap::new(),
            windows,
        }
    }

    /// Cached value for `key` regardless of freshness. Never touches the
    /// network.
    pub fn peek<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entry = self.entries.get(key)?;
        serde_json::from_value(entry.value.clone()).ok()
    }

    pub fn insert<T: Serialize>(&self, key: QueryKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.insert(
                    key,
                    CachedValue {
                        value,
                        fetched_at: Instant::now(),
                    },
                );
            }
            Err(e) => warn!(error = %e, "failed to serialize value for cache"),
        }
    }

    /// Raw snapshot for rollback. `None` means the key was absent.
    pub fn snapshot(&self, key: &QueryKey) -> Option<CachedValue> {
        self.entries.get(key).map(|e| e.clone())
    }

    /// Restores a snapshot taken with [`snapshot`](Self::snapshot),
    /// removing the entry when the snapshot was `None`.
    pub fn restore(&self, key: QueryKey, snapshot: Option<CachedValue>) {
        match snapshot {
            Some(value) => {
                self.entries.insert(key, value);
            }
            None => {
                self.entries.remove(&key);
            }
        }
    }

    /// Edits a cached value in place without touching its freshness
    /// timestamp. Used for optimistic patches, which are provisional and
    /// must not extend an entry's lifetime. Returns false on a miss.
    pub fn mutate(&self, key: &QueryKey, edit: impl FnOnce(&mut serde_json::Value)) -> bool {
        match self.entries.get_mut(key) {
            Some(mut entry) => {
                edit(&mut entry.value);
                true
            }
            None => false,
        }
    }

    pub fn keys_in_scope(&self, scope: QueryScope) -> Vec<QueryKey> {
        self.entries
            .iter()
            .filter(|e| e.key().scope() == scope)
            .map(|e| e.key().clone())
            .collect()
    }

    /// Drops every entry in `scope` and bumps its generation marker, so
    /// the next read goes to the network.
    pub fn invalidate_scope(&self, scope: QueryScope) {
        let keys = self.keys_in_scope(scope);
        for key in keys {
            self.entries.remove(&key);
        }
        *self.generations.entry(scope).or_insert(0) += 1;
        debug!(?scope, "cache scope invalidated");
    }

    /// Drops every cached entry in every scope. Used when the signed-in
    /// user changes, so nothing cached leaks across sessions.
    pub fn invalidate_all(&self) {
        for scope in QueryScope::iter() {
            self.invalidate_scope(scope);
        }
    }

    /// Monotonic counter observable by callers that need to know a scope
    /// was refreshed (and by the invalidation-completeness tests).
    pub fn generation(&self, scope: QueryScope) -> u64 {
        self.generations.get(&scope).map(|g| *g).unwrap_or(0)
    }

    fn freshness(&self, key: &QueryKey) -> Freshness {
        match self.entries.get(key) {
            None => Freshness::Miss,
            Some(entry) => {
                if entry.fetched_at.elapsed() < self.windows.window(key.scope()) {
                    Freshness::Fresh
                } else {
                    Freshness::Stale
                }
            }
        }
    }

    /// Read-through fetch. Fresh hits never reach the network; stale hits
    /// return the cached value and revalidate in the background; misses
    /// fetch inline.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        match self.freshness(&key) {
            Freshness::Fresh => {
                debug!(?key, "cache hit (fresh)");
                // Entry cannot race away: invalidation between freshness
                // and peek just downgrades to a fetch.
                if let Some(value) = self.peek::<T>(&key) {
                    return Ok(value);
                }
                let value = fetch().await?;
                self.insert(key, &value);
                Ok(value)
            }
            Freshness::Stale => match self.peek::<T>(&key) {
                Some(value) => {
                    debug!(?key, "cache hit (stale), revalidating in background");
                    let entries = Arc::clone(&self.entries);
                    let future = fetch();
                    tokio::spawn(async move {
                        let fresh = match future.await {
                            Ok(fresh) => fresh,
                            Err(e) => {
                                warn!(error = %e, "background revalidation failed");
                                return;
                            }
                        };
                        match serde_json::to_value(&fresh) {
                            Ok(value) => {
                                entries.insert(
                                    key,
                                    CachedValue {
                                        value,
                                        fetched_at: Instant::now(),
                                    },
                                );
                            }
                            Err(e) => warn!(error = %e, "failed to serialize revalidated value"),
                        }
                    });
                    Ok(value)
                }
                // Undeserializable entry: drop it and fetch inline.
                None => {
                    self.entries.remove(&key);
                    let value = fetch().await?;
                    self.insert(key, &value);
                    Ok(value)
                }
            },
            Freshness::Miss => {
                debug!(?key, "cache miss");
                let value = fetch().await?;
                self.insert(key, &value);
                Ok(value)
            }
        }
    }

    /// Forces an inline fetch and cache update, bypassing freshness.
    /// Used for post-mutation reconciliation of the mutated product.
    pub async fn refetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let value = fetch().await?;
        self.insert(key, &value);
        Ok(value)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Freshness {
    Fresh,
    Stale,
    Miss,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{advance, Duration};

    fn tight_windows() -> StalenessConfig {
        StalenessConfig {
            productos_secs: 30,
            bodegas_secs: 300,
            stock_secs: 10,
            alertas_secs: 60,
            movimientos_secs: 60,
            kardex_secs: 300,
        }
    }

    fn stock_key() -> QueryKey {
        QueryKey::StockProducto(7)
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_read_skips_the_fetcher() {
        let cache = Arc::new(QueryCache::new(tight_windows()));
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            let value: i64 = cache
                .fetch(stock_key(), move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                })
                .await
                .unwrap();
            assert_eq!(value, 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_read_serves_cache_and_revalidates() {
        let cache = Arc::new(QueryCache::new(tight_windows()));
        let calls = Arc::new(AtomicUsize::new(0));

        let seed = Arc::clone(&calls);
        let _: i64 = cache
            .fetch(stock_key(), move || async move {
                seed.fetch_add(1, Ordering::SeqCst);
                Ok(20)
            })
            .await
            .unwrap();

        advance(Duration::from_secs(11)).await;

        let refresh = Arc::clone(&calls);
        let served: i64 = cache
            .fetch(stock_key(), move || async move {
                refresh.fetch_add(1, Ordering::SeqCst);
                Ok(15)
            })
            .await
            .unwrap();
        // Stale value served immediately.
        assert_eq!(served, 20);

        // Let the revalidation task run.
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.peek::<i64>(&stock_key()), Some(15));
    }

    #[tokio::test(start_paused = true)]
    async fn invalidation_forces_inline_refetch() {
        let cache = Arc::new(QueryCache::new(tight_windows()));

        let _: i64 = cache.fetch(stock_key(), || async { Ok(20) }).await.unwrap();
        cache.invalidate_scope(QueryScope::Stock);
        assert_eq!(cache.len(), 0);

        let value: i64 = cache.fetch(stock_key(), || async { Ok(15) }).await.unwrap();
        assert_eq!(value, 15);
    }

    #[tokio::test(start_paused = true)]
    async fn generation_marker_bumps_per_scope() {
        let cache = Arc::new(QueryCache::new(tight_windows()));
        assert_eq!(cache.generation(QueryScope::Stock), 0);
        cache.invalidate_scope(QueryScope::Stock);
        cache.invalidate_scope(QueryScope::Stock);
        assert_eq!(cache.generation(QueryScope::Stock), 2);
        assert_eq!(cache.generation(QueryScope::Alertas), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidation_only_touches_its_scope() {
        let cache = Arc::new(QueryCache::new(tight_windows()));
        let _: i64 = cache.fetch(stock_key(), || async { Ok(20) }).await.unwrap();
        let _: i64 = cache
            .fetch(QueryKey::Alertas, || async { Ok(3) })
            .await
            .unwrap();

        cache.invalidate_scope(QueryScope::Stock);
        assert_eq!(cache.peek::<i64>(&stock_key()), None);
        assert_eq!(cache.peek::<i64>(&QueryKey::Alertas), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_all_empties_every_scope() {
        let cache = Arc::new(QueryCache::new(tight_windows()));
        let _: i64 = cache.fetch(stock_key(), || async { Ok(20) }).await.unwrap();
        let _: i64 = cache
            .fetch(QueryKey::Alertas, || async { Ok(3) })
            .await
            .unwrap();

        cache.invalidate_all();

        assert_eq!(cache.len(), 0);
        for scope in QueryScope::iter() {
            assert_eq!(cache.generation(scope), 1, "{:?}", scope);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn mutate_preserves_freshness_timestamp() {
        let cache = Arc::new(QueryCache::new(tight_windows()));
        let _: i64 = cache.fetch(stock_key(), || async { Ok(20) }).await.unwrap();
        let before = cache.snapshot(&stock_key()).unwrap().fetched_at;

        advance(Duration::from_secs(5)).await;
        assert!(cache.mutate(&stock_key(), |v| *v = serde_json::json!(15)));

        let after = cache.snapshot(&stock_key()).unwrap();
        assert_eq!(after.fetched_at, before);
        assert_eq!(cache.peek::<i64>(&stock_key()), Some(15));
    }
}
