//! In-memory query cache with prefix invalidation and change notification.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::watch;
use tracing::debug;

use super::{CacheValue, Cached, QueryKey};
use crate::config::ClientConfig;
use crate::error::ApiError;

/// Keys touched by one invalidation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invalidation {
    /// Cached entries that were dropped.
    pub evicted: Vec<QueryKey>,
    /// Subscribed keys whose watchers were woken (once each).
    pub notified: Vec<QueryKey>,
}

/// Shared query cache.
///
/// Results are keyed by [`QueryKey`]. Concurrent fetches of the same key
/// are coalesced into a single call; failed fetches are not cached.
/// Views subscribe with [`QueryCache::watch`] to learn when their key has
/// been invalidated and should be fetched again.
///
/// Every key carries a generation that invalidation bumps, including for
/// keys whose fetch is still in flight. Entries are stored under
/// `(key, generation)`, so a fetch started after an invalidation never
/// joins or reads a load started before it, and a load that finishes
/// after its key was invalidated is dropped instead of cached.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<QueryCacheInner>,
}

/// A key at one generation.
type Slot = (QueryKey, u64);

struct QueryCacheInner {
    entries: Cache<Slot, CacheValue>,
    generations: Mutex<HashMap<QueryKey, u64>>,
    watchers: Mutex<HashMap<QueryKey, watch::Sender<u64>>>,
}

impl QueryCache {
    /// Create a cache holding at most `capacity` results for `ttl` each.
    #[must_use]
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(QueryCacheInner {
                entries,
                generations: Mutex::new(HashMap::new()),
                watchers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Create a cache sized from the client configuration.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.cache_capacity, config.cache_ttl)
    }

    /// Return the cached result for `key`, or run `fetch` and cache its
    /// result.
    ///
    /// If another caller is already fetching `key` (since its last
    /// invalidation), this waits for that call instead of starting a second
    /// one.
    ///
    /// # Errors
    ///
    /// Returns the fetch error (shared between coalesced callers). Nothing
    /// is cached on error.
    pub async fn fetch<T, F>(&self, key: &QueryKey, fetch: F) -> Result<Arc<T>, Arc<ApiError>>
    where
        T: Cached,
        F: Future<Output = Result<T, ApiError>>,
    {
        let slot = (key.clone(), self.track(key));
        let entry = self
            .inner
            .entries
            .entry(slot.clone())
            .or_try_insert_with(async move { fetch.await.map(|value| T::into_value(Arc::new(value))) })
            .await?;

        if entry.is_fresh() {
            if self.generation(key) == slot.1 {
                debug!(key = %key, "Query fetched");
            } else {
                // Invalidated while loading: hand the result to the callers
                // that asked for it, but keep it out of the cache.
                self.inner.entries.invalidate(&slot).await;
                debug!(key = %key, "Query fetched after invalidation, not cached");
            }
        } else {
            debug!(key = %key, "Query cache hit");
        }

        T::from_value(entry.into_value()).ok_or_else(|| {
            Arc::new(ApiError::InvalidResponse(format!(
                "cached entry for {key} holds another type"
            )))
        })
    }

    /// The cached result for `key`, without fetching.
    pub async fn peek<T: Cached>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let slot = (key.clone(), self.generation(key));
        self.inner.entries.get(&slot).await.and_then(T::from_value)
    }

    /// Whether a current result for `key` is cached.
    #[must_use]
    pub fn contains(&self, key: &QueryKey) -> bool {
        self.inner
            .entries
            .contains_key(&(key.clone(), self.generation(key)))
    }

    /// Subscribe to invalidations of `key`.
    #[must_use]
    pub fn watch(&self, key: QueryKey) -> QueryWatch {
        let mut watchers = self.watchers();
        watchers.retain(|_, tx| tx.receiver_count() > 0);
        let rx = watchers
            .entry(key.clone())
            .or_insert_with(|| watch::channel(0).0)
            .subscribe();
        QueryWatch { key, rx }
    }

    /// Drop every cached entry under `prefix` and wake its watchers.
    pub async fn invalidate_prefix(&self, prefix: &QueryKey) -> Invalidation {
        self.invalidate(std::slice::from_ref(prefix)).await
    }

    /// Drop every cached entry under any of `prefixes` and wake their
    /// watchers. A key matching several prefixes is evicted and notified
    /// once. Fetches of matching keys still in flight will not be cached.
    pub async fn invalidate(&self, prefixes: &[QueryKey]) -> Invalidation {
        if prefixes.is_empty() {
            return Invalidation::default();
        }
        let matches = |key: &QueryKey| prefixes.iter().any(|p| key.starts_with(p));

        self.generations()
            .iter_mut()
            .filter(|(key, _)| matches(*key))
            .for_each(|(_, generation)| *generation += 1);

        let stale: Vec<Slot> = self
            .inner
            .entries
            .iter()
            .filter(|(slot, _)| matches(&slot.0))
            .map(|(slot, _)| (*slot).clone())
            .collect();
        for slot in &stale {
            self.inner.entries.invalidate(slot).await;
        }
        let mut evicted: Vec<QueryKey> = stale.into_iter().map(|(key, _)| key).collect();
        evicted.sort();
        evicted.dedup();

        let mut notified: Vec<QueryKey> = {
            let mut watchers = self.watchers();
            watchers.retain(|_, tx| tx.receiver_count() > 0);
            watchers
                .iter()
                .filter(|(key, _)| matches(*key))
                .map(|(key, tx)| {
                    tx.send_modify(|generation| *generation += 1);
                    key.clone()
                })
                .collect()
        };
        notified.sort();

        debug!(
            prefixes = ?prefixes.iter().map(ToString::to_string).collect::<Vec<_>>(),
            evicted = evicted.len(),
            notified = notified.len(),
            "Queries invalidated"
        );
        Invalidation { evicted, notified }
    }

    /// Drop everything (e.g. when a session ends). Fetches in flight are
    /// not cached. Watchers are not woken.
    pub async fn clear(&self) {
        self.generations()
            .values_mut()
            .for_each(|generation| *generation += 1);
        self.inner.entries.invalidate_all();
        self.inner.entries.run_pending_tasks().await;
    }

    /// Current generation of `key`, registering it so later invalidations
    /// see it.
    fn track(&self, key: &QueryKey) -> u64 {
        *self.generations().entry(key.clone()).or_insert(0)
    }

    fn generation(&self, key: &QueryKey) -> u64 {
        self.generations().get(key).copied().unwrap_or(0)
    }

    fn generations(&self) -> MutexGuard<'_, HashMap<QueryKey, u64>> {
        self.inner
            .generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn watchers(&self) -> MutexGuard<'_, HashMap<QueryKey, watch::Sender<u64>>> {
        self.inner
            .watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.inner.entries.entry_count())
            .finish_non_exhaustive()
    }
}

/// A view's subscription to one query key.
#[derive(Debug)]
pub struct QueryWatch {
    key: QueryKey,
    rx: watch::Receiver<u64>,
}

impl QueryWatch {
    /// The watched key.
    #[must_use]
    pub const fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Wait until the key is next invalidated. Invalidations that happened
    /// while nobody was waiting are reported once.
    ///
    /// Returns `false` if the cache has been dropped.
    pub async fn invalidated(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Whether an invalidation arrived that has not been awaited yet.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Acknowledge a pending invalidation without waiting.
    pub fn mark_seen(&mut self) {
        self.rx.borrow_and_update();
    }
}
