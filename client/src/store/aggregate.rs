//! Keyed server aggregates (summaries, chart series) cached per key.

use super::loaded::{FallbackPolicy, Loaded};
use crate::cache::{EntryStatus, TtlStore};
use crate::core::error::Result;
use crate::sync::RefreshCoalescer;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// One TTL bucket per key plus a coalescer, so concurrent reads of the same
/// key share one request.
pub struct AggregateCache<K, V> {
    name: &'static str,
    bucket: TtlStore<K, V>,
    coalescer: RefreshCoalescer<K, V>,
    /// Bumped on invalidation; a fetch that started before it is not cached.
    epoch: AtomicU64,
}

impl<K, V> AggregateCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            bucket: TtlStore::new(ttl),
            coalescer: RefreshCoalescer::new(),
            epoch: AtomicU64::new(0),
        }
    }

    /// Cached value for `key` while valid, otherwise a (coalesced) fetch.
    /// Failures go through `policy`.
    pub async fn load<F, Fut>(
        &self,
        key: K,
        policy: FallbackPolicy,
        placeholder: impl FnOnce() -> V,
        fetch: F,
    ) -> Result<Loaded<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        if let Some(value) = self.bucket.get(&key) {
            tracing::debug!(aggregate = self.name, key = ?key, "Serving cached aggregate");
            return Ok(Loaded::cached(value));
        }

        let start = std::time::Instant::now();
        let epoch = self.epoch.load(Ordering::SeqCst);
        match self.coalescer.run(key.clone(), fetch).await {
            Ok(value) => {
                if self.epoch.load(Ordering::SeqCst) == epoch {
                    self.bucket.set(key.clone(), value.clone());
                }
                tracing::debug!(
                    aggregate = self.name,
                    key = ?key,
                    duration_ms = start.elapsed().as_millis(),
                    "Aggregate refreshed"
                );
                Ok(Loaded::fresh(value))
            }
            Err(err) => {
                tracing::warn!(aggregate = self.name, key = ?key, error = %err, "Aggregate refresh failed");
                let stale = self.bucket.peek(&key);
                policy.resolve(err, stale, placeholder)
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.bucket.get(key)
    }

    pub fn set(&self, key: K, value: V) {
        self.bucket.set(key, value);
    }

    /// Current invalidation epoch, for values computed outside [`load`](Self::load).
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Store `value` only if no invalidation happened since `epoch` was read.
    pub fn set_if_current(&self, epoch: u64, key: K, value: V) -> bool {
        if self.epoch() != epoch {
            tracing::debug!(aggregate = self.name, key = ?key, "Invalidated while computing, not caching");
            return false;
        }
        self.bucket.set(key, value);
        true
    }

    pub fn invalidate(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.bucket.invalidate_all();
    }

    pub fn status(&self) -> EntryStatus {
        self.bucket.freshest_status()
    }

    pub fn is_loading(&self) -> bool {
        self.coalescer.in_flight_count() > 0
    }
}
