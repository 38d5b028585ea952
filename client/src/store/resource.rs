//! # Resource Collection Store
//!
//! One cached, reconcilable collection per resource (lançamentos, contas,
//! metas), generic over the [`ResourceApi`] that backs it.
//!
//! - `load` serves the cached collection while its TTL holds; otherwise it
//!   fetches through a [`RefreshCoalescer`], so concurrent loads share one
//!   call
//! - fetch failures go through the store's [`FallbackPolicy`]
//! - `create` / `update` / `delete` call the API and then reconcile the
//!   cached collection in place instead of re-fetching it

use super::loaded::{FallbackPolicy, Loaded};
use crate::cache::{EntryStatus, TtlEntry};
use crate::core::error::Result;
use crate::core::service::{Record, ResourceApi};
use crate::events::{ClientEvent, EventBus};
use crate::sync::RefreshCoalescer;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub struct ResourceStore<R: Record, A: ResourceApi<R>> {
    api: Arc<A>,
    cache: Mutex<TtlEntry<Vec<R>>>,
    filters: Mutex<A::Filters>,
    /// Bumped whenever the filters change or a mutation is reconciled; a
    /// fetch started under an older generation does not overwrite the cache.
    generation: AtomicU64,
    coalescer: RefreshCoalescer<u64, Vec<R>>,
    policy: FallbackPolicy,
    events: EventBus,
}

impl<R, A> ResourceStore<R, A>
where
    R: Record,
    A: ResourceApi<R> + 'static,
{
    pub fn new(api: Arc<A>, ttl: Duration, policy: FallbackPolicy, events: EventBus) -> Self {
        Self {
            api,
            cache: Mutex::new(TtlEntry::new(ttl)),
            filters: Mutex::new(A::Filters::default()),
            generation: AtomicU64::new(0),
            coalescer: RefreshCoalescer::new(),
            policy,
            events,
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn resource_name(&self) -> &'static str {
        self.api.resource_name()
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn filters(&self) -> A::Filters {
        self.filters.lock().clone()
    }

    /// Replace the listing filters and drop the cached collection.
    pub fn set_filters(&self, filters: A::Filters) {
        *self.filters.lock() = filters;
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cache.lock().invalidate();
    }

    /// The collection, from cache while valid.
    pub async fn load(&self) -> Result<Loaded<Vec<R>>> {
        if let Some(records) = self.cache.lock().get() {
            tracing::debug!(resource = self.resource_name(), count = records.len(), "Serving cached collection");
            return Ok(Loaded::cached(records));
        }
        self.fetch().await
    }

    /// Fetch regardless of cache validity (still coalesced).
    pub async fn refresh(&self) -> Result<Loaded<Vec<R>>> {
        self.fetch().await
    }

    #[tracing::instrument(skip_all, fields(resource = self.resource_name()))]
    async fn fetch(&self) -> Result<Loaded<Vec<R>>> {
        let start = std::time::Instant::now();
        let generation = self.generation.load(Ordering::SeqCst);
        let api = self.api.clone();
        let filters = self.filters();

        let result = self
            .coalescer
            .run(generation, move || async move { api.list(&filters).await })
            .await;

        match result {
            Ok(records) => {
                if self.generation.load(Ordering::SeqCst) == generation {
                    self.cache.lock().set(records.clone());
                } else {
                    tracing::debug!("Filters or records changed during fetch, not caching result");
                }
                tracing::info!(
                    count = records.len(),
                    duration_ms = start.elapsed().as_millis(),
                    "Collection refreshed"
                );
                self.events.emit(ClientEvent::DataUpdated {
                    resource: self.resource_name(),
                });
                Ok(Loaded::fresh(records))
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    duration_ms = start.elapsed().as_millis(),
                    "Collection refresh failed"
                );
                let stale = self.cache.lock().peek().cloned();
                self.policy.resolve(err, stale, Vec::new)
            }
        }
    }

    /// Fetch one record and replace its cached copy when present.
    pub async fn get(&self, id: i64) -> Result<R> {
        let record = self.api.get(id).await?;
        self.reconcile_updated(record.clone());
        Ok(record)
    }

    pub async fn create(&self, payload: &A::Create) -> Result<R> {
        let record = self.api.create(payload).await?;
        self.reconcile_created(record.clone());
        Ok(record)
    }

    pub async fn update(&self, id: i64, payload: &A::Update) -> Result<R> {
        let record = self.api.update(id, payload).await?;
        self.reconcile_updated(record.clone());
        Ok(record)
    }

    /// Delete on the server, then locally. Returns whether the record was
    /// in the cached collection.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        self.api.delete(id).await?;
        Ok(self.reconcile_deleted(id))
    }

    /// Prepend a server-created record and re-stamp the collection as fresh.
    /// Nothing happens when no collection has been loaded yet.
    pub fn reconcile_created(&self, record: R) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut cache = self.cache.lock();
        let Some(records) = cache.peek_mut() else {
            return;
        };
        records.retain(|r| r.id() != record.id());
        records.insert(0, record);
        cache.touch();
        drop(cache);
        self.emit_updated();
    }

    /// Replace the record with the same id, keeping its position. Returns
    /// false when the id is not in the collection.
    pub fn reconcile_updated(&self, record: R) -> bool {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let replaced = {
            let mut cache = self.cache.lock();
            match cache
                .peek_mut()
                .and_then(|records| records.iter_mut().find(|r| r.id() == record.id()))
            {
                Some(slot) => {
                    *slot = record;
                    true
                }
                None => false,
            }
        };
        if replaced {
            self.emit_updated();
        }
        replaced
    }

    /// Remove by id. Absent ids are a no-op returning false.
    pub fn reconcile_deleted(&self, id: i64) -> bool {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let removed = {
            let mut cache = self.cache.lock();
            match cache.peek_mut() {
                Some(records) => {
                    let before = records.len();
                    records.retain(|r| r.id() != id);
                    records.len() != before
                }
                None => false,
            }
        };
        if removed {
            self.emit_updated();
        }
        removed
    }

    fn emit_updated(&self) {
        self.events.emit(ClientEvent::DataUpdated {
            resource: self.resource_name(),
        });
    }

    /// Cached collection regardless of validity; empty when never loaded.
    pub fn snapshot(&self) -> Vec<R> {
        self.cache.lock().peek().cloned().unwrap_or_default()
    }

    pub fn find(&self, id: i64) -> Option<R> {
        self.cache
            .lock()
            .peek()
            .and_then(|records| records.iter().find(|r| r.id() == id).cloned())
    }

    pub fn invalidate(&self) {
        self.cache.lock().invalidate();
    }

    pub fn status(&self) -> EntryStatus {
        self.cache.lock().status()
    }

    pub fn is_loading(&self) -> bool {
        self.coalescer.in_flight_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::store::loaded::DataOrigin;
    use crate::store::testing::{lancamento_create, FakeLancamentoApi};
    use tokio::time::advance;

    fn store(api: &Arc<FakeLancamentoApi>, policy: FallbackPolicy) -> ResourceStore<crate::model::Lancamento, FakeLancamentoApi> {
        ResourceStore::new(api.clone(), Duration::from_secs(60), policy, EventBus::new())
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_serves_cache_until_ttl() {
        let api = Arc::new(FakeLancamentoApi::with_rows(vec![1, 2, 3]));
        let store = store(&api, FallbackPolicy::Stale);

        let first = store.load().await.unwrap();
        assert_eq!(first.origin, DataOrigin::Fresh);
        assert_eq!(first.data.len(), 3);

        advance(Duration::from_secs(59)).await;
        assert_eq!(store.load().await.unwrap().origin, DataOrigin::Cached);
        assert_eq!(api.list_calls(), 1);

        advance(Duration::from_secs(2)).await;
        assert_eq!(store.load().await.unwrap().origin, DataOrigin::Fresh);
        assert_eq!(api.list_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_loads_coalesce() {
        let api = Arc::new(FakeLancamentoApi::with_rows(vec![1, 2]).delayed(Duration::from_millis(200)));
        let store = store(&api, FallbackPolicy::Stale);

        let (a, b) = tokio::join!(store.load(), store.load());
        assert_eq!(api.list_calls(), 1);
        assert_eq!(a.unwrap().data, b.unwrap().data);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconciliation_of_id_42() {
        let api = Arc::new(FakeLancamentoApi::with_rows(vec![1, 2, 3]));
        let store = store(&api, FallbackPolicy::Stale);
        store.load().await.unwrap();
        advance(Duration::from_secs(61)).await;
        assert!(!store.status().valid);

        api.set_next_id(42);
        let created = store.create(&lancamento_create("Freelance", 500)).await.unwrap();
        assert_eq!(created.id, 42);
        let ids: Vec<i64> = store.snapshot().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![42, 1, 2, 3]);
        // Re-stamped instead of invalidated
        assert!(store.status().valid);

        let mut changed = created.clone();
        changed.descricao = "Freelance design".to_string();
        assert!(store.reconcile_updated(changed));
        let snapshot = store.snapshot();
        assert_eq!(snapshot[0].id, 42);
        assert_eq!(snapshot[0].descricao, "Freelance design");

        assert!(store.delete(42).await.unwrap());
        assert!(!store.reconcile_deleted(42));
        let ids: Vec<i64> = store.snapshot().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(api.list_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_overlapping_delete_does_not_restore_record() {
        // Arrange
        let api = Arc::new(FakeLancamentoApi::with_rows(vec![1, 42]).delayed(Duration::from_millis(300)));
        let store = store(&api, FallbackPolicy::Stale);
        store.load().await.unwrap();

        // Act: the list response still carries 42, the delete lands first
        let (refreshed, removed) = tokio::join!(store.refresh(), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            store.reconcile_deleted(42)
        });

        // Assert
        assert!(removed);
        assert!(refreshed.unwrap().data.iter().any(|r| r.id == 42));
        let ids: Vec<i64> = store.snapshot().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
        let cached = store.load().await.unwrap();
        assert_eq!(cached.origin, DataOrigin::Cached);
        assert!(cached.data.iter().all(|r| r.id != 42));
        assert_eq!(api.list_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_overlapping_create_keeps_new_record() {
        let api = Arc::new(FakeLancamentoApi::with_rows(vec![1]).delayed(Duration::from_millis(300)));
        let store = store(&api, FallbackPolicy::Stale);
        store.load().await.unwrap();
        let mut extra = store.find(1).unwrap();
        extra.id = 7;

        tokio::join!(store.refresh(), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            store.reconcile_created(extra.clone());
        });

        let ids: Vec<i64> = store.snapshot().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![7, 1]);
        assert!(store.status().valid);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_keeps_position() {
        let api = Arc::new(FakeLancamentoApi::with_rows(vec![1, 2, 3]));
        let store = store(&api, FallbackPolicy::Stale);
        store.load().await.unwrap();

        let mut middle = store.find(2).unwrap();
        middle.descricao = "editado".to_string();
        assert!(store.reconcile_updated(middle));
        let snapshot = store.snapshot();
        assert_eq!(snapshot[1].descricao, "editado");

        let mut ghost = snapshot[0].clone();
        ghost.id = 99;
        assert!(!store.reconcile_updated(ghost));
        assert_eq!(store.snapshot().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_follows_policy() {
        let api = Arc::new(FakeLancamentoApi::with_rows(vec![1]));
        let stale = store(&api, FallbackPolicy::Stale);
        let surface = store(&api, FallbackPolicy::Surface);

        api.fail_with(AppError::Network("down".to_string()));
        assert!(stale.load().await.is_err());

        api.recover();
        stale.load().await.unwrap();
        advance(Duration::from_secs(61)).await;
        api.fail_with(AppError::Timeout(Duration::from_secs(10)));

        let served = stale.load().await.unwrap();
        assert_eq!(served.origin, DataOrigin::Stale);
        assert_eq!(served.data.len(), 1);
        assert!(served.error.is_some());

        assert!(surface.load().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_filters_invalidates() {
        let api = Arc::new(FakeLancamentoApi::with_rows(vec![1, 2]));
        let store = store(&api, FallbackPolicy::Stale);
        store.load().await.unwrap();

        let mut filters = store.filters();
        filters.search = Some("mercado".to_string());
        store.set_filters(filters);
        assert!(store.snapshot().is_empty());

        store.load().await.unwrap();
        assert_eq!(api.list_calls(), 2);
        assert_eq!(api.last_search().as_deref(), Some("mercado"));
    }
}
