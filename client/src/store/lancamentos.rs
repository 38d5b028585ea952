//! # Lançamento Store
//!
//! The transaction collection plus every aggregate derived from it:
//!
//! | Data                    | Bucket         | Source                          |
//! |-------------------------|----------------|---------------------------------|
//! | collection              | `transactions` | `GET /financeiro`               |
//! | summary per period      | `summary`      | `GET /financeiro/summary/stats` |
//! | evolution, categories   | `charts`       | `/financeiro/analytics/*`       |
//! | recent records          | `transactions` | `GET /financeiro?sort=...`      |
//! | insights per period     | `insights`     | derived from the summary        |
//! | local summary           | none           | derived from the collection     |
//!
//! Every mutation reconciles the collection, recomputes the local summary
//! and invalidates the server summaries. The other buckets keep their
//! validity.

use super::aggregate::AggregateCache;
use super::loaded::{FallbackPolicy, Loaded};
use super::resource::ResourceStore;
use crate::cache::{CacheKey, CacheTtls, EntryStatus};
use crate::core::error::Result;
use crate::core::service::{LancamentoAnalytics, ResourceApi};
use crate::events::EventBus;
use crate::metrics::kpi::{self, Insight};
use crate::metrics::{self, CollectionMetrics};
use crate::model::{CategorySlice, Lancamento, MonthlyEvolution, Summary};
use parking_lot::RwLock;
use std::sync::Arc;

/// Summary period used when a view does not pick one.
pub const DEFAULT_PERIOD_DAYS: u32 = 30;

pub struct LancamentosStore<A>
where
    A: ResourceApi<Lancamento> + LancamentoAnalytics + 'static,
{
    collection: ResourceStore<Lancamento, A>,
    summaries: AggregateCache<u32, Summary>,
    evolution: AggregateCache<u32, MonthlyEvolution>,
    categories: AggregateCache<(), Vec<CategorySlice>>,
    recent: AggregateCache<u32, Vec<Lancamento>>,
    insights: AggregateCache<u32, Vec<Insight>>,
    local_summary: RwLock<Summary>,
    policy: FallbackPolicy,
}

impl<A> LancamentosStore<A>
where
    A: ResourceApi<Lancamento> + LancamentoAnalytics + 'static,
{
    pub fn new(api: Arc<A>, ttls: &CacheTtls, policy: FallbackPolicy, events: EventBus) -> Self {
        Self {
            collection: ResourceStore::new(api, ttls.transactions, policy, events),
            summaries: AggregateCache::new("summary", ttls.summary),
            evolution: AggregateCache::new("evolution", ttls.charts),
            categories: AggregateCache::new("categories", ttls.charts),
            recent: AggregateCache::new("recent", ttls.transactions),
            insights: AggregateCache::new("insights", ttls.insights),
            local_summary: RwLock::new(Summary::placeholder(None)),
            policy,
        }
    }

    /// The underlying collection store (filters, snapshot, find).
    pub fn collection(&self) -> &ResourceStore<Lancamento, A> {
        &self.collection
    }

    pub async fn load(&self) -> Result<Loaded<Vec<Lancamento>>> {
        let loaded = self.collection.load().await?;
        self.recompute_local_summary();
        Ok(loaded)
    }

    pub async fn refresh(&self) -> Result<Loaded<Vec<Lancamento>>> {
        let loaded = self.collection.refresh().await?;
        self.recompute_local_summary();
        Ok(loaded)
    }

    pub fn snapshot(&self) -> Vec<Lancamento> {
        self.collection.snapshot()
    }

    /// Server summary for the last `periodo_dias` days.
    pub async fn summary(&self, periodo_dias: u32) -> Result<Loaded<Summary>> {
        let api = self.collection.api().clone();
        self.summaries
            .load(
                periodo_dias,
                self.policy,
                || Summary::placeholder(Some(periodo_dias)),
                move || async move { api.summary(periodo_dias).await },
            )
            .await
    }

    pub async fn evolution(&self, meses: u32) -> Result<Loaded<MonthlyEvolution>> {
        let api = self.collection.api().clone();
        self.evolution
            .load(meses, self.policy, MonthlyEvolution::default, move || async move {
                api.evolution(meses).await
            })
            .await
    }

    pub async fn categories(&self) -> Result<Loaded<Vec<CategorySlice>>> {
        let api = self.collection.api().clone();
        self.categories
            .load((), self.policy, Vec::new, move || async move { api.categories().await })
            .await
    }

    /// Newest `limit` records by date.
    pub async fn recent(&self, limit: u32) -> Result<Loaded<Vec<Lancamento>>> {
        let api = self.collection.api().clone();
        self.recent
            .load(limit, self.policy, Vec::new, move || async move { api.recent(limit).await })
            .await
    }

    /// Rule-based insights over the server summary. Only insights computed
    /// from a non-degraded summary are cached.
    pub async fn insights(&self, periodo_dias: u32) -> Result<Loaded<Vec<Insight>>> {
        if let Some(cached) = self.insights.get(&periodo_dias) {
            return Ok(Loaded::cached(cached));
        }
        let epoch = self.insights.epoch();
        let derived = self.summary(periodo_dias).await?.map(|s| kpi::insights(&s));
        if !derived.is_degraded() {
            self.insights.set_if_current(epoch, periodo_dias, derived.data.clone());
        }
        Ok(derived)
    }

    /// Totals recomputed from the local collection after every load and
    /// mutation.
    pub fn local_summary(&self) -> Summary {
        self.local_summary.read().clone()
    }

    pub fn metrics(&self) -> CollectionMetrics {
        metrics::collection_metrics(&self.collection.snapshot())
    }

    pub async fn create(&self, payload: &A::Create) -> Result<Lancamento> {
        let record = self.collection.create(payload).await?;
        self.after_mutation();
        Ok(record)
    }

    pub async fn update(&self, id: i64, payload: &A::Update) -> Result<Lancamento> {
        let record = self.collection.update(id, payload).await?;
        self.after_mutation();
        Ok(record)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let removed = self.collection.delete(id).await?;
        self.after_mutation();
        Ok(removed)
    }

    fn after_mutation(&self) {
        self.recompute_local_summary();
        self.summaries.invalidate();
        self.insights.invalidate();
        self.recent.invalidate();
    }

    fn recompute_local_summary(&self) {
        let snapshot = self.collection.snapshot();
        let summary = Summary::from_records(&snapshot, None);
        tracing::debug!(
            count = snapshot.len(),
            saldo = %summary.saldo,
            "Local summary recomputed"
        );
        *self.local_summary.write() = summary;
    }

    /// Drop every bucket (logout, explicit refresh).
    pub fn invalidate_all(&self) {
        self.collection.invalidate();
        self.summaries.invalidate();
        self.evolution.invalidate();
        self.categories.invalidate();
        self.recent.invalidate();
        self.insights.invalidate();
    }

    pub fn cache_status(&self) -> Vec<(CacheKey, EntryStatus)> {
        let charts = [self.evolution.status(), self.categories.status()]
            .into_iter()
            .filter(|s| s.age.is_some())
            .min_by_key(|s| s.age)
            .unwrap_or(self.evolution.status());
        vec![
            (CacheKey::Summary, self.summaries.status()),
            (CacheKey::Charts, charts),
            (CacheKey::Insights, self.insights.status()),
            (CacheKey::Transactions, self.collection.status()),
        ]
    }

    pub fn is_loading(&self) -> bool {
        self.collection.is_loading()
            || self.summaries.is_loading()
            || self.evolution.is_loading()
            || self.categories.is_loading()
            || self.recent.is_loading()
    }
}
