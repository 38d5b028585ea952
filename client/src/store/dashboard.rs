//! # Dashboard Store
//!
//! Orchestrates the dashboard view: preferences and widget layout, one
//! parallel load of every widget's data, API response-time tracking and the
//! optional auto-refresh timer.
//!
//! ## Loading
//!
//! [`DashboardStore::load_all`] starts the summary, evolution, categories,
//! recent-transactions and goals reads together. Each result is independent:
//! a failing widget does not hold back or fail the others. The join only
//! decides when this call stops counting toward the "loading" flag.
//!
//! ## Auto-refresh
//!
//! When `autoRefresh` is on, [`DashboardStore::start_auto_refresh`] arms a
//! poll timer inside a [`ViewScope`]. The timer holds a weak reference to
//! the store and goes through the normal cached reads, so a tick inside the
//! TTLs costs nothing.

use super::lancamentos::LancamentosStore;
use super::loaded::Loaded;
use super::preferences::{self, DashboardPreferences, WidgetSettings};
use super::resource::ResourceStore;
use super::storage::Storage;
use crate::core::error::Result;
use crate::core::service::{LancamentoAnalytics, ResourceApi};
use crate::metrics::kpi::{self, GoalsProgress, Insight, MonthlyKpis};
use crate::model::{CategorySlice, Lancamento, Meta, MonthlyEvolution, Summary};
use crate::sync::ViewScope;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, VecDeque};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Samples kept per endpoint.
const MAX_RESPONSE_SAMPLES: usize = 100;
/// Months of evolution shown on the dashboard chart.
pub const EVOLUTION_MONTHS: u32 = 6;
const DEFAULT_RECENT_LIMIT: u32 = 10;
const AUTO_REFRESH_KEY: &str = "dashboard";

/// Every widget's result from one [`DashboardStore::load_all`].
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub summary: Result<Loaded<Summary>>,
    pub evolution: Result<Loaded<MonthlyEvolution>>,
    pub categories: Result<Loaded<Vec<CategorySlice>>>,
    pub recent: Result<Loaded<Vec<Lancamento>>>,
    pub goals: Result<Loaded<Vec<Meta>>>,
    pub insights: Result<Loaded<Vec<Insight>>>,
}

impl DashboardData {
    pub fn kpis(&self) -> Option<MonthlyKpis> {
        self.summary.as_ref().ok().map(|s| kpi::monthly_kpis(&s.data))
    }

    pub fn goals_progress(&self) -> Option<GoalsProgress> {
        self.goals.as_ref().ok().map(|g| kpi::goals_progress(&g.data))
    }

    /// Number of widgets whose read failed outright.
    pub fn failures(&self) -> usize {
        [
            self.summary.is_err(),
            self.evolution.is_err(),
            self.categories.is_err(),
            self.recent.is_err(),
            self.goals.is_err(),
            self.insights.is_err(),
        ]
        .into_iter()
        .filter(|failed| *failed)
        .count()
    }
}

/// Rolling response times per endpoint.
#[derive(Debug, Default)]
pub struct ResponseTimes {
    samples: Mutex<BTreeMap<&'static str, VecDeque<Duration>>>,
}

impl ResponseTimes {
    pub fn record(&self, endpoint: &'static str, elapsed: Duration) {
        let mut samples = self.samples.lock();
        let queue = samples.entry(endpoint).or_default();
        queue.push_back(elapsed);
        while queue.len() > MAX_RESPONSE_SAMPLES {
            queue.pop_front();
        }
    }

    pub fn sample_count(&self, endpoint: &str) -> usize {
        self.samples.lock().get(endpoint).map_or(0, VecDeque::len)
    }

    /// Mean of the kept samples; zero without samples.
    pub fn average(&self, endpoint: &str) -> Duration {
        let samples = self.samples.lock();
        match samples.get(endpoint) {
            Some(queue) if !queue.is_empty() => queue.iter().sum::<Duration>() / queue.len() as u32,
            _ => Duration::ZERO,
        }
    }

    pub fn averages(&self) -> BTreeMap<&'static str, Duration> {
        let endpoints: Vec<&'static str> = self.samples.lock().keys().copied().collect();
        endpoints
            .into_iter()
            .map(|endpoint| (endpoint, self.average(endpoint)))
            .collect()
    }
}

/// Counts one in-flight load; released on completion or cancellation.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct DashboardStore<L, M>
where
    L: ResourceApi<Lancamento> + LancamentoAnalytics + 'static,
    M: ResourceApi<Meta> + 'static,
{
    lancamentos: Arc<LancamentosStore<L>>,
    metas: Arc<ResourceStore<Meta, M>>,
    storage: Arc<dyn Storage>,
    preferences: RwLock<DashboardPreferences>,
    widgets: RwLock<WidgetSettings>,
    response_times: ResponseTimes,
    /// `load_all` calls in flight.
    loading: AtomicUsize,
    refresh_scope: Mutex<Option<ViewScope>>,
}

impl<L, M> DashboardStore<L, M>
where
    L: ResourceApi<Lancamento> + LancamentoAnalytics + 'static,
    M: ResourceApi<Meta> + 'static,
{
    /// Build the store, restoring preferences and widgets from `storage`.
    pub fn new(
        lancamentos: Arc<LancamentosStore<L>>,
        metas: Arc<ResourceStore<Meta, M>>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let prefs = preferences::load_preferences(storage.as_ref());
        let widgets = preferences::load_widgets(storage.as_ref());
        Self {
            lancamentos,
            metas,
            storage,
            preferences: RwLock::new(prefs),
            widgets: RwLock::new(widgets),
            response_times: ResponseTimes::default(),
            loading: AtomicUsize::new(0),
            refresh_scope: Mutex::new(None),
        }
    }

    pub fn preferences(&self) -> DashboardPreferences {
        self.preferences.read().clone()
    }

    /// Apply `change` and persist. Memory keeps the change even when
    /// persisting fails.
    pub fn update_preferences(&self, change: impl FnOnce(&mut DashboardPreferences)) -> Result<()> {
        let updated = {
            let mut prefs = self.preferences.write();
            change(&mut prefs);
            prefs.clone()
        };
        preferences::save_preferences(self.storage.as_ref(), &updated).map_err(|e| {
            tracing::error!(error = %e, "Failed to persist dashboard preferences");
            e
        })
    }

    pub fn reset_preferences(&self) -> Result<()> {
        self.update_preferences(|prefs| *prefs = DashboardPreferences::default())
    }

    pub fn widgets(&self) -> WidgetSettings {
        self.widgets.read().clone()
    }

    /// Returns the widget's new state, `None` for an unknown key.
    pub fn toggle_widget(&self, key: &str) -> Result<Option<bool>> {
        let (state, snapshot) = {
            let mut widgets = self.widgets.write();
            (widgets.toggle(key), widgets.clone())
        };
        if state.is_some() {
            preferences::save_widgets(self.storage.as_ref(), &snapshot)?;
        }
        Ok(state)
    }

    pub fn reorder_widgets(&self, order: &[&str]) -> Result<()> {
        let snapshot = {
            let mut widgets = self.widgets.write();
            widgets.reorder(order);
            widgets.clone()
        };
        preferences::save_widgets(self.storage.as_ref(), &snapshot)
    }

    pub fn enabled_widgets(&self) -> Vec<String> {
        self.widgets.read().enabled()
    }

    pub fn response_times(&self) -> &ResponseTimes {
        &self.response_times
    }

    /// True while any `load_all` (manual or auto-refresh) is running.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) > 0
    }

    fn recent_limit(&self) -> u32 {
        self.widgets
            .read()
            .get("activity")
            .and_then(|w| w.option_u64("recentTransactions"))
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(DEFAULT_RECENT_LIMIT)
    }

    async fn timed<T>(&self, endpoint: &'static str, fut: impl Future<Output = T>) -> T {
        let start = tokio::time::Instant::now();
        let out = fut.await;
        self.response_times.record(endpoint, start.elapsed());
        out
    }

    /// Load every widget concurrently.
    #[tracing::instrument(skip_all)]
    pub async fn load_all(&self) -> DashboardData {
        let start = std::time::Instant::now();
        let loading = LoadingGuard::enter(&self.loading);

        let periodo = self.preferences.read().charts_period.days();
        let limit = self.recent_limit();

        let (summary, evolution, categories, recent, goals) = tokio::join!(
            self.timed("summary", self.lancamentos.summary(periodo)),
            self.timed("evolution", self.lancamentos.evolution(EVOLUTION_MONTHS)),
            self.timed("categories", self.lancamentos.categories()),
            self.timed("transactions", self.lancamentos.recent(limit)),
            self.timed("goals", self.metas.load()),
        );
        // The summary is cached by now, so this does not hit the network
        // unless the summary read failed.
        let insights = self.lancamentos.insights(periodo).await;
        drop(loading);

        let data = DashboardData {
            summary,
            evolution,
            categories,
            recent,
            goals,
            insights,
        };
        tracing::info!(
            failures = data.failures(),
            duration_ms = start.elapsed().as_millis(),
            "Dashboard loaded"
        );
        data
    }

    /// Drop every cached bucket and load again.
    pub async fn refresh_all(&self) -> DashboardData {
        self.lancamentos.invalidate_all();
        self.metas.invalidate();
        self.load_all().await
    }

    /// Arm the auto-refresh timer when the preference is on. Re-arming
    /// replaces the previous scope.
    pub fn start_auto_refresh(self: &Arc<Self>) -> bool {
        let prefs = self.preferences();
        if !prefs.auto_refresh {
            self.stop_auto_refresh();
            return false;
        }

        let scope = ViewScope::new(AUTO_REFRESH_KEY);
        let weak: Weak<Self> = Arc::downgrade(self);
        scope.poll(AUTO_REFRESH_KEY, prefs.refresh_interval(), move || {
            let weak = weak.clone();
            async move {
                if let Some(store) = weak.upgrade() {
                    let data = store.load_all().await;
                    tracing::debug!(failures = data.failures(), "Dashboard auto-refresh tick");
                }
            }
        });
        // The previous scope, if any, is torn down on drop
        *self.refresh_scope.lock() = Some(scope);
        true
    }

    pub fn stop_auto_refresh(&self) {
        if let Some(scope) = self.refresh_scope.lock().take() {
            scope.teardown();
        }
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.refresh_scope.lock().is_some()
    }
}

impl<L, M> Drop for DashboardStore<L, M>
where
    L: ResourceApi<Lancamento> + LancamentoAnalytics + 'static,
    M: ResourceApi<Meta> + 'static,
{
    fn drop(&mut self) {
        self.stop_auto_refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheTtls;
    use crate::core::error::AppError;
    use crate::events::EventBus;
    use crate::store::loaded::{DataOrigin, FallbackPolicy};
    use crate::store::storage::{keys, MemoryStorage};
    use crate::store::testing::{FakeLancamentoApi, FakeMetaApi};
    use tokio::time::advance;

    type Store = DashboardStore<FakeLancamentoApi, FakeMetaApi>;

    struct Fixture {
        lanc_api: Arc<FakeLancamentoApi>,
        meta_api: Arc<FakeMetaApi>,
        storage: Arc<MemoryStorage>,
        store: Arc<Store>,
    }

    fn fixture(lanc_api: FakeLancamentoApi) -> Fixture {
        let lanc_api = Arc::new(lanc_api);
        let meta_api = Arc::new(FakeMetaApi::with_goals(vec![(1, 1000, 1000), (2, 1000, 250)]));
        let storage = Arc::new(MemoryStorage::new());
        let ttls = CacheTtls::default();
        let events = EventBus::new();
        let lancamentos = Arc::new(LancamentosStore::new(
            lanc_api.clone(),
            &ttls,
            FallbackPolicy::Stale,
            events.clone(),
        ));
        let metas = Arc::new(ResourceStore::new(meta_api.clone(), ttls.goals, FallbackPolicy::Stale, events));
        let store = Arc::new(DashboardStore::new(lancamentos, metas, storage.clone()));
        Fixture {
            lanc_api,
            meta_api,
            storage,
            store,
        }
    }

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_stays_up_while_any_load_runs() {
        // Arrange
        let f = fixture(FakeLancamentoApi::with_rows(vec![1, 2]).delayed(Duration::from_millis(300)));
        let mut tick = Box::pin(f.store.load_all());
        assert!(futures::poll!(tick.as_mut()).is_pending());
        assert!(f.store.is_loading());

        // Act: a manual load finishes first
        advance(Duration::from_millis(300)).await;
        let manual = f.store.load_all().await;

        // Assert
        assert_eq!(manual.failures(), 0);
        assert!(f.store.is_loading());
        tick.await;
        assert!(!f.store.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_load_releases_loading() {
        let f = fixture(FakeLancamentoApi::with_rows(vec![1]).delayed(Duration::from_millis(300)));
        let mut load = Box::pin(f.store.load_all());
        assert!(futures::poll!(load.as_mut()).is_pending());
        assert!(f.store.is_loading());

        drop(load);
        assert!(!f.store.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_all_fills_every_widget() {
        let f = fixture(FakeLancamentoApi::with_rows(vec![1, 2, 3]));
        let data = f.store.load_all().await;

        assert_eq!(data.failures(), 0);
        assert_eq!(data.summary.as_ref().unwrap().data.total_lancamentos, 3);
        assert_eq!(data.goals.as_ref().unwrap().data.len(), 2);
        let progress = data.goals_progress().unwrap();
        assert_eq!(progress.completed, 1);
        assert_eq!(f.lanc_api.summary_calls(), 1);
        assert!(!f.store.is_loading());

        for endpoint in ["summary", "evolution", "categories", "transactions", "goals"] {
            assert_eq!(f.store.response_times().sample_count(endpoint), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_widgets_fail_independently() {
        let f = fixture(FakeLancamentoApi::with_rows(vec![1]));
        f.meta_api.fail_with(AppError::Http {
            status: 403,
            detail: "Proibido".to_string(),
        });

        let data = f.store.load_all().await;
        assert!(data.goals.is_err());
        assert_eq!(data.summary.as_ref().unwrap().origin, DataOrigin::Fresh);
        assert_eq!(data.failures(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_widgets_load_in_parallel() {
        let f = fixture(FakeLancamentoApi::with_rows(vec![1]).delayed(Duration::from_millis(500)));
        let start = tokio::time::Instant::now();
        f.store.load_all().await;
        // Four lançamento reads of 500 ms each, run together
        assert!(start.elapsed() < Duration::from_millis(1000));
        assert_eq!(f.store.response_times().average("summary"), Duration::from_millis(500));
    }

    #[test]
    fn test_response_times_keep_last_100() {
        let times = ResponseTimes::default();
        for ms in 0..150u64 {
            times.record("summary", Duration::from_millis(ms));
        }
        assert_eq!(times.sample_count("summary"), 100);
        // Mean of 50..=149
        assert_eq!(times.average("summary"), Duration::from_micros(99_500));
        assert_eq!(times.average("charts"), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_preferences_persist() {
        let f = fixture(FakeLancamentoApi::with_rows(vec![]));
        f.store
            .update_preferences(|p| {
                p.compact_mode = true;
                p.refresh_interval = 60_000;
            })
            .unwrap();
        assert!(f.storage.get(keys::DASHBOARD_PREFERENCES).unwrap().unwrap().contains("\"compactMode\":true"));

        assert_eq!(f.store.toggle_widget("charts").unwrap(), Some(false));
        assert!(!f.store.enabled_widgets().contains(&"charts".to_string()));

        f.store.reset_preferences().unwrap();
        assert_eq!(f.store.preferences(), DashboardPreferences::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_refresh_polls_until_stopped() {
        let f = fixture(FakeLancamentoApi::with_rows(vec![1]));
        f.store
            .update_preferences(|p| p.refresh_interval = 600_000)
            .unwrap();
        assert!(f.store.start_auto_refresh());

        // The goals TTL is 5 min, the interval 10 min: every tick refetches.
        advance(Duration::from_secs(600)).await;
        settle().await;
        assert_eq!(f.meta_api.list_calls(), 1);

        advance(Duration::from_secs(600)).await;
        settle().await;
        assert_eq!(f.meta_api.list_calls(), 2);

        f.store.stop_auto_refresh();
        advance(Duration::from_secs(1800)).await;
        settle().await;
        assert_eq!(f.meta_api.list_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_refresh_off_by_preference() {
        let f = fixture(FakeLancamentoApi::with_rows(vec![]));
        f.store.update_preferences(|p| p.auto_refresh = false).unwrap();
        assert!(!f.store.start_auto_refresh());
        assert!(!f.store.is_auto_refreshing());
    }
}
