//! # Service Traits
//!
//! Traits for dependency injection, so stores can run against the real API
//! client or a scripted fake.

use crate::core::error::Result;
use crate::model::{CategorySlice, Lancamento, MonthlyEvolution, Summary};
use async_trait::async_trait;
use serde::Serialize;

/// A domain record with a backend-assigned id that never changes.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> i64;
}

/// CRUD-shaped operations over one REST resource.
///
/// Implemented by [`crate::services::api::ApiClient`] once per resource
/// record type.
#[async_trait]
pub trait ResourceApi<R: Record>: Send + Sync {
    type Create: Serialize + Send + Sync;
    type Update: Serialize + Send + Sync;
    /// Listing filters. `Default` lists everything.
    type Filters: Clone + Default + Send + Sync + 'static;

    /// Short resource name used in logs and events (`"lancamentos"`).
    fn resource_name(&self) -> &'static str;

    async fn list(&self, filters: &Self::Filters) -> Result<Vec<R>>;

    async fn get(&self, id: i64) -> Result<R>;

    async fn create(&self, payload: &Self::Create) -> Result<R>;

    async fn update(&self, id: i64, payload: &Self::Update) -> Result<R>;

    async fn delete(&self, id: i64) -> Result<()>;
}

/// Server-side aggregates over lançamentos.
#[async_trait]
pub trait LancamentoAnalytics: Send + Sync {
    /// `GET /financeiro/summary/stats?periodo_dias=N`
    async fn summary(&self, periodo_dias: u32) -> Result<Summary>;

    /// Monthly revenue/expense series for the last `meses` months.
    async fn evolution(&self, meses: u32) -> Result<MonthlyEvolution>;

    async fn categories(&self) -> Result<Vec<CategorySlice>>;

    /// Newest `limit` records by date.
    async fn recent(&self, limit: u32) -> Result<Vec<Lancamento>>;
}
