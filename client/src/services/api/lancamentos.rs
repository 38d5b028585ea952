//! # Lançamento Endpoints
//!
//! CRUD over `/financeiro` plus the summary and analytics reads.

use super::client::{decode, ApiClient};
use super::query::{Query, QueryParams};
use crate::core::error::{AppError, Result};
use crate::core::service::{LancamentoAnalytics, ResourceApi};
use crate::model::lancamento::{self, Lancamento};
use crate::model::summary::{categories_from_wire, CategorySlice, MonthlyEvolution, Summary};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::dto::lancamento::{
    CategoriesWire, EvolutionWire, LancamentoCreate, LancamentoUpdate, LancamentoWire, SummaryWire,
};

/// `GET /financeiro` filters. `None` fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LancamentoFilters {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    pub categoria_id: Option<i64>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl QueryParams for LancamentoFilters {
    fn to_query(&self) -> Query {
        Query::new()
            .opt("skip", self.skip)
            .opt("limit", self.limit)
            .opt_text("search", self.search.as_deref())
            .opt("data_inicio", self.data_inicio.map(|d| d.format("%Y-%m-%d")))
            .opt("data_fim", self.data_fim.map(|d| d.format("%Y-%m-%d")))
            .opt("categoria_id", self.categoria_id)
            .opt_text("sort", self.sort.as_deref())
            .opt_text("order", self.order.as_deref())
    }
}

/// List lançamentos matching `filters`.
#[tracing::instrument(skip_all, fields(search = ?filters.search))]
pub async fn list(client: &ApiClient, filters: &LancamentoFilters) -> Result<Vec<Lancamento>> {
    let start = std::time::Instant::now();
    let rows: Vec<LancamentoWire> = client.get("/financeiro", filters.to_query()).await.map_err(|e| {
        tracing::error!(error = %e, "Lançamento list failed");
        e
    })?;
    let records = lancamento::from_wire_list(rows);
    tracing::debug!(
        count = records.len(),
        duration_ms = start.elapsed().as_millis(),
        "Lançamentos fetched"
    );
    Ok(records)
}

pub async fn get(client: &ApiClient, id: i64) -> Result<Lancamento> {
    let wire: LancamentoWire = client.get(&format!("/financeiro/{}", id), Query::new()).await?;
    Lancamento::try_from(wire)
}

#[tracing::instrument(skip_all, fields(tipo = %payload.tipo.as_str()))]
pub async fn create(client: &ApiClient, payload: &LancamentoCreate) -> Result<Lancamento> {
    let start = std::time::Instant::now();
    let wire: LancamentoWire = client.post("/financeiro", payload).await.map_err(|e| {
        tracing::error!(error = %e, "Lançamento create failed");
        e
    })?;
    let record = Lancamento::try_from(wire)?;
    tracing::info!(id = record.id, duration_ms = start.elapsed().as_millis(), "Lançamento created");
    Ok(record)
}

#[tracing::instrument(skip(client, payload))]
pub async fn update(client: &ApiClient, id: i64, payload: &LancamentoUpdate) -> Result<Lancamento> {
    let wire: LancamentoWire = client
        .put(&format!("/financeiro/{}", id), payload)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Lançamento update failed");
            e
        })?;
    Lancamento::try_from(wire)
}

#[tracing::instrument(skip(client))]
pub async fn delete(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&format!("/financeiro/{}", id)).await.map_err(|e| {
        tracing::error!(error = %e, "Lançamento delete failed");
        e
    })?;
    tracing::info!("Lançamento deleted");
    Ok(())
}

/// `GET /financeiro/summary/stats?periodo_dias=N`
#[tracing::instrument(skip(client))]
pub async fn summary(client: &ApiClient, periodo_dias: u32) -> Result<Summary> {
    let start = std::time::Instant::now();
    let query = Query::new().push("periodo_dias", periodo_dias);
    let wire: SummaryWire = client.get("/financeiro/summary/stats", query).await.map_err(|e| {
        tracing::error!(error = %e, "Summary fetch failed");
        e
    })?;
    let mut summary = Summary::from(wire);
    summary.periodo_dias.get_or_insert(periodo_dias);
    tracing::debug!(duration_ms = start.elapsed().as_millis(), "Summary fetched");
    Ok(summary)
}

/// Monthly evolution series. A `null` body (no data yet) maps to an empty
/// series.
#[tracing::instrument(skip(client))]
pub async fn evolution(client: &ApiClient, meses: u32) -> Result<MonthlyEvolution> {
    let query = Query::new().push("meses", meses);
    let value = client
        .request(
            super::transport::Method::Get,
            "/financeiro/analytics/evolution",
            query,
            super::transport::Body::Empty,
            Default::default(),
        )
        .await?;
    if value.is_null() {
        return Ok(MonthlyEvolution::default());
    }
    let wire: EvolutionWire = decode(value)?;
    Ok(MonthlyEvolution::from(wire))
}

pub async fn categories(client: &ApiClient) -> Result<Vec<CategorySlice>> {
    let value = client
        .request(
            super::transport::Method::Get,
            "/financeiro/analytics/categories",
            Query::new(),
            super::transport::Body::Empty,
            Default::default(),
        )
        .await?;
    if value.is_null() {
        return Ok(Vec::new());
    }
    let wire: CategoriesWire = decode(value)?;
    Ok(categories_from_wire(wire))
}

/// Free-text search (`?search=`). A blank query is rejected before any
/// request is made.
pub async fn search(client: &ApiClient, q: &str) -> Result<Vec<Lancamento>> {
    if q.trim().is_empty() {
        return Err(AppError::Validation(vec!["Termo de busca é obrigatório".to_string()]));
    }
    let filters = LancamentoFilters {
        search: Some(q.to_string()),
        ..Default::default()
    };
    list(client, &filters).await
}

pub async fn by_date_range(client: &ApiClient, data_inicio: NaiveDate, data_fim: NaiveDate) -> Result<Vec<Lancamento>> {
    let filters = LancamentoFilters {
        data_inicio: Some(data_inicio),
        data_fim: Some(data_fim),
        ..Default::default()
    };
    list(client, &filters).await
}

pub async fn by_category(client: &ApiClient, categoria_id: i64) -> Result<Vec<Lancamento>> {
    let filters = LancamentoFilters {
        categoria_id: Some(categoria_id),
        ..Default::default()
    };
    list(client, &filters).await
}

/// Newest `limit` records, sorted by date descending on the server.
pub async fn recent(client: &ApiClient, limit: u32) -> Result<Vec<Lancamento>> {
    let filters = LancamentoFilters {
        limit: Some(limit),
        sort: Some("data_lancamento".to_string()),
        order: Some("desc".to_string()),
        ..Default::default()
    };
    let mut records = list(client, &filters).await?;
    records.sort_by(|a, b| b.data.cmp(&a.data));
    records.truncate(limit as usize);
    Ok(records)
}

#[async_trait]
impl ResourceApi<Lancamento> for ApiClient {
    type Create = LancamentoCreate;
    type Update = LancamentoUpdate;
    type Filters = LancamentoFilters;

    fn resource_name(&self) -> &'static str {
        "lancamentos"
    }

    async fn list(&self, filters: &LancamentoFilters) -> Result<Vec<Lancamento>> {
        list(self, filters).await
    }

    async fn get(&self, id: i64) -> Result<Lancamento> {
        get(self, id).await
    }

    async fn create(&self, payload: &LancamentoCreate) -> Result<Lancamento> {
        create(self, payload).await
    }

    async fn update(&self, id: i64, payload: &LancamentoUpdate) -> Result<Lancamento> {
        update(self, id, payload).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        delete(self, id).await
    }
}

#[async_trait]
impl LancamentoAnalytics for ApiClient {
    async fn summary(&self, periodo_dias: u32) -> Result<Summary> {
        summary(self, periodo_dias).await
    }

    async fn evolution(&self, meses: u32) -> Result<MonthlyEvolution> {
        evolution(self, meses).await
    }

    async fn categories(&self) -> Result<Vec<CategorySlice>> {
        categories(self).await
    }

    async fn recent(&self, limit: u32) -> Result<Vec<Lancamento>> {
        recent(self, limit).await
    }
}
