//! # Meta Endpoints
//!
//! Savings goals under `/metas`.

use super::client::ApiClient;
use super::query::{Query, QueryParams};
use super::transport::{Body, Method};
use crate::core::error::Result;
use crate::core::service::ResourceApi;
use crate::model::meta::{self, Meta, StatusMeta};
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::dto::meta::{MetaCreate, MetaUpdate, MetaWire, MetasStats, UpdateValueResponse};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaFilters {
    pub status: Option<StatusMeta>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl QueryParams for MetaFilters {
    fn to_query(&self) -> Query {
        Query::new()
            .opt("status", self.status.map(|s| s.as_str()))
            .opt("skip", self.skip)
            .opt("limit", self.limit)
    }
}

#[tracing::instrument(skip_all, fields(status = ?filters.status))]
pub async fn list(client: &ApiClient, filters: &MetaFilters) -> Result<Vec<Meta>> {
    let start = std::time::Instant::now();
    let rows: Vec<MetaWire> = client.get("/metas", filters.to_query()).await.map_err(|e| {
        tracing::error!(error = %e, "Meta list failed");
        e
    })?;
    let metas = meta::from_wire_list(rows);
    tracing::debug!(count = metas.len(), duration_ms = start.elapsed().as_millis(), "Metas fetched");
    Ok(metas)
}

pub async fn get(client: &ApiClient, id: i64) -> Result<Meta> {
    let wire: MetaWire = client.get(&format!("/metas/{}", id), Query::new()).await?;
    Meta::try_from(wire)
}

#[tracing::instrument(skip_all, fields(titulo = %payload.titulo))]
pub async fn create(client: &ApiClient, payload: &MetaCreate) -> Result<Meta> {
    let wire: MetaWire = client.post("/metas", payload).await.map_err(|e| {
        tracing::error!(error = %e, "Meta create failed");
        e
    })?;
    Meta::try_from(wire)
}

#[tracing::instrument(skip(client, payload))]
pub async fn update(client: &ApiClient, id: i64, payload: &MetaUpdate) -> Result<Meta> {
    let wire: MetaWire = client.put(&format!("/metas/{}", id), payload).await.map_err(|e| {
        tracing::error!(error = %e, "Meta update failed");
        e
    })?;
    Meta::try_from(wire)
}

#[tracing::instrument(skip(client))]
pub async fn delete(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&format!("/metas/{}", id)).await.map_err(|e| {
        tracing::error!(error = %e, "Meta delete failed");
        e
    })?;
    Ok(())
}

/// `POST /metas/:id/atualizar-valor?novo_valor=X` with an empty body.
#[tracing::instrument(skip(client), fields(novo_valor = %novo_valor))]
pub async fn update_value(client: &ApiClient, id: i64, novo_valor: Decimal) -> Result<UpdateValueResponse> {
    let query = Query::new().push("novo_valor", novo_valor.normalize());
    let value = client
        .request(
            Method::Post,
            &format!("/metas/{}/atualizar-valor", id),
            query,
            Body::Empty,
            Default::default(),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Meta value update failed");
            e
        })?;
    super::client::decode(value)
}

pub async fn stats(client: &ApiClient) -> Result<MetasStats> {
    client.get("/metas/resumo/estatisticas", Query::new()).await
}

#[async_trait]
impl ResourceApi<Meta> for ApiClient {
    type Create = MetaCreate;
    type Update = MetaUpdate;
    type Filters = MetaFilters;

    fn resource_name(&self) -> &'static str {
        "metas"
    }

    async fn list(&self, filters: &MetaFilters) -> Result<Vec<Meta>> {
        list(self, filters).await
    }

    async fn get(&self, id: i64) -> Result<Meta> {
        get(self, id).await
    }

    async fn create(&self, payload: &MetaCreate) -> Result<Meta> {
        create(self, payload).await
    }

    async fn update(&self, id: i64, payload: &MetaUpdate) -> Result<Meta> {
        update(self, id, payload).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        delete(self, id).await
    }
}
