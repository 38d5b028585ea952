//! # Conta Endpoints
//!
//! Bank accounts under `/contas`.

use super::client::ApiClient;
use super::query::{Query, QueryParams};
use super::transport::Body;
use crate::core::error::Result;
use crate::core::service::ResourceApi;
use crate::model::conta::Conta;
use crate::model::lancamento::{self, Lancamento};
use async_trait::async_trait;
use shared::dto::conta::{BancosResponse, ContaCreate, ContaLancamentosWire, ContaUpdate, ContaWire, ContasStats};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContaFilters {
    pub ativa: Option<bool>,
    pub tipo_conta: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl QueryParams for ContaFilters {
    fn to_query(&self) -> Query {
        Query::new()
            .opt("ativa", self.ativa)
            .opt_text("tipo_conta", self.tipo_conta.as_deref())
            .opt("skip", self.skip)
            .opt("limit", self.limit)
    }
}

/// A conta's lançamentos with its display labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ContaLancamentos {
    pub conta: String,
    pub banco: String,
    pub lancamentos: Vec<Lancamento>,
}

#[tracing::instrument(skip_all, fields(ativa = ?filters.ativa))]
pub async fn list(client: &ApiClient, filters: &ContaFilters) -> Result<Vec<Conta>> {
    let start = std::time::Instant::now();
    let rows: Vec<ContaWire> = client.get("/contas", filters.to_query()).await.map_err(|e| {
        tracing::error!(error = %e, "Conta list failed");
        e
    })?;
    tracing::debug!(count = rows.len(), duration_ms = start.elapsed().as_millis(), "Contas fetched");
    Ok(rows.into_iter().map(Conta::from).collect())
}

pub async fn get(client: &ApiClient, id: i64) -> Result<Conta> {
    let wire: ContaWire = client.get(&format!("/contas/{}", id), Query::new()).await?;
    Ok(Conta::from(wire))
}

#[tracing::instrument(skip_all, fields(banco = %payload.banco))]
pub async fn create(client: &ApiClient, payload: &ContaCreate) -> Result<Conta> {
    let wire: ContaWire = client.post("/contas", payload).await.map_err(|e| {
        tracing::error!(error = %e, "Conta create failed");
        e
    })?;
    tracing::info!(id = wire.id, "Conta created");
    Ok(Conta::from(wire))
}

#[tracing::instrument(skip(client, payload))]
pub async fn update(client: &ApiClient, id: i64, payload: &ContaUpdate) -> Result<Conta> {
    let wire: ContaWire = client.put(&format!("/contas/{}", id), payload).await.map_err(|e| {
        tracing::error!(error = %e, "Conta update failed");
        e
    })?;
    Ok(Conta::from(wire))
}

#[tracing::instrument(skip(client))]
pub async fn delete(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&format!("/contas/{}", id)).await.map_err(|e| {
        tracing::error!(error = %e, "Conta delete failed");
        e
    })?;
    Ok(())
}

/// `PATCH /contas/:id/ativar?ativar=bool`
#[tracing::instrument(skip(client))]
pub async fn set_active(client: &ApiClient, id: i64, ativar: bool) -> Result<Conta> {
    let query = Query::new().push("ativar", ativar);
    let wire: ContaWire = client
        .patch(&format!("/contas/{}/ativar", id), query, Body::Empty)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Conta status change failed");
            e
        })?;
    Ok(Conta::from(wire))
}

pub async fn stats(client: &ApiClient) -> Result<ContasStats> {
    client.get("/contas/resumo/estatisticas", Query::new()).await
}

/// Distinct bank names across the user's contas.
pub async fn banks(client: &ApiClient) -> Result<Vec<String>> {
    let response: BancosResponse = client.get("/contas/bancos/lista", Query::new()).await?;
    Ok(response.bancos)
}

pub async fn lancamentos(client: &ApiClient, id: i64, skip: Option<u32>, limit: Option<u32>) -> Result<ContaLancamentos> {
    let query = Query::new().opt("skip", skip).opt("limit", limit);
    let wire: ContaLancamentosWire = client.get(&format!("/contas/{}/lancamentos", id), query).await?;
    Ok(ContaLancamentos {
        conta: wire.conta,
        banco: wire.banco,
        lancamentos: lancamento::from_wire_list(wire.lancamentos),
    })
}

#[async_trait]
impl ResourceApi<Conta> for ApiClient {
    type Create = ContaCreate;
    type Update = ContaUpdate;
    type Filters = ContaFilters;

    fn resource_name(&self) -> &'static str {
        "contas"
    }

    async fn list(&self, filters: &ContaFilters) -> Result<Vec<Conta>> {
        list(self, filters).await
    }

    async fn get(&self, id: i64) -> Result<Conta> {
        get(self, id).await
    }

    async fn create(&self, payload: &ContaCreate) -> Result<Conta> {
        create(self, payload).await
    }

    async fn update(&self, id: i64, payload: &ContaUpdate) -> Result<Conta> {
        update(self, id, payload).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        delete(self, id).await
    }
}
