//! In-memory resource APIs for store tests.

use crate::core::error::{AppError, Result};
use crate::core::service::{LancamentoAnalytics, ResourceApi};
use crate::metrics::fixtures::lanc;
use crate::model::{CategorySlice, Lancamento, Meta, MonthlyEvolution, StatusMeta, Summary, TipoLancamento};
use crate::services::api::{LancamentoFilters, MetaFilters};
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::dto::lancamento::{LancamentoCreate, LancamentoUpdate};
use shared::dto::meta::{MetaCreate, MetaUpdate};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

pub fn lancamento_create(descricao: &str, valor: i64) -> LancamentoCreate {
    LancamentoCreate {
        descricao: descricao.to_string(),
        valor: Decimal::from(valor),
        tipo: TipoLancamento::Receita,
        data_lancamento: NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
        categoria_id: None,
        conta_id: None,
    }
}

/// Server-side lançamento table. Odd ids are receitas of `100 * id`, even
/// ids despesas of `10 * id`.
pub struct FakeLancamentoApi {
    rows: Mutex<Vec<Lancamento>>,
    next_id: AtomicI64,
    delay: Duration,
    failure: Mutex<Option<AppError>>,
    list_calls: AtomicUsize,
    summary_calls: AtomicUsize,
    last_filters: Mutex<Option<LancamentoFilters>>,
}

impl FakeLancamentoApi {
    pub fn with_rows(ids: Vec<i64>) -> Self {
        let rows = ids
            .into_iter()
            .map(|id| {
                if id % 2 == 1 {
                    lanc(id, TipoLancamento::Receita, 100 * id, "2025-01-10", Some("Salário"))
                } else {
                    lanc(id, TipoLancamento::Despesa, 10 * id, "2025-01-11", Some("Mercado"))
                }
            })
            .collect();
        Self {
            rows: Mutex::new(rows),
            next_id: AtomicI64::new(1000),
            delay: Duration::ZERO,
            failure: Mutex::new(None),
            list_calls: AtomicUsize::new(0),
            summary_calls: AtomicUsize::new(0),
            last_filters: Mutex::new(None),
        }
    }

    /// Every call sleeps `delay` on the tokio clock before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_next_id(&self, id: i64) {
        self.next_id.store(id, Ordering::SeqCst);
    }

    pub fn fail_with(&self, err: AppError) {
        *self.failure.lock() = Some(err);
    }

    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    pub fn last_search(&self) -> Option<String> {
        self.last_filters.lock().as_ref().and_then(|f| f.search.clone())
    }

    pub fn server_rows(&self) -> Vec<Lancamento> {
        self.rows.lock().clone()
    }

    async fn respond(&self) -> Result<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.failure.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ResourceApi<Lancamento> for FakeLancamentoApi {
    type Create = LancamentoCreate;
    type Update = LancamentoUpdate;
    type Filters = LancamentoFilters;

    fn resource_name(&self) -> &'static str {
        "lancamentos"
    }

    async fn list(&self, filters: &LancamentoFilters) -> Result<Vec<Lancamento>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_filters.lock() = Some(filters.clone());
        self.respond().await?;
        Ok(self.rows.lock().clone())
    }

    async fn get(&self, id: i64) -> Result<Lancamento> {
        self.respond().await?;
        self.rows
            .lock()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found("Lançamento"))
    }

    async fn create(&self, payload: &LancamentoCreate) -> Result<Lancamento> {
        self.respond().await?;
        let record = Lancamento {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            descricao: payload.descricao.clone(),
            valor: payload.valor,
            tipo: payload.tipo,
            data: payload.data_lancamento,
            categoria: None,
            categoria_id: payload.categoria_id,
            conta_id: payload.conta_id,
        };
        self.rows.lock().insert(0, record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, payload: &LancamentoUpdate) -> Result<Lancamento> {
        self.respond().await?;
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found("Lançamento"))?;
        if let Some(descricao) = &payload.descricao {
            row.descricao = descricao.clone();
        }
        if let Some(valor) = payload.valor {
            row.valor = valor;
        }
        if let Some(tipo) = payload.tipo {
            row.tipo = tipo;
        }
        if let Some(data) = payload.data_lancamento {
            row.data = data;
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.respond().await?;
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(not_found("Lançamento"));
        }
        Ok(())
    }
}

#[async_trait]
impl LancamentoAnalytics for FakeLancamentoApi {
    async fn summary(&self, periodo_dias: u32) -> Result<Summary> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        self.respond().await?;
        Ok(Summary::from_records(&self.rows.lock(), Some(periodo_dias)))
    }

    async fn evolution(&self, _meses: u32) -> Result<MonthlyEvolution> {
        self.respond().await?;
        Ok(MonthlyEvolution::default())
    }

    async fn categories(&self) -> Result<Vec<CategorySlice>> {
        self.respond().await?;
        Ok(crate::metrics::category_totals(&self.rows.lock())
            .into_iter()
            .map(|t| CategorySlice {
                label: t.categoria,
                value: t.total.abs(),
            })
            .collect())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<Lancamento>> {
        self.respond().await?;
        let mut rows = self.rows.lock().clone();
        rows.sort_by(|a, b| b.data.cmp(&a.data));
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

/// Server-side goal table.
pub struct FakeMetaApi {
    rows: Mutex<Vec<Meta>>,
    failure: Mutex<Option<AppError>>,
    list_calls: AtomicUsize,
}

impl FakeMetaApi {
    pub fn with_goals(goals: Vec<(i64, i64, i64)>) -> Self {
        let rows = goals
            .into_iter()
            .map(|(id, valor_meta, valor_atual)| meta(id, valor_meta, valor_atual))
            .collect();
        Self {
            rows: Mutex::new(rows),
            failure: Mutex::new(None),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_with(&self, err: AppError) {
        *self.failure.lock() = Some(err);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        match self.failure.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

pub fn meta(id: i64, valor_meta: i64, valor_atual: i64) -> Meta {
    let status = if valor_atual >= valor_meta {
        StatusMeta::Concluida
    } else {
        StatusMeta::Ativa
    };
    Meta {
        id,
        titulo: format!("Meta {}", id),
        descricao: None,
        valor_meta: Decimal::from(valor_meta),
        valor_atual: Decimal::from(valor_atual),
        data_inicio: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        data_fim: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        status,
        categoria_id: None,
    }
}

#[async_trait]
impl ResourceApi<Meta> for FakeMetaApi {
    type Create = MetaCreate;
    type Update = MetaUpdate;
    type Filters = MetaFilters;

    fn resource_name(&self) -> &'static str {
        "metas"
    }

    async fn list(&self, _filters: &MetaFilters) -> Result<Vec<Meta>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.rows.lock().clone())
    }

    async fn get(&self, id: i64) -> Result<Meta> {
        self.check()?;
        self.rows
            .lock()
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| not_found("Meta"))
    }

    async fn create(&self, payload: &MetaCreate) -> Result<Meta> {
        self.check()?;
        let id = self.rows.lock().iter().map(|m| m.id).max().unwrap_or(0) + 1;
        let mut record = meta(id, 0, 0);
        record.titulo = payload.titulo.clone();
        record.valor_meta = payload.valor_meta;
        record.status = StatusMeta::Ativa;
        self.rows.lock().insert(0, record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, payload: &MetaUpdate) -> Result<Meta> {
        self.check()?;
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found("Meta"))?;
        if let Some(valor_atual) = payload.valor_atual {
            row.valor_atual = valor_atual;
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.check()?;
        self.rows.lock().retain(|m| m.id != id);
        Ok(())
    }
}

fn not_found(what: &str) -> AppError {
    AppError::Http {
        status: 404,
        detail: format!("{} não encontrado", what),
    }
}
