//! Lançamento (financial record).

use crate::core::error::{AppError, Result};
use crate::core::service::Record;
use crate::store::page::{FieldValue, Viewable};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::dto::lancamento::LancamentoWire;

pub use shared::dto::lancamento::TipoLancamento;

/// Category label for records without one.
pub const SEM_CATEGORIA: &str = "Sem categoria";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lancamento {
    pub id: i64,
    pub descricao: String,
    /// Always non-negative; see [`Lancamento::signed_valor`].
    pub valor: Decimal,
    pub tipo: TipoLancamento,
    pub data: NaiveDate,
    pub categoria: Option<String>,
    pub categoria_id: Option<i64>,
    pub conta_id: Option<i64>,
}

impl Lancamento {
    pub fn is_receita(&self) -> bool {
        self.tipo == TipoLancamento::Receita
    }

    pub fn is_despesa(&self) -> bool {
        self.tipo == TipoLancamento::Despesa
    }

    /// `valor` for revenue, `-valor` for expenses.
    pub fn signed_valor(&self) -> Decimal {
        match self.tipo {
            TipoLancamento::Receita => self.valor,
            TipoLancamento::Despesa => -self.valor,
        }
    }

    pub fn categoria_or_default(&self) -> &str {
        self.categoria
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(SEM_CATEGORIA)
    }
}

impl Record for Lancamento {
    fn id(&self) -> i64 {
        self.id
    }
}

impl TryFrom<LancamentoWire> for Lancamento {
    type Error = AppError;

    fn try_from(wire: LancamentoWire) -> Result<Self> {
        let tipo = match wire.tipo.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(raw) => TipoLancamento::parse(raw).ok_or_else(|| {
                AppError::Parse(format!("lançamento {}: unknown tipo '{}'", wire.id, raw))
            })?,
            // Legacy rows carry the kind in the sign
            None if wire.valor.is_sign_negative() => TipoLancamento::Despesa,
            None => TipoLancamento::Receita,
        };

        let data = match wire.data_lancamento.as_deref() {
            Some(raw) => super::parse_date(raw)?,
            None => {
                return Err(AppError::Parse(format!("lançamento {}: missing date", wire.id)));
            }
        };

        let categoria = wire.categoria.as_ref().map(|c| c.nome().to_string());
        let categoria_id = wire.categoria_id.or(match &wire.categoria {
            Some(shared::dto::lancamento::CategoriaRef::Objeto { id, .. }) => *id,
            _ => None,
        });

        Ok(Self {
            id: wire.id,
            descricao: wire.descricao,
            valor: wire.valor.abs(),
            tipo,
            data,
            categoria,
            categoria_id,
            conta_id: wire.conta_id,
        })
    }
}

/// Map a list response, skipping malformed rows.
pub fn from_wire_list(rows: Vec<LancamentoWire>) -> Vec<Lancamento> {
    super::map_rows("lancamentos", rows)
}

impl Viewable for Lancamento {
    const FIELDS: &'static [&'static str] =
        &["id", "descricao", "valor", "tipo", "data", "categoria", "categoria_id", "conta_id"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Int(self.id)),
            "descricao" => Some(FieldValue::Text(self.descricao.clone())),
            "valor" => Some(FieldValue::Number(self.valor)),
            "tipo" => Some(FieldValue::Text(self.tipo.as_str().to_string())),
            "data" => Some(FieldValue::Date(self.data)),
            "categoria" => self.categoria.clone().map(FieldValue::Text),
            "categoria_id" => self.categoria_id.map(FieldValue::Int),
            "conta_id" => self.conta_id.map(FieldValue::Int),
            _ => None,
        }
    }
}
