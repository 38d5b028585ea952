//! # Lançamento DTOs
//!
//! Financial record payloads for `/financeiro` and its summary/analytics sub-paths.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Record kind. The backend uses uppercase names.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum TipoLancamento {
    Receita,
    Despesa,
}

impl TipoLancamento {
    /// Parse a kind case-insensitively (`"receita"`, `"RECEITA"`, `"Despesa"`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "RECEITA" => Some(Self::Receita),
            "DESPESA" => Some(Self::Despesa),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receita => "RECEITA",
            Self::Despesa => "DESPESA",
        }
    }
}

/// Category reference. Some endpoints send the category name, others the
/// joined category object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CategoriaRef {
    Nome(String),
    Objeto {
        #[serde(default)]
        id: Option<i64>,
        nome: String,
    },
}

impl CategoriaRef {
    pub fn nome(&self) -> &str {
        match self {
            Self::Nome(nome) => nome,
            Self::Objeto { nome, .. } => nome,
        }
    }
}

/// Financial record as received from the backend.
///
/// `valor` may arrive negative for expenses; `tipo` may be missing on legacy
/// rows. Use the client's mapping step to obtain a strict record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LancamentoWire {
    pub id: i64,
    #[serde(default)]
    pub descricao: String,
    pub valor: Decimal,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default, alias = "data", alias = "date")]
    pub data_lancamento: Option<String>,
    #[serde(default, alias = "categoria_nome")]
    pub categoria: Option<CategoriaRef>,
    #[serde(default)]
    pub categoria_id: Option<i64>,
    #[serde(default)]
    pub conta_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Create payload (`POST /financeiro`). `valor` is always positive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LancamentoCreate {
    pub descricao: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub valor: Decimal,
    pub tipo: TipoLancamento,
    pub data_lancamento: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conta_id: Option<i64>,
}

/// Partial update payload (`PUT /financeiro/:id`). Unset fields are omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LancamentoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub valor: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo: Option<TipoLancamento>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_lancamento: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conta_id: Option<i64>,
}

/// `GET /financeiro/summary/stats?periodo_dias=N`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryWire {
    #[serde(default)]
    pub total_receitas: Decimal,
    #[serde(default)]
    pub total_despesas: Decimal,
    #[serde(default)]
    pub saldo: Option<Decimal>,
    #[serde(default, alias = "count")]
    pub total_lancamentos: u64,
    #[serde(default)]
    pub periodo_dias: Option<u32>,
    #[serde(default)]
    pub crescimento_receitas: Option<Decimal>,
    #[serde(default)]
    pub crescimento_despesas: Option<Decimal>,
}

/// `GET /financeiro/analytics/evolution?meses=N`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EvolutionWire {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub receitas: Vec<Decimal>,
    #[serde(default)]
    pub despesas: Vec<Decimal>,
}

/// `GET /financeiro/analytics/categories`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoriesWire {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub values: Vec<Decimal>,
}
