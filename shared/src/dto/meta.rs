//! # Meta DTOs
//!
//! Savings goal payloads for `/metas`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Goal lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusMeta {
    #[default]
    Ativa,
    Concluida,
    Pausada,
    Cancelada,
}

impl StatusMeta {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ativa => "ATIVA",
            Self::Concluida => "CONCLUIDA",
            Self::Pausada => "PAUSADA",
            Self::Cancelada => "CANCELADA",
        }
    }
}

/// Goal as received from the backend. Dates arrive as ISO datetimes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetaWire {
    pub id: i64,
    pub titulo: String,
    #[serde(default)]
    pub descricao: Option<String>,
    pub valor_meta: Decimal,
    #[serde(default)]
    pub valor_atual: Decimal,
    #[serde(default)]
    pub data_inicio: Option<String>,
    #[serde(default)]
    pub data_fim: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub categoria_id: Option<i64>,
    #[serde(default)]
    pub progresso_percentual: Option<Decimal>,
    #[serde(default)]
    pub dias_restantes: Option<i64>,
}

/// Create payload (`POST /metas`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetaCreate {
    pub titulo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub valor_meta: Decimal,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria_id: Option<i64>,
}

/// Partial update payload (`PUT /metas/:id`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub valor_meta: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub valor_atual: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_inicio: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_fim: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria_id: Option<i64>,
}

/// `GET /metas/resumo/estatisticas`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetasStats {
    #[serde(default)]
    pub total_metas: u64,
    #[serde(default)]
    pub metas_ativas: u64,
    #[serde(default)]
    pub metas_concluidas: u64,
    #[serde(default)]
    pub valor_total_metas: Decimal,
    #[serde(default)]
    pub valor_atual_total: Decimal,
    #[serde(default)]
    pub progresso_geral: Decimal,
}

/// `POST /metas/:id/atualizar-valor?novo_valor=N`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateValueResponse {
    #[serde(default)]
    pub message: String,
    pub novo_valor: Decimal,
}
