//! Meta (savings goal).

use crate::core::error::{AppError, Result};
use crate::core::service::Record;
use crate::store::page::{FieldValue, Viewable};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::dto::meta::MetaWire;

pub use shared::dto::meta::StatusMeta;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meta {
    pub id: i64,
    pub titulo: String,
    pub descricao: Option<String>,
    pub valor_meta: Decimal,
    pub valor_atual: Decimal,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub status: StatusMeta,
    pub categoria_id: Option<i64>,
}

impl Meta {
    pub fn is_concluida(&self) -> bool {
        self.status == StatusMeta::Concluida
    }
}

impl Record for Meta {
    fn id(&self) -> i64 {
        self.id
    }
}

fn parse_status(raw: &str) -> Option<StatusMeta> {
    match raw.trim().to_uppercase().as_str() {
        "ATIVA" => Some(StatusMeta::Ativa),
        "CONCLUIDA" | "CONCLUÍDA" => Some(StatusMeta::Concluida),
        "PAUSADA" => Some(StatusMeta::Pausada),
        "CANCELADA" => Some(StatusMeta::Cancelada),
        _ => None,
    }
}

impl TryFrom<MetaWire> for Meta {
    type Error = AppError;

    fn try_from(wire: MetaWire) -> Result<Self> {
        let status = match wire.status.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => parse_status(raw).ok_or_else(|| {
                AppError::Parse(format!("meta {}: unknown status '{}'", wire.id, raw))
            })?,
            None => StatusMeta::default(),
        };

        let date = |raw: Option<&str>, field: &str| -> Result<NaiveDate> {
            match raw {
                Some(raw) => super::parse_date(raw),
                None => Err(AppError::Parse(format!("meta {}: missing {}", wire.id, field))),
            }
        };
        let data_inicio = date(wire.data_inicio.as_deref(), "data_inicio")?;
        let data_fim = date(wire.data_fim.as_deref(), "data_fim")?;

        Ok(Self {
            id: wire.id,
            titulo: wire.titulo,
            descricao: wire.descricao.filter(|d| !d.trim().is_empty()),
            valor_meta: wire.valor_meta,
            valor_atual: wire.valor_atual,
            data_inicio,
            data_fim,
            status,
            categoria_id: wire.categoria_id,
        })
    }
}

pub fn from_wire_list(rows: Vec<MetaWire>) -> Vec<Meta> {
    super::map_rows("metas", rows)
}

impl Viewable for Meta {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "titulo",
        "descricao",
        "valor_meta",
        "valor_atual",
        "data_inicio",
        "data_fim",
        "status",
    ];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Int(self.id)),
            "titulo" => Some(FieldValue::Text(self.titulo.clone())),
            "descricao" => self.descricao.clone().map(FieldValue::Text),
            "valor_meta" => Some(FieldValue::Number(self.valor_meta)),
            "valor_atual" => Some(FieldValue::Number(self.valor_atual)),
            "data_inicio" => Some(FieldValue::Date(self.data_inicio)),
            "data_fim" => Some(FieldValue::Date(self.data_fim)),
            "status" => Some(FieldValue::Text(self.status.as_str().to_string())),
            "categoria_id" => self.categoria_id.map(FieldValue::Int),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mapping() {
        let wire: MetaWire = serde_json::from_value(json!({
            "id": 1, "titulo": "Viagem", "valor_meta": 5000, "valor_atual": "1250.50",
            "data_inicio": "2025-01-01T00:00:00", "data_fim": "2025-12-31T00:00:00",
            "status": "concluida"
        }))
        .unwrap();
        let meta = Meta::try_from(wire).unwrap();
        assert_eq!(meta.status, StatusMeta::Concluida);
        assert_eq!(meta.data_fim, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert!(meta.is_concluida());
    }

    #[test]
    fn test_missing_deadline_is_rejected() {
        let wire: MetaWire = serde_json::from_value(json!({
            "id": 2, "titulo": "Carro", "valor_meta": 1, "data_inicio": "2025-01-01"
        }))
        .unwrap();
        assert!(matches!(Meta::try_from(wire), Err(AppError::Parse(_))));
    }
}
