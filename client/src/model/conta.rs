//! Conta (bank account).

use crate::core::service::Record;
use crate::store::page::{FieldValue, Viewable};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::dto::conta::ContaWire;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TipoConta {
    Corrente,
    Poupanca,
    Investimento,
    /// Any kind the backend knows and this client does not.
    Other(String),
}

impl TipoConta {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "corrente" | "conta corrente" => TipoConta::Corrente,
            "poupanca" | "poupança" => TipoConta::Poupanca,
            "investimento" => TipoConta::Investimento,
            _ => TipoConta::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TipoConta::Corrente => "CORRENTE",
            TipoConta::Poupanca => "POUPANCA",
            TipoConta::Investimento => "INVESTIMENTO",
            TipoConta::Other(raw) => raw,
        }
    }
}

impl fmt::Display for TipoConta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conta {
    pub id: i64,
    pub nome: String,
    pub banco: String,
    pub tipo_conta: TipoConta,
    pub agencia: Option<String>,
    pub numero_conta: Option<String>,
    pub saldo_inicial: Decimal,
    /// Falls back to `saldo_inicial` when the backend has not computed it.
    pub saldo_atual: Decimal,
    pub ativa: bool,
}

impl Record for Conta {
    fn id(&self) -> i64 {
        self.id
    }
}

impl From<ContaWire> for Conta {
    fn from(wire: ContaWire) -> Self {
        Self {
            id: wire.id,
            nome: wire.nome,
            banco: wire.banco,
            tipo_conta: wire
                .tipo_conta
                .as_deref()
                .map(TipoConta::parse)
                .unwrap_or(TipoConta::Corrente),
            agencia: wire.agencia.filter(|a| !a.trim().is_empty()),
            numero_conta: wire.numero_conta.filter(|n| !n.trim().is_empty()),
            saldo_inicial: wire.saldo_inicial,
            saldo_atual: wire.saldo_atual.unwrap_or(wire.saldo_inicial),
            ativa: wire.ativa.as_bool(),
        }
    }
}

impl Viewable for Conta {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "nome",
        "banco",
        "tipo_conta",
        "agencia",
        "numero_conta",
        "saldo_atual",
        "ativa",
    ];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Int(self.id)),
            "nome" => Some(FieldValue::Text(self.nome.clone())),
            "banco" => Some(FieldValue::Text(self.banco.clone())),
            "tipo_conta" => Some(FieldValue::Text(self.tipo_conta.as_str().to_string())),
            "agencia" => self.agencia.clone().map(FieldValue::Text),
            "numero_conta" => self.numero_conta.clone().map(FieldValue::Text),
            "saldo_inicial" => Some(FieldValue::Number(self.saldo_inicial)),
            "saldo_atual" => Some(FieldValue::Number(self.saldo_atual)),
            "ativa" => Some(FieldValue::Bool(self.ativa)),
            _ => None,
        }
    }
}
