//! # Conta DTOs
//!
//! Bank account payloads for `/contas`.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// `ativa` flag. The backend stores it as the string `"true"`/`"false"`;
/// newer endpoints send a JSON boolean.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FlagWire {
    Bool(bool),
    Text(String),
}

impl FlagWire {
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => s.eq_ignore_ascii_case("true"),
        }
    }
}

impl Default for FlagWire {
    fn default() -> Self {
        Self::Bool(true)
    }
}

/// Account as received from the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContaWire {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub banco: String,
    #[serde(default)]
    pub tipo_conta: Option<String>,
    #[serde(default)]
    pub agencia: Option<String>,
    #[serde(default)]
    pub numero_conta: Option<String>,
    #[serde(default)]
    pub saldo_inicial: Decimal,
    #[serde(default)]
    pub saldo_atual: Option<Decimal>,
    #[serde(default)]
    pub ativa: FlagWire,
    #[serde(default)]
    pub total_receitas: Option<Decimal>,
    #[serde(default)]
    pub total_despesas: Option<Decimal>,
    #[serde(default)]
    pub total_lancamentos: Option<u64>,
}

/// Create payload (`POST /contas`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContaCreate {
    pub nome: String,
    pub banco: String,
    pub tipo_conta: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agencia: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_conta: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub saldo_inicial: Option<Decimal>,
}

/// Partial update payload (`PUT /contas/:id`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banco: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_conta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agencia: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_conta: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub saldo_inicial: Option<Decimal>,
    /// Sent as `"true"`/`"false"`, the form the backend stores.
    #[serde(
        default,
        serialize_with = "serialize_flag_text",
        deserialize_with = "deserialize_flag_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub ativa: Option<bool>,
}

fn serialize_flag_text<S: serde::Serializer>(value: &Option<bool>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(true) => s.serialize_str("true"),
        Some(false) => s.serialize_str("false"),
        None => s.serialize_none(),
    }
}

fn deserialize_flag_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(Option::<FlagWire>::deserialize(d)?.map(|f| f.as_bool()))
}

/// `GET /contas/resumo/estatisticas`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContasStats {
    #[serde(default)]
    pub total_contas: u64,
    #[serde(default)]
    pub contas_ativas: u64,
    #[serde(default)]
    pub saldo_total: Decimal,
    #[serde(default)]
    pub maior_saldo: Decimal,
    #[serde(default)]
    pub menor_saldo: Decimal,
    #[serde(default)]
    pub banco_principal: Option<String>,
}

/// `GET /contas/bancos/lista`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BancosResponse {
    #[serde(default)]
    pub bancos: Vec<String>,
}

/// `GET /contas/:id/lancamentos`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContaLancamentosWire {
    #[serde(default)]
    pub conta: String,
    #[serde(default)]
    pub banco: String,
    #[serde(default)]
    pub lancamentos: Vec<super::lancamento::LancamentoWire>,
}

/// Plain `{ "message": ... }` acknowledgement used by delete/toggle endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
