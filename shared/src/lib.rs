//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the BIUAI client and the backend API.
//! All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Login form, token response, user info, error bodies
//!   - **[`dto::lancamento`]**: Financial records, summary and analytics payloads
//!   - **[`dto::conta`]**: Bank accounts
//!   - **[`dto::meta`]**: Savings goals
//!   - **[`dto::profile`]**: Profile and preferences
//!   - **[`dto::chatbot`]**: Chatbot sub-service
//! - **[`utils`]**: Display formatting (BRL currency, percentages, relative time)
//!
//! ## Wire Format
//!
//! Response DTOs are deliberately lenient: the backend is not consistent about
//! field names (`data` vs `data_lancamento`, `categoria` as a name or as an
//! object) or about the sign of expense amounts. The client maps every response
//! DTO into a strict internal record before anything else touches it.
//!
//! Request DTOs are strict and serialize money as JSON numbers:
//!
//! ```rust
//! use shared::dto::lancamento::{LancamentoCreate, TipoLancamento};
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//!
//! let payload = LancamentoCreate {
//!     descricao: "Salário".to_string(),
//!     valor: Decimal::new(850000, 2),
//!     tipo: TipoLancamento::Receita,
//!     data_lancamento: NaiveDate::from_ymd_opt(2025, 1, 25).unwrap(),
//!     categoria_id: None,
//!     conta_id: None,
//! };
//! let json = serde_json::to_value(&payload).unwrap();
//! assert_eq!(json["tipo"], "RECEITA");
//! assert_eq!(json["valor"], 8500.0);
//! ```

pub mod dto;
pub mod utils;

pub use dto::*;
pub use utils::*;
