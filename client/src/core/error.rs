//! # Common Error Types
//!
//! Consolidated error handling for the client library.
//!
//! This module provides a centralized error type [`AppError`] covering every
//! failure a request, a store or a background task can surface.
//!
//! ## Error Categories
//!
//! - **Network / Timeout**: the request did not complete
//! - **Auth**: the backend answered 401; the session has already been cleared
//! - **Http**: any other non-2xx answer, with the backend's `detail` text
//! - **Parse**: a response body did not match the expected shape
//! - **Validation**: pre-flight field checks, one message per problem
//! - **Storage**: durable client storage could not be read or written
//! - **Cancelled**: a result arrived after its view scope was torn down
//! - **State**: invalid use of a store (e.g. acting on a missing session)
//!
//! `AppError` is `Clone` so that every waiter of a coalesced refresh receives
//! the same error value.
//!
//! ## Usage Pattern
//!
//! ```rust
//! use biuai_client::core::error::{AppError, Result};
//!
//! fn require_positive(valor: i64) -> Result<i64> {
//!     if valor <= 0 {
//!         return Err(AppError::Validation(vec!["Valor deve ser maior que zero".to_string()]));
//!     }
//!     Ok(valor)
//! }
//!
//! assert!(require_positive(10).is_ok());
//! ```

use std::time::Duration;
use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AppError {
    /// Connection refused, DNS failure, connection reset.
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded its deadline.
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// 401 from any endpoint. The session is already gone when this is returned.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Non-2xx response other than 401.
    #[error("HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    /// Malformed or unexpected response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client-side pre-flight validation failures.
    #[error("Validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Durable storage read/write failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Result discarded because the owning scope was torn down.
    #[error("Request cancelled")]
    Cancelled,

    /// Invalid store usage or state transition.
    #[error("State error: {0}")]
    State(String),
}

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// True for failures where serving stale data is reasonable.
    ///
    /// Auth, validation and cancellation are never papered over.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Network(_) | AppError::Timeout(_) | AppError::Parse(_) => true,
            AppError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, AppError::Auth(_))
    }

    /// Short Portuguese message suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(_) => "Erro de conexão. Verifique sua internet.".to_string(),
            AppError::Timeout(_) => "O servidor demorou para responder. Tente novamente.".to_string(),
            AppError::Auth(_) => "Sua sessão expirou. Faça login novamente.".to_string(),
            AppError::Http { detail, .. } => detail.clone(),
            AppError::Parse(_) => "Resposta inesperada do servidor.".to_string(),
            AppError::Validation(errors) => errors.join("\n"),
            AppError::Storage(_) => "Não foi possível salvar os dados localmente.".to_string(),
            AppError::Cancelled => "Operação cancelada.".to_string(),
            AppError::State(msg) => msg.clone(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
