//! # Data Transfer Objects (DTOs)
//!
//! Structures exchanged with the BIUAI REST API and the chatbot sub-service.
//!
//! ## Module Organization
//!
//! - [`auth`] - Login (form-encoded), registration, user info, error bodies
//! - [`lancamento`] - Financial records, summary stats, evolution/category analytics
//! - [`conta`] - Bank accounts and account statistics
//! - [`meta`] - Savings goals and goal statistics
//! - [`profile`] - Profile, password change, user stats
//! - [`chatbot`] - Chat messages, history, bot config, admin endpoints, push frames
//!
//! ## Serialization Format
//!
//! - **Field naming**: Portuguese snake_case, as the backend emits it
//! - **Optional fields**: Omitted when `None` using `#[serde(skip_serializing_if = "Option::is_none")]`
//! - **Enums**: Uppercase strings (`RECEITA`, `DESPESA`, `ATIVA`, ...)
//! - **Money**: `rust_decimal::Decimal`, accepted from numbers or strings, sent as numbers
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /api/v1/auth/login
//! Content-Type: application/x-www-form-urlencoded
//!
//! username=ana%40example.com&password=Secret123
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//! Content-Type: application/json
//!
//! {
//!   "access_token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
//!   "token_type": "bearer",
//!   "user": { "id": 1, "email": "ana@example.com", "nome": "Ana" }
//! }
//! ```

pub mod auth;
pub mod chatbot;
pub mod conta;
pub mod lancamento;
pub mod meta;
pub mod profile;

pub use auth::*;
pub use chatbot::*;
pub use conta::*;
pub use lancamento::*;
pub use meta::*;
pub use profile::*;
