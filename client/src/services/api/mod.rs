//! # Backend API Client Module
//!
//! HTTP adapter and resource services for the BIUAI backend and its chatbot
//! sub-service.
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs          - Module exports and documentation
//! ├── transport.rs    - Transport trait and the reqwest implementation
//! ├── client.rs       - ApiClient: auth header, deadline, 401 handling
//! ├── query.rs        - Query strings with absent filters omitted
//! ├── auth.rs         - Login, register, current user
//! ├── profile.rs      - Profile, password and preferences
//! ├── lancamentos.rs  - Lançamento CRUD, summaries and analytics
//! ├── contas.rs       - Bank account CRUD and statistics
//! ├── metas.rs        - Savings goal CRUD and progress updates
//! ├── chatbot.rs      - Chatbot sub-service
//! └── websocket.rs    - Chat push channel
//! ```
//!
//! Resource modules expose free functions taking `&ApiClient`, and implement
//! [`crate::core::ResourceApi`] on `ApiClient` by delegating to them.

pub mod auth;
pub mod chatbot;
pub mod client;
pub mod contas;
pub mod lancamentos;
pub mod metas;
pub mod profile;
pub mod query;
pub mod transport;
pub mod websocket;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ApiClient, RequestOptions};
pub use contas::ContaFilters;
pub use lancamentos::LancamentoFilters;
pub use metas::MetaFilters;
pub use query::{Query, QueryParams};
pub use transport::{Body, HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
pub use websocket::{ChatStream, ChatStreamStats};
