//! # Services Module
//!
//! External service integrations: the BIUAI REST backend and the chatbot
//! sub-service, both reached through [`api::ApiClient`].
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                ClientContext                  │
//! │   ┌──────────────┐      ┌──────────────┐      │
//! │   │  ApiClient   │      │  ApiClient   │      │
//! │   │  (backend)   │      │  (chatbot)   │      │
//! │   └──────┬───────┘      └──────┬───────┘      │
//! └──────────┼─────────────────────┼──────────────┘
//!            │ HTTP/JSON           │ HTTP/JSON + WebSocket
//!            ▼                     ▼
//!   /financeiro /contas      /chat /config /health
//!   /metas /api/v1/*         /ws/:session_id
//! ```

pub mod api;
