//! # BIUAI Client - Library Root
//!
//! Async data synchronization layer between a personal-finance UI and the
//! BIUAI REST backend plus its chatbot sub-service.
//!
//! ## Features
//!
//! - **Typed resource services**: lançamentos, contas, metas, auth, profile
//!   and chatbot endpoints mapped from lenient wire DTOs to strict records
//! - **TTL caching**: per-bucket lifetimes with stale fallback
//! - **Polling**: view-scoped refresh timers, coalesced concurrent refreshes
//! - **Derived metrics**: totals, efficiency, growth, monthly trends, KPIs
//! - **Local reconciliation**: create/update/delete applied to cached
//!   collections without refetching
//! - **Notifications**: auto-expiring toasts and a persistent center
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                  ClientContext                         │
//! │  AuthStore  DashboardStore  LancamentosStore  ...      │
//! ├────────────────────────────────────────────────────────┤
//! │  cache (TtlStore)   sync (Poller, ViewScope)   notify  │
//! ├────────────────────────────────────────────────────────┤
//! │  services::api  (ApiClient over a Transport)           │
//! └────────────────────────────────────────────────────────┘
//!          │ HTTP                       │ WebSocket
//!          ▼                            ▼
//! ┌─────────────────┐          ┌─────────────────────────┐
//! │  REST backend   │          │   Chatbot sub-service   │
//! └─────────────────┘          └─────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **context**: builds and owns every store
//! - **store**: resource, aggregate, auth and dashboard state
//! - **services**: HTTP adapter and endpoint functions
//! - **cache** / **sync**: TTL buckets, coalescing, polling
//! - **metrics**: pure computations over records and summaries
//! - **model**: strict internal records
//! - **notify**: toasts and notifications
//! - **core**: error type and service traits
//! - **debug**: logging and task tracking
//! - **utils**: pre-flight validation

pub mod cache;
pub mod config;
pub mod context;
pub mod core;
pub mod debug;
pub mod events;
pub mod metrics;
pub mod model;
pub mod notify;
pub mod services;
pub mod store;
pub mod sync;
pub mod utils;

pub use config::ClientConfig;
pub use context::ClientContext;
pub use core::error::{AppError, Result};
pub use events::{ClientEvent, EventBus};
