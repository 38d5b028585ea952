//! # Stores
//!
//! Explicit, `Arc`-shared state owners. Every store is built by
//! [`ClientContext`](crate::context::ClientContext) and holds its own API
//! handle, TTL buckets and lock-guarded state.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐
//! │  DashboardStore  │──▶│ LancamentosStore │──┐
//! │  prefs, widgets  │   │ aggregates       │  │
//! └────────┬─────────┘   └──────────────────┘  │
//!          │             ┌──────────────────┐  ▼
//!          └────────────▶│  ResourceStore   │ TTL buckets + coalescer
//!                        │  (metas, contas) │
//!                        └──────────────────┘
//! ┌──────────────────┐   ┌──────────────────┐
//! │    AuthStore     │──▶│   SessionStore   │──▶ Storage
//! └──────────────────┘   └──────────────────┘
//! ```
//!
//! Reads return `Result<Loaded<T>>`: the data plus where it came from
//! ([`DataOrigin`]). How failures degrade is decided by [`FallbackPolicy`].

pub mod aggregate;
pub mod auth;
pub mod dashboard;
pub mod lancamentos;
pub mod loaded;
pub mod page;
pub mod preferences;
pub mod resource;
pub mod session;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregate::AggregateCache;
pub use auth::AuthStore;
pub use dashboard::{DashboardData, DashboardStore, ResponseTimes};
pub use lancamentos::LancamentosStore;
pub use loaded::{DataOrigin, FallbackPolicy, Loaded};
pub use page::{FieldValue, Page, PageView, SortOrder, Viewable};
pub use preferences::{DashboardPreferences, WidgetSettings};
pub use resource::ResourceStore;
pub use session::{Session, SessionStore};
pub use storage::{FileStorage, MemoryStorage, Storage};
