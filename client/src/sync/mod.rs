//! # Polling / Auto-Refresh
//!
//! Timer and in-flight bookkeeping for stores and views.
//!
//! ## Components
//!
//! - [`RefreshCoalescer`]: overlapping refreshes of one key share one call
//! - [`Poller`]: at most one periodic timer and one debounced call per key,
//!   aborted on drop
//! - [`ViewScope`]: a poller plus a cancellation token; late results after
//!   teardown come back as `AppError::Cancelled`
//!
//! Polling never bypasses the cache: a poll tick calls the store's normal
//! load, which serves a valid bucket without touching the network.
//!
//! ```rust,ignore
//! let scope = ViewScope::new("dashboard");
//! let store = dashboard.clone();
//! scope.poll("dashboard", Duration::from_secs(600), move || {
//!     let store = store.clone();
//!     async move { store.load_all().await; }
//! });
//! // dropping `scope` stops the timer
//! ```

pub mod coalesce;
pub mod poller;
pub mod scope;

pub use coalesce::RefreshCoalescer;
pub use poller::Poller;
pub use scope::{ScopeToken, ViewScope};
