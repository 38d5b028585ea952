//! # Core Abstractions
//!
//! Core traits and error types for dependency injection and testability.
//!
//! ## Modules
//!
//! - **[`error`]**: Application error type (`AppError`, `Result<T>`)
//! - **[`service`]**: Resource traits (`Record`, `ResourceApi`, `LancamentoAnalytics`)
//!
//! ## Dependency Injection
//!
//! Stores are generic over [`ResourceApi`], so tests can hand them a fake:
//!
//! ```rust,ignore
//! // In production: the HTTP adapter
//! let store = ResourceStore::new(Arc::new(api_client), ttl, policy);
//!
//! // In tests: an in-memory implementation
//! let store = ResourceStore::new(Arc::new(FakeApi::default()), ttl, policy);
//! ```

pub mod error;
pub mod service;

pub use error::{AppError, Result};
pub use service::{LancamentoAnalytics, Record, ResourceApi};
