//! # Utility Functions
//!
//! ## Modules
//!
//! - **[`validation`]**: Pre-flight input checks (lançamentos, contas, metas,
//!   chat messages, registration email and password)
//!
//! ## Related Modules
//!
//! - [`shared::utils`]: Display formatting (BRL currency, dates)
//! - [`crate::core`]: Core abstractions and error types

pub mod validation;
