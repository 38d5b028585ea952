//! # Logging and Task Tracing
//!
//! File-based structured logging for the client library and its driver.
//!
//! ## Features
//!
//! - **File-based logging**: Structured logs to `logs/biuai-client.log` (daily rotation)
//! - **Async task tracking**: Spawn/completion logs and an active-task counter
//! - **Panic hook**: Panics are written to the log with location and backtrace
//!
//! ## Usage
//!
//! ```rust,ignore
//! // Initialize once at startup
//! biuai_client::debug::init_logger();
//!
//! // Background work goes through the tracker
//! spawn_tracked("dashboard_refresh", async move {
//!     dashboard.load_all().await
//! });
//! ```
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (e.g., `biuai_client=debug,info`)
//! - `BIUAI_LOG_DIR`: Log directory (default: `logs`)
//! - `BIUAI_LOG_STDERR`: Also write human-readable logs to stderr (1=on, 0=off)

pub mod config;
pub mod logger;
pub mod task_tracker;

pub use config::LogConfig;
pub use logger::init as init_logger;
pub use task_tracker::{active_task_count, spawn_tracked};
