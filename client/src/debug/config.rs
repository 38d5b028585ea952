//! Logging configuration from environment variables

use std::path::PathBuf;

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "biuai_client=info,warn";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log directory (for rotation)
    pub log_dir: PathBuf,
    /// File name prefix inside `log_dir`
    pub file_name: String,
    /// Log level filter (e.g., "biuai_client=debug,info")
    pub log_level: String,
    /// Mirror events to stderr in addition to the file
    pub stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            file_name: "biuai-client.log".to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            stderr: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_dir: std::env::var("BIUAI_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            file_name: defaults.file_name,
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            stderr: std::env::var("BIUAI_LOG_STDERR")
                .map(|v| v == "1")
                .unwrap_or(false),
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(&self.file_name)
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}
