//! # Client Configuration
//!
//! Configuration loaded from environment variables. Everything has a default,
//! so an empty environment yields a working local setup. Values are checked by
//! [`ClientConfig::validate`] before a context is built.
//!
//! | Variable                       | Default                  |
//! |--------------------------------|--------------------------|
//! | `BIUAI_API_URL`                | `http://127.0.0.1:8000`  |
//! | `BIUAI_CHATBOT_URL`            | `http://localhost:8002`  |
//! | `BIUAI_HTTP_TIMEOUT_SECS`      | `10`                     |
//! | `BIUAI_CHAT_TIMEOUT_SECS`      | `30`                     |
//! | `BIUAI_STORAGE_PATH`           | unset (in-memory)        |
//! | `BIUAI_FALLBACK`               | `stale`                  |
//! | `BIUAI_MAX_TOASTS`             | `5`                      |
//! | `BIUAI_TTL_<BUCKET>_SECS`      | see [`CacheTtls`]        |
//!
//! `<BUCKET>` is one of `SUMMARY`, `CHARTS`, `INSIGHTS`, `TRANSACTIONS`,
//! `ACCOUNTS`, `GOALS`.

use crate::cache::{CacheKey, CacheTtls};
use crate::store::loaded::FallbackPolicy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_CHATBOT_URL: &str = "http://localhost:8002";

/// Client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the REST backend
    pub api_url: String,
    /// Base URL of the chatbot sub-service
    pub chatbot_url: String,
    /// Deadline for backend requests
    pub http_timeout: Duration,
    /// Deadline for chatbot requests
    pub chat_timeout: Duration,
    /// JSON document backing durable storage; `None` keeps everything in memory
    pub storage_path: Option<PathBuf>,
    /// What stores serve when a fetch fails
    pub fallback: FallbackPolicy,
    /// Per-bucket cache lifetimes
    pub ttls: CacheTtls,
    /// Toasts shown at once; the rest stay queued
    pub max_visible_toasts: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            chatbot_url: DEFAULT_CHATBOT_URL.to_string(),
            http_timeout: Duration::from_secs(10),
            chat_timeout: Duration::from_secs(30),
            storage_path: None,
            fallback: FallbackPolicy::default(),
            ttls: CacheTtls::default(),
            max_visible_toasts: 5,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let defaults = Self::default();

        let api_url = lookup("BIUAI_API_URL").unwrap_or(defaults.api_url);
        let chatbot_url = lookup("BIUAI_CHATBOT_URL").unwrap_or(defaults.chatbot_url);

        let http_timeout = secs(&lookup, "BIUAI_HTTP_TIMEOUT_SECS")?.unwrap_or(defaults.http_timeout);
        let chat_timeout = secs(&lookup, "BIUAI_CHAT_TIMEOUT_SECS")?.unwrap_or(defaults.chat_timeout);

        let storage_path = lookup("BIUAI_STORAGE_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let fallback = match lookup("BIUAI_FALLBACK") {
            Some(value) => value.parse()?,
            None => defaults.fallback,
        };

        let max_visible_toasts = match lookup("BIUAI_MAX_TOASTS") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|e| format!("BIUAI_MAX_TOASTS must be a valid number: {}", e))?,
            None => defaults.max_visible_toasts,
        };

        let mut ttls = defaults.ttls;
        for key in CacheKey::ALL {
            let var = format!("BIUAI_TTL_{}_SECS", key.as_str().to_ascii_uppercase());
            if let Some(ttl) = secs(&lookup, &var)? {
                ttls.set(key, ttl);
            }
        }

        Ok(Self {
            api_url: trim_slash(api_url),
            chatbot_url: trim_slash(chatbot_url),
            http_timeout,
            chat_timeout,
            storage_path,
            fallback,
            ttls,
            max_visible_toasts,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        for (name, url) in [("BIUAI_API_URL", &self.api_url), ("BIUAI_CHATBOT_URL", &self.chatbot_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("{} must be an http(s) URL, got '{}'", name, url));
            }
        }

        if self.http_timeout.is_zero() {
            return Err("BIUAI_HTTP_TIMEOUT_SECS must be greater than zero".to_string());
        }
        if self.chat_timeout.is_zero() {
            return Err("BIUAI_CHAT_TIMEOUT_SECS must be greater than zero".to_string());
        }

        for key in CacheKey::ALL {
            if self.ttls.for_key(key).is_zero() {
                return Err(format!(
                    "BIUAI_TTL_{}_SECS must be greater than zero",
                    key.as_str().to_ascii_uppercase()
                ));
            }
        }

        if self.max_visible_toasts == 0 {
            return Err("BIUAI_MAX_TOASTS must be at least 1".to_string());
        }

        Ok(())
    }
}

fn secs(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<Duration>, String> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(|s| Some(Duration::from_secs(s)))
            .map_err(|e| format!("{} must be a whole number of seconds: {}", key, e)),
        None => Ok(None),
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
