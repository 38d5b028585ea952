//! # Notifications
//!
//! Two surfaces for user-visible messages:
//!
//! - [`ToastQueue`]: transient messages, most recent first, each with its own
//!   expiry timer. Only the first `max_visible` are shown; the rest wait.
//! - [`NotificationCenter`]: a persistent list with read/dismissed flags,
//!   priorities and categories, plus domain helpers such as
//!   [`NotificationCenter::notify_error`].
//!
//! Expiry timers run on the tokio clock, so paused-clock tests drive them
//! with `tokio::time::advance`.

pub mod center;
pub mod toast;

pub use center::{NewNotification, Notification, NotificationCenter};
pub use toast::{Toast, ToastOptions, ToastQueue};

use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    /// Display time when the caller does not choose one.
    pub fn default_duration(&self) -> Duration {
        match self {
            ToastKind::Success | ToastKind::Info => Duration::from_secs(5),
            ToastKind::Warning => Duration::from_secs(6),
            ToastKind::Error => Duration::from_secs(8),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}
