//! View scopes: the lifetime of one screen's timers and requests.

use super::poller::Poller;
use crate::core::error::{AppError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;

/// Cancellation signal handed to work started inside a [`ViewScope`].
#[derive(Debug, Clone)]
pub struct ScopeToken {
    rx: watch::Receiver<bool>,
}

impl ScopeToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the scope is torn down or dropped.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Run `fut` unless the scope goes away first. A result that arrives
    /// after teardown is discarded as `AppError::Cancelled`.
    pub async fn guard<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        if self.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(AppError::Cancelled),
            result = fut => {
                if self.is_cancelled() {
                    tracing::debug!("Discarding result that arrived after teardown");
                    Err(AppError::Cancelled)
                } else {
                    result
                }
            }
        }
    }
}

/// RAII owner of a view's poll timers, debounced calls and cancellation token.
///
/// Teardown (explicit or on drop) aborts every timer and cancels every
/// token; nothing registered through the scope runs afterwards.
pub struct ViewScope {
    name: String,
    tx: watch::Sender<bool>,
    poller: Poller,
}

impl ViewScope {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        tracing::debug!(scope = %name, "View scope opened");
        let (tx, _rx) = watch::channel(false);
        Self {
            name,
            tx,
            poller: Poller::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn token(&self) -> ScopeToken {
        ScopeToken {
            rx: self.tx.subscribe(),
        }
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    /// Arm a poll timer owned by this scope. Ignored after teardown.
    pub fn poll<F, Fut>(&self, key: impl Into<String>, period: Duration, refresh: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.is_torn_down() {
            tracing::warn!(scope = %self.name, "Ignoring poll registration on a torn-down scope");
            return;
        }
        self.poller.arm(key, period, refresh);
    }

    /// Debounce `action` under `key` on this scope's poller. Ignored after
    /// teardown; a call still waiting at teardown never runs.
    pub fn debounce<Fut>(&self, key: impl Into<String>, delay: Duration, action: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.is_torn_down() {
            tracing::warn!(scope = %self.name, "Ignoring debounce on a torn-down scope");
            return;
        }
        self.poller.debounce(key, delay, action);
    }

    /// Shorthand for `self.token().guard(fut)`.
    pub async fn run<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        self.token().guard(fut).await
    }

    pub fn is_torn_down(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn teardown(&self) {
        if self.tx.send_replace(true) {
            return;
        }
        self.poller.teardown();
        tracing::debug!(scope = %self.name, "View scope torn down");
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.teardown();
    }
}
