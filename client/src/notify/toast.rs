//! Transient toast queue with per-toast expiry.

use super::ToastKind;
use crate::debug::task_tracker::spawn_tracked;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub duration: Duration,
    /// Persistent toasts stay until dismissed.
    pub persistent: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToastOptions {
    /// Overrides the kind's default duration.
    pub duration: Option<Duration>,
    pub persistent: bool,
}

#[derive(Default)]
struct QueueState {
    toasts: Vec<Toast>,
    timers: HashMap<Uuid, JoinHandle<()>>,
}

impl QueueState {
    fn remove(&mut self, id: Uuid) -> bool {
        if let Some(timer) = self.timers.remove(&id) {
            timer.abort();
        }
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }
}

impl Drop for QueueState {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
    }
}

/// Cheap to clone; clones share the queue.
#[derive(Clone)]
pub struct ToastQueue {
    state: Arc<Mutex<QueueState>>,
    max_visible: usize,
}

impl ToastQueue {
    pub fn new(max_visible: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState::default())),
            max_visible: max_visible.max(1),
        }
    }

    /// Queue a toast and arm its expiry. Must run inside a tokio runtime
    /// unless the toast is persistent.
    pub fn show(&self, kind: ToastKind, message: impl Into<String>, options: ToastOptions) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            created_at: Utc::now(),
            duration: options.duration.unwrap_or_else(|| kind.default_duration()),
            persistent: options.persistent,
        };
        let id = toast.id;
        let duration = toast.duration;
        let persistent = toast.persistent;

        tracing::debug!(toast_id = %id, kind = ?kind, persistent = persistent, "Toast shown");

        let mut state = self.state.lock();
        state.toasts.insert(0, toast);

        if !persistent {
            let deadline = Instant::now() + duration;
            let weak: Weak<Mutex<QueueState>> = Arc::downgrade(&self.state);
            let timer = spawn_tracked("toast_expiry", async move {
                tokio::time::sleep_until(deadline).await;
                if let Some(state) = weak.upgrade() {
                    let mut state = state.lock();
                    // Drop our own handle without aborting the running task
                    state.timers.remove(&id);
                    state.toasts.retain(|t| t.id != id);
                }
            });
            state.timers.insert(id, timer);
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.show(ToastKind::Success, message, ToastOptions::default())
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.show(ToastKind::Error, message, ToastOptions::default())
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.show(ToastKind::Warning, message, ToastOptions::default())
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.show(ToastKind::Info, message, ToastOptions::default())
    }

    /// "Conta criado com sucesso!"-style confirmation for a CRUD action.
    pub fn action_success(&self, action: &str, entity: &str) -> Uuid {
        let message = match action {
            "create" => format!("{} criado com sucesso!", entity),
            "update" => format!("{} atualizado com sucesso!", entity),
            "delete" => format!("{} excluído com sucesso!", entity),
            "save" => format!("{} salvo com sucesso!", entity),
            other => format!("{} realizado com sucesso!", other),
        };
        self.success(message)
    }

    pub fn action_error(&self, action: &str, entity: &str, error: Option<&crate::core::error::AppError>) -> Uuid {
        let base = match action {
            "create" => format!("Erro ao criar {}", entity),
            "update" => format!("Erro ao atualizar {}", entity),
            "delete" => format!("Erro ao excluir {}", entity),
            "save" => format!("Erro ao salvar {}", entity),
            other => format!("Erro ao executar {}", other),
        };
        let message = match error {
            Some(err) => format!("{}: {}", base, err.user_message()),
            None => base,
        };
        self.error(message)
    }

    /// Remove a toast. Dismissing an absent or already expired toast is a
    /// no-op returning false.
    pub fn dismiss(&self, id: Uuid) -> bool {
        self.state.lock().remove(id)
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        for (_, timer) in state.timers.drain() {
            timer.abort();
        }
        state.toasts.clear();
    }

    /// The first `max_visible` toasts, newest first.
    pub fn visible(&self) -> Vec<Toast> {
        self.state
            .lock()
            .toasts
            .iter()
            .take(self.max_visible)
            .cloned()
            .collect()
    }

    /// Every queued toast, including those beyond `max_visible`.
    pub fn all(&self) -> Vec<Toast> {
        self.state.lock().toasts.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_visible(&self) -> usize {
        self.max_visible
    }
}
