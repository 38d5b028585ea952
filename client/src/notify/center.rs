//! Persistent notification center.

use super::{Priority, ToastKind};
use crate::core::error::AppError;
use crate::debug::task_tracker::spawn_tracked;
use crate::model::lancamento::Lancamento;
use crate::model::meta::Meta;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

/// Notifications kept by [`NotificationCenter::cleanup`].
pub const MAX_NOTIFICATIONS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: ToastKind,
    pub priority: Priority,
    pub category: String,
    pub persistent: bool,
    pub dismissible: bool,
    pub read: bool,
    pub dismissed: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub data: serde_json::Value,
}

/// Input to [`NotificationCenter::create`]. Unset fields take the defaults:
/// title "Notificação", kind info, priority medium, category "general",
/// dismissible.
#[derive(Debug, Clone, Default)]
pub struct NewNotification {
    pub title: Option<String>,
    pub message: String,
    pub kind: Option<ToastKind>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub persistent: bool,
    pub dismissible: Option<bool>,
    /// Auto-dismiss after this long.
    pub expires_in: Option<Duration>,
    pub data: Option<serde_json::Value>,
}

#[derive(Default)]
struct CenterState {
    notifications: Vec<Notification>,
    timers: HashMap<Uuid, JoinHandle<()>>,
}

impl CenterState {
    fn find_mut(&mut self, id: Uuid) -> Option<&mut Notification> {
        self.notifications.iter_mut().find(|n| n.id == id)
    }

    fn drop_timer(&mut self, id: Uuid) {
        if let Some(timer) = self.timers.remove(&id) {
            timer.abort();
        }
    }
}

impl Drop for CenterState {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
    }
}

#[derive(Clone, Default)]
pub struct NotificationCenter {
    state: Arc<Mutex<CenterState>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a notification. One with `expires_in` is dismissed by a timer
    /// when it elapses, which needs a tokio runtime.
    pub fn create(&self, new: NewNotification) -> Notification {
        let created_at = Utc::now();
        let expires_at = new
            .expires_in
            .and_then(|d| chrono::Duration::from_std(d).ok())
            .map(|d| created_at + d);

        let notification = Notification {
            id: Uuid::new_v4(),
            title: new.title.unwrap_or_else(|| "Notificação".to_string()),
            message: new.message,
            kind: new.kind.unwrap_or(ToastKind::Info),
            priority: new.priority.unwrap_or(Priority::Medium),
            category: new.category.unwrap_or_else(|| "general".to_string()),
            persistent: new.persistent,
            dismissible: new.dismissible.unwrap_or(true),
            read: false,
            dismissed: false,
            created_at,
            expires_at,
            data: new.data.unwrap_or(serde_json::Value::Null),
        };

        tracing::debug!(
            notification_id = %notification.id,
            category = %notification.category,
            priority = ?notification.priority,
            "Notification created"
        );

        let id = notification.id;
        let mut state = self.state.lock();
        state.notifications.insert(0, notification.clone());

        if let Some(after) = new.expires_in {
            let deadline = Instant::now() + after;
            let weak: Weak<Mutex<CenterState>> = Arc::downgrade(&self.state);
            let timer = spawn_tracked("notification_expiry", async move {
                tokio::time::sleep_until(deadline).await;
                if let Some(state) = weak.upgrade() {
                    let mut state = state.lock();
                    state.timers.remove(&id);
                    if let Some(n) = state.find_mut(id) {
                        n.dismissed = true;
                    }
                }
            });
            state.timers.insert(id, timer);
        }

        notification
    }

    pub fn all(&self) -> Vec<Notification> {
        self.state.lock().notifications.clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Notification> {
        self.state.lock().notifications.iter().find(|n| n.id == id).cloned()
    }

    /// Neither dismissed nor read.
    pub fn active(&self) -> Vec<Notification> {
        self.state
            .lock()
            .notifications
            .iter()
            .filter(|n| !n.dismissed && !n.read)
            .cloned()
            .collect()
    }

    pub fn unread_count(&self) -> usize {
        self.state.lock().notifications.iter().filter(|n| !n.read).count()
    }

    /// High-priority, undismissed, newest first.
    pub fn priority(&self) -> Vec<Notification> {
        let mut out: Vec<Notification> = self
            .state
            .lock()
            .notifications
            .iter()
            .filter(|n| n.priority == Priority::High && !n.dismissed)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    pub fn mark_as_read(&self, id: Uuid) -> bool {
        match self.state.lock().find_mut(id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_as_read(&self) {
        for n in self.state.lock().notifications.iter_mut() {
            n.read = true;
        }
    }

    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut state = self.state.lock();
        state.drop_timer(id);
        match state.find_mut(id) {
            Some(n) => {
                n.dismissed = true;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let mut state = self.state.lock();
        state.drop_timer(id);
        let before = state.notifications.len();
        state.notifications.retain(|n| n.id != id);
        state.notifications.len() != before
    }

    pub fn clear_all(&self) {
        let mut state = self.state.lock();
        for (_, timer) in state.timers.drain() {
            timer.abort();
        }
        state.notifications.clear();
    }

    pub fn clear_by_category(&self, category: &str) {
        let mut state = self.state.lock();
        let removed: Vec<Uuid> = state
            .notifications
            .iter()
            .filter(|n| n.category == category)
            .map(|n| n.id)
            .collect();
        for id in removed {
            state.drop_timer(id);
        }
        state.notifications.retain(|n| n.category != category);
    }

    /// Drop notifications whose `expires_at` is not in the future.
    pub fn clear_expired(&self) {
        self.clear_expired_at(Utc::now());
    }

    pub fn clear_expired_at(&self, now: DateTime<Utc>) {
        let mut state = self.state.lock();
        let expired: Vec<Uuid> = state
            .notifications
            .iter()
            .filter(|n| n.expires_at.is_some_and(|at| at <= now))
            .map(|n| n.id)
            .collect();
        for id in &expired {
            state.drop_timer(*id);
        }
        state.notifications.retain(|n| !expired.contains(&n.id));
    }

    /// Clear expired entries and keep the newest [`MAX_NOTIFICATIONS`].
    pub fn cleanup(&self) {
        self.clear_expired();
        let mut state = self.state.lock();
        if state.notifications.len() > MAX_NOTIFICATIONS {
            let dropped: Vec<Uuid> = state.notifications[MAX_NOTIFICATIONS..]
                .iter()
                .map(|n| n.id)
                .collect();
            for id in dropped {
                state.drop_timer(id);
            }
            state.notifications.truncate(MAX_NOTIFICATIONS);
        }
    }

    // ==================== Domain helpers ====================

    pub fn notify_data_update(&self, message: impl Into<String>) -> Notification {
        self.create(NewNotification {
            title: Some("Dados Atualizados".to_string()),
            message: message.into(),
            kind: Some(ToastKind::Success),
            priority: Some(Priority::Low),
            category: Some("system".to_string()),
            expires_in: Some(Duration::from_secs(30)),
            ..NewNotification::default()
        })
    }

    pub fn notify_error(&self, error: &AppError, context: &str) -> Notification {
        let message = if context.is_empty() {
            error.to_string()
        } else {
            format!("{}: {}", context, error)
        };
        self.create(NewNotification {
            title: Some("Erro no Sistema".to_string()),
            message,
            kind: Some(ToastKind::Error),
            priority: Some(Priority::High),
            category: Some("system".to_string()),
            persistent: true,
            ..NewNotification::default()
        })
    }

    pub fn notify_offline(&self) -> Notification {
        self.create(NewNotification {
            title: Some("Conexão Perdida".to_string()),
            message: "Você está offline. Algumas funcionalidades podem não estar disponíveis."
                .to_string(),
            kind: Some(ToastKind::Warning),
            priority: Some(Priority::High),
            category: Some("connectivity".to_string()),
            persistent: true,
            ..NewNotification::default()
        })
    }

    pub fn notify_online(&self) -> Notification {
        self.create(NewNotification {
            title: Some("Conexão Restaurada".to_string()),
            message: "Você está online novamente.".to_string(),
            kind: Some(ToastKind::Success),
            priority: Some(Priority::Medium),
            category: Some("connectivity".to_string()),
            expires_in: Some(Duration::from_secs(5)),
            ..NewNotification::default()
        })
    }

    pub fn notify_goal_reached(&self, meta: &Meta) -> Notification {
        self.create(NewNotification {
            title: Some("Meta Alcançada!".to_string()),
            message: format!("Parabéns! Você atingiu a meta \"{}\".", meta.titulo),
            kind: Some(ToastKind::Success),
            priority: Some(Priority::High),
            category: Some("financial".to_string()),
            data: Some(serde_json::json!({ "meta_id": meta.id })),
            ..NewNotification::default()
        })
    }

    pub fn notify_budget_alert(&self, category: &str, percentage: Decimal) -> Notification {
        self.create(NewNotification {
            title: Some("Alerta de Orçamento".to_string()),
            message: format!(
                "Você usou {}% do orçamento de {}.",
                percentage.round_dp(1).normalize(),
                category
            ),
            kind: Some(ToastKind::Warning),
            priority: Some(Priority::High),
            category: Some("financial".to_string()),
            ..NewNotification::default()
        })
    }

    pub fn notify_large_transaction(&self, lancamento: &Lancamento) -> Notification {
        let label = if lancamento.is_receita() { "Receita" } else { "Despesa" };
        self.create(NewNotification {
            title: Some("Transação Importante".to_string()),
            message: format!(
                "{} de {} registrada.",
                label,
                shared::utils::format_currency(lancamento.valor)
            ),
            kind: Some(if lancamento.is_receita() {
                ToastKind::Success
            } else {
                ToastKind::Info
            }),
            priority: Some(Priority::Medium),
            category: Some("financial".to_string()),
            data: serde_json::to_value(lancamento).ok(),
            ..NewNotification::default()
        })
    }
}
