//! # Client Events
//!
//! Notifications the library sends to the embedding application: session
//! expiry ("redirect to login"), data refreshes and chat push messages.

use async_channel::{Receiver, Sender, TrySendError};
use shared::dto::chatbot::ChatResponse;

/// Capacity of the event bus. Past it, refresh notices are dropped; session
/// and chat events evict the oldest queued event instead.
const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// A 401 cleared the session; the application should show the login view.
    SessionExpired,
    LoggedIn { user_id: i64 },
    LoggedOut,
    /// A resource collection or aggregate was refreshed or reconciled.
    DataUpdated { resource: &'static str },
    /// Message pushed on the chat WebSocket.
    ChatMessage(ChatResponse),
    ChatConnection(ChatConnectionState),
}

impl ClientEvent {
    /// Status notices that a later event of the same kind supersedes.
    fn is_droppable(&self) -> bool {
        matches!(self, ClientEvent::DataUpdated { .. } | ClientEvent::ChatConnection(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatConnectionState {
    Connecting,
    Connected,
    Reconnecting,
    Disconnected,
    Disabled,
}

/// Multi-producer event channel shared by every component of a context.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: Sender<ClientEvent>,
    rx: Receiver<ClientEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = async_channel::bounded(EVENT_CAPACITY);
        Self { tx, rx }
    }

    /// Send without waiting. On a full bus a droppable notice is discarded;
    /// any other event makes room by evicting the oldest droppable one.
    pub fn emit(&self, event: ClientEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) if event.is_droppable() => {
                tracing::warn!(event = ?event, "Event bus full, dropping event");
            }
            Err(TrySendError::Full(event)) => {
                self.evict_one();
                if let Err(err) = self.tx.try_send(event) {
                    tracing::error!(event = ?err.into_inner(), "Event bus still full after eviction");
                }
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Event bus closed");
            }
        }
    }

    /// Requeue everything but the oldest droppable event (or the oldest
    /// event when none is droppable), preserving order.
    fn evict_one(&self) {
        let mut queued = self.drain();
        let victim = queued.iter().position(ClientEvent::is_droppable).unwrap_or(0);
        if victim < queued.len() {
            let evicted = queued.remove(victim);
            tracing::warn!(event = ?evicted, "Event bus full, evicted queued event");
        }
        for event in queued {
            if let Err(err) = self.tx.try_send(event) {
                tracing::warn!(event = ?err.into_inner(), "Event bus full, dropping event");
            }
        }
    }

    /// Receiver handle. Each event is delivered to one receiver.
    pub fn subscribe(&self) -> Receiver<ClientEvent> {
        self.rx.clone()
    }

    /// Drain everything currently queued.
    pub fn drain(&self) -> Vec<ClientEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}
