//! # Chat WebSocket
//!
//! Optional push channel on `/ws/:session_id` of the chatbot service. Each
//! text frame carrying a [`ChatResponse`] becomes a
//! [`ClientEvent::ChatMessage`]; connection state changes are published as
//! [`ClientEvent::ChatConnection`].
//!
//! The stream reconnects with exponential backoff (1 s doubling up to 60 s)
//! and gives up after [`MAX_CONNECTION_ATTEMPTS`] consecutive failed
//! attempts, ending in `Disabled`. It stops for good when its
//! [`ScopeToken`] is cancelled.

use super::client::ApiClient;
use crate::debug::spawn_tracked;
use crate::events::{ChatConnectionState, ClientEvent, EventBus};
use crate::sync::ScopeToken;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use shared::dto::chatbot::ChatResponse;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, trace, warn};

/// Consecutive failed attempts before the stream disables itself.
pub const MAX_CONNECTION_ATTEMPTS: u64 = 5;
const INITIAL_RECONNECT_DELAY: Duration = Duration::from_secs(1);
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(60);

/// WebSocket URL for a chat session under the chatbot base URL.
pub fn chat_ws_url(base_url: &str, session_id: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };
    format!("{}/ws/{}", ws_base, session_id)
}

fn next_delay(current: Duration) -> Duration {
    (current * 2).min(MAX_RECONNECT_DELAY)
}

/// Counters and state of one chat stream.
#[derive(Debug)]
pub struct ChatStreamStats {
    state: Mutex<ChatConnectionState>,
    last_error: Mutex<Option<String>>,
    messages_received: AtomicU64,
    connection_attempts: AtomicU64,
}

impl Default for ChatStreamStats {
    fn default() -> Self {
        Self {
            state: Mutex::new(ChatConnectionState::Disconnected),
            last_error: Mutex::new(None),
            messages_received: AtomicU64::new(0),
            connection_attempts: AtomicU64::new(0),
        }
    }
}

impl ChatStreamStats {
    pub fn state(&self) -> ChatConnectionState {
        *self.state.lock()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    pub fn messages_received(&self) -> u64 {
        self.messages_received.load(Ordering::Relaxed)
    }

    /// Attempts since the last successful connection.
    pub fn connection_attempts(&self) -> u64 {
        self.connection_attempts.load(Ordering::Relaxed)
    }
}

/// Handle to a running chat stream task.
pub struct ChatStream {
    handle: JoinHandle<()>,
    stats: Arc<ChatStreamStats>,
}

impl ChatStream {
    /// Connect to `session_id` on the chatbot service behind `client`.
    /// Events go to the client's event bus.
    pub fn spawn(client: &ApiClient, session_id: &str, token: ScopeToken) -> Self {
        let url = chat_ws_url(client.base_url(), session_id);
        let stats = Arc::new(ChatStreamStats::default());
        let events = client.events().clone();
        let task_stats = stats.clone();
        let handle = spawn_tracked("chat_ws", async move {
            run_chat_stream(url, events, task_stats, token).await
        });
        Self { handle, stats }
    }

    pub fn stats(&self) -> &Arc<ChatStreamStats> {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for ChatStream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn set_state(events: &EventBus, stats: &ChatStreamStats, state: ChatConnectionState) {
    *stats.state.lock() = state;
    events.emit(ClientEvent::ChatConnection(state));
}

/// Decode one text frame. Frames that are not chat responses are ignored.
fn parse_frame(text: &str) -> Option<ChatResponse> {
    match serde_json::from_str::<ChatResponse>(text) {
        Ok(message) => Some(message),
        Err(e) => {
            let preview: String = text.chars().take(100).collect();
            warn!(error = %e, message_preview = %preview, "Ignoring unrecognized chat frame");
            None
        }
    }
}

/// Connection loop. Returns when the token is cancelled or the attempt
/// limit is reached.
pub async fn run_chat_stream(url: String, events: EventBus, stats: Arc<ChatStreamStats>, token: ScopeToken) {
    info!(url = %url, "Connecting to chat WebSocket");
    set_state(&events, &stats, ChatConnectionState::Connecting);

    let mut reconnect_delay = INITIAL_RECONNECT_DELAY;

    loop {
        if token.is_cancelled() {
            break;
        }

        let attempt = stats.connection_attempts.fetch_add(1, Ordering::Relaxed) + 1;
        if attempt > 1 {
            set_state(&events, &stats, ChatConnectionState::Reconnecting);
        }

        let connected = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            result = connect_async(url.as_str()) => result,
        };

        match connected {
            Ok((ws_stream, response)) => {
                info!(url = %url, status = ?response.status(), attempt = attempt, "Chat WebSocket connected");
                reconnect_delay = INITIAL_RECONNECT_DELAY;
                stats.connection_attempts.store(0, Ordering::Relaxed);
                *stats.last_error.lock() = None;
                set_state(&events, &stats, ChatConnectionState::Connected);

                let (mut write, mut read) = ws_stream.split();
                loop {
                    let frame = tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            let _ = write.send(Message::Close(None)).await;
                            break;
                        }
                        frame = read.next() => frame,
                    };
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            if let Some(message) = parse_frame(&text) {
                                let total = stats.messages_received.fetch_add(1, Ordering::Relaxed) + 1;
                                debug!(session_id = %message.session_id, total_messages = total, "Chat message pushed");
                                events.emit(ClientEvent::ChatMessage(message));
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            trace!(data_len = data.len(), "Received ping, sending pong");
                            if let Err(e) = write.send(Message::Pong(data)).await {
                                error!(error = %e, "Failed to send pong response");
                                break;
                            }
                        }
                        Some(Ok(Message::Close(frame))) => {
                            info!(
                                code = ?frame.as_ref().map(|f| f.code),
                                messages = stats.messages_received(),
                                "Chat WebSocket closed by server"
                            );
                            break;
                        }
                        Some(Ok(_)) => trace!("Ignoring non-text chat frame"),
                        Some(Err(e)) => {
                            error!(error = %e, "Chat WebSocket read error");
                            *stats.last_error.lock() = Some(e.to_string());
                            break;
                        }
                        None => break,
                    }
                }

                if token.is_cancelled() {
                    break;
                }
                warn!("Chat WebSocket connection lost, reconnecting");
            }
            Err(e) => {
                error!(
                    url = %url,
                    error = %e,
                    attempt = attempt,
                    max_attempts = MAX_CONNECTION_ATTEMPTS,
                    "Failed to connect to chat WebSocket"
                );
                *stats.last_error.lock() = Some(e.to_string());

                if attempt >= MAX_CONNECTION_ATTEMPTS {
                    error!(attempts = attempt, "Chat WebSocket disabled after repeated failures");
                    set_state(&events, &stats, ChatConnectionState::Disabled);
                    return;
                }
            }
        }

        info!(delay_secs = reconnect_delay.as_secs(), "Reconnecting chat WebSocket");
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(reconnect_delay) => {}
        }
        reconnect_delay = next_delay(reconnect_delay);
    }

    set_state(&events, &stats, ChatConnectionState::Disconnected);
    debug!(messages = stats.messages_received(), "Chat WebSocket stream ended");
}
