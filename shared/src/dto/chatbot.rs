//! # Chatbot DTOs
//!
//! Payloads for the chatbot sub-service. The same [`ChatRequest`] /
//! [`ChatResponse`] pair is used over HTTP (`POST /chat`) and as WebSocket
//! text frames on `/ws/:session_id`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub user_id: String,
    pub session_id: String,
    #[serde(default)]
    pub context: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub bot_name: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatHistoryEntry {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "message")]
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `GET /chat/history/:session_id`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatHistory {
    pub session_id: String,
    #[serde(default)]
    pub messages: Vec<ChatHistoryEntry>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// `GET /config`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BotConfig {
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
    #[serde(default, alias = "model_name")]
    pub model: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub personality: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_bot_name() -> String {
    "Bi UAI Bot Administrador".to_string()
}

fn default_true() -> bool {
    true
}

/// `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatHealth {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub bot_name: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ChatHealth {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

/// `POST /feedback`. `rating` must be in `1..=5`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackRequest {
    pub session_id: String,
    pub message_index: u32,
    pub rating: u8,
    pub helpful: bool,
}

/// Generic `{status, message}` acknowledgement.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /suggestions?query=...`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SuggestionsResponse {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuickAction {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// `GET /quick-help`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuickHelp {
    #[serde(default)]
    pub welcome_message: String,
    #[serde(default)]
    pub common_actions: Vec<QuickAction>,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// `GET /context`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserContext {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub current_page: Option<String>,
    #[serde(default)]
    pub recent_actions: Vec<Value>,
    #[serde(default)]
    pub financial_summary: Map<String, Value>,
    #[serde(default)]
    pub preferences: Map<String, Value>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `GET /admin/analytics`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatAnalytics {
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub total_messages: u64,
    #[serde(default)]
    pub avg_session_duration: Option<f64>,
    #[serde(default)]
    pub most_common_questions: Vec<String>,
    #[serde(default)]
    pub user_satisfaction: Option<f64>,
    #[serde(default)]
    pub response_time_avg: Option<f64>,
}

/// `GET /admin/sessions?limit=&offset=`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdminSessions {
    #[serde(default)]
    pub sessions: Vec<Value>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

/// `POST /admin/broadcast`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BroadcastRequest {
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BroadcastResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub recipients: u64,
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_response_defaults_suggestions() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "response": "Olá!",
            "session_id": "s1",
            "timestamp": "2025-01-25T10:00:00"
        }))
        .unwrap();
        assert!(resp.suggestions.is_empty());
        assert_eq!(resp.bot_name, None);
    }

    #[test]
    fn test_bot_config_defaults() {
        let cfg: BotConfig = serde_json::from_value(json!({"model_name": "llama3.2:1b"})).unwrap();
        assert_eq!(cfg.bot_name, "Bi UAI Bot Administrador");
        assert_eq!(cfg.model.as_deref(), Some("llama3.2:1b"));
        assert!(cfg.enabled);
    }
}
