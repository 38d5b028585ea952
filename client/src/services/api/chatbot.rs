//! # Chatbot Endpoints
//!
//! The assistant runs as a separate service with its own base URL and a
//! longer deadline (30 s by default). Its [`ApiClient`] shares the session
//! store with the backend client, so the same bearer token is sent and a
//! 401 here logs the user out as well.
//!
//! Read failures are returned as errors. Callers that want canned content
//! when the service is down decide that themselves.

use super::client::{decode, ApiClient};
use super::query::Query;
use super::transport::{Body, Method};
use crate::core::error::{AppError, Result};
use crate::utils::validation::validar_mensagem_chat;
use serde_json::{Map, Value};
use shared::dto::chatbot::{
    AdminSessions, BotConfig, BroadcastRequest, BroadcastResponse, ChatAnalytics, ChatHealth,
    ChatHistory, ChatRequest, ChatResponse, FeedbackRequest, QuickHelp, StatusResponse,
    SuggestionsResponse, UserContext,
};

/// `user_id` sent when nobody is signed in.
const ANONYMOUS_USER_ID: &str = "1";

/// New chat session id (`session_<hex>`).
pub fn generate_session_id() -> String {
    format!("session_{}", uuid::Uuid::new_v4().simple())
}

/// Send one message.
///
/// The message is validated and trimmed first. Without a `session_id` a new
/// session is started; the id to reuse for follow-ups is in the response.
/// The caller's `context` is forwarded with a `timestamp` added.
#[tracing::instrument(skip_all, fields(session_id = tracing::field::Empty))]
pub async fn send_message(
    client: &ApiClient,
    message: &str,
    session_id: Option<&str>,
    mut context: Map<String, Value>,
) -> Result<ChatResponse> {
    let errors = validar_mensagem_chat(message);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let session_id = session_id
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(generate_session_id);
    tracing::Span::current().record("session_id", session_id.as_str());

    let user_id = client
        .session()
        .user()
        .map(|user| user.id.to_string())
        .unwrap_or_else(|| ANONYMOUS_USER_ID.to_string());
    context.insert(
        "timestamp".to_string(),
        Value::String(chrono::Utc::now().to_rfc3339()),
    );

    let request = ChatRequest {
        message: message.trim().to_string(),
        user_id,
        session_id,
        context,
    };

    let start = std::time::Instant::now();
    let response: ChatResponse = client.post("/chat", &request).await.map_err(|e| {
        tracing::error!(error = %e, "Chat message failed");
        e
    })?;
    tracing::info!(
        suggestions = response.suggestions.len(),
        duration_ms = start.elapsed().as_millis(),
        "Chat response received"
    );
    Ok(response)
}

pub async fn history(client: &ApiClient, session_id: &str) -> Result<ChatHistory> {
    client
        .get(&format!("/chat/history/{}", session_id), Query::new())
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, session_id = %session_id, "Chat history unavailable");
            e
        })
}

pub async fn config(client: &ApiClient) -> Result<BotConfig> {
    client.get("/config", Query::new()).await
}

pub async fn health(client: &ApiClient) -> Result<ChatHealth> {
    client.get("/health", Query::new()).await.map_err(|e| {
        tracing::warn!(error = %e, "Chatbot health check failed");
        e
    })
}

/// Rate one bot message. `rating` is clamped to `1..=5`.
#[tracing::instrument(skip(client))]
pub async fn feedback(
    client: &ApiClient,
    session_id: &str,
    message_index: u32,
    rating: u8,
    helpful: bool,
) -> Result<StatusResponse> {
    let request = FeedbackRequest {
        session_id: session_id.to_string(),
        message_index,
        rating: rating.clamp(1, 5),
        helpful,
    };
    let mut response: StatusResponse = client.post("/feedback", &request).await?;
    if response.message.is_none() {
        response.message = Some("Feedback enviado com sucesso".to_string());
    }
    Ok(response)
}

/// Suggested questions, optionally related to `query`. A blank query is not
/// sent.
pub async fn suggestions(client: &ApiClient, query: &str) -> Result<SuggestionsResponse> {
    client
        .get("/suggestions", Query::new().opt_text("query", Some(query)))
        .await
}

pub async fn quick_help(client: &ApiClient) -> Result<QuickHelp> {
    client.get("/quick-help", Query::new()).await
}

pub async fn context(client: &ApiClient) -> Result<UserContext> {
    client.get("/context", Query::new()).await
}

/// Admin only.
pub async fn analytics(client: &ApiClient) -> Result<ChatAnalytics> {
    client.get("/admin/analytics", Query::new()).await
}

/// Admin only. Paged list of chat sessions.
pub async fn sessions(client: &ApiClient, limit: u32, offset: u32) -> Result<AdminSessions> {
    client
        .get(
            "/admin/sessions",
            Query::new().push("limit", limit).push("offset", offset),
        )
        .await
}

/// Admin only. Push a message to every connected session.
#[tracing::instrument(skip_all)]
pub async fn broadcast(client: &ApiClient, message: &str) -> Result<BroadcastResponse> {
    let message = message.trim();
    if message.is_empty() {
        return Err(AppError::Validation(vec![
            "Mensagem não pode estar vazia".to_string(),
        ]));
    }
    let body = serde_json::to_value(BroadcastRequest {
        message: message.to_string(),
    })?;
    let value = client
        .request(
            Method::Post,
            "/admin/broadcast",
            Query::new(),
            Body::Json(body),
            Default::default(),
        )
        .await?;
    let response: BroadcastResponse = decode(value)?;
    tracing::info!(recipients = response.recipients, "Broadcast sent");
    Ok(response)
}
