//! # API Client
//!
//! The HTTP client adapter. One instance per base URL (backend and chatbot),
//! both sharing the session store and event bus of their context.
//!
//! Every request goes through [`ApiClient::request`], which:
//! - injects `Authorization: Bearer <token>` when a session token exists
//! - enforces the per-client deadline (`AppError::Timeout` on expiry)
//! - turns a 401 into a cleared session, a `SessionExpired` event and
//!   `AppError::Auth`
//! - maps any other non-2xx status to `AppError::Http` with the backend's
//!   `detail`/`message` text

use super::query::Query;
use super::transport::{Body, HttpRequest, Method, Transport};
use crate::core::error::{AppError, Result};
use crate::events::{ClientEvent, EventBus};
use crate::store::session::SessionStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared::dto::auth::ErrorResponse;
use std::sync::Arc;
use std::time::Duration;

/// Per-request overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Replaces the client's default deadline.
    pub timeout: Option<Duration>,
    /// When false, no token is sent and a 401 is a plain `Auth` error that
    /// leaves the session alone (login with bad credentials).
    pub authenticated: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            authenticated: true,
        }
    }
}

impl RequestOptions {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            ..Self::default()
        }
    }
}

/// HTTP client adapter for one base URL.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    timeout: Duration,
    session: Arc<SessionStore>,
    events: EventBus,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<SessionStore>,
        events: EventBus,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            session,
            events,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub(crate) fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Issue one request and return the decoded JSON body. An empty 2xx body
    /// yields `Value::Null`.
    #[tracing::instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: Query,
        body: Body,
        options: RequestOptions,
    ) -> Result<Value> {
        let start = std::time::Instant::now();

        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if options.authenticated {
            if let Some(token) = self.session.token() {
                headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
            }
        }

        let request = HttpRequest {
            method,
            url: self.url(path),
            query: query.into_pairs(),
            headers,
            body,
        };

        let deadline = options.timeout.unwrap_or(self.timeout);
        let response = match tokio::time::timeout(deadline, self.transport.send(request)).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::error!(timeout_ms = deadline.as_millis(), "Request timed out");
                return Err(AppError::Timeout(deadline));
            }
        };

        let duration_ms = start.elapsed().as_millis();

        if response.status == 401 {
            let detail = error_detail(&response.body)
                .unwrap_or_else(|| "Não autorizado".to_string());
            if options.authenticated {
                tracing::warn!(duration_ms = duration_ms, "Session rejected by backend, logging out");
                self.session.clear();
                self.events.emit(ClientEvent::SessionExpired);
            } else {
                tracing::warn!(duration_ms = duration_ms, "Credentials rejected");
            }
            return Err(AppError::Auth(detail));
        }

        if !response.is_success() {
            let detail = error_detail(&response.body)
                .unwrap_or_else(|| format!("Erro HTTP {}", response.status));
            tracing::warn!(
                status = response.status,
                detail = %detail,
                duration_ms = duration_ms,
                "Request failed"
            );
            return Err(AppError::Http {
                status: response.status,
                detail,
            });
        }

        tracing::debug!(status = response.status, duration_ms = duration_ms, "Request completed");

        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&response.body).map_err(|e| {
            tracing::error!(error = %e, "Response parse error");
            AppError::Parse(e.to_string())
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: Query) -> Result<T> {
        let value = self
            .request(Method::Get, path, query, Body::Empty, RequestOptions::default())
            .await?;
        decode(value)
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let value = self
            .request(Method::Post, path, Query::new(), json_body(body)?, RequestOptions::default())
            .await?;
        decode(value)
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let value = self
            .request(Method::Put, path, Query::new(), json_body(body)?, RequestOptions::default())
            .await?;
        decode(value)
    }

    pub async fn patch<T: DeserializeOwned>(&self, path: &str, query: Query, body: Body) -> Result<T> {
        let value = self
            .request(Method::Patch, path, query, body, RequestOptions::default())
            .await?;
        decode(value)
    }

    /// DELETE, returning whatever JSON the backend sent (often `{message}` or
    /// nothing at all).
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::Delete, path, Query::new(), Body::Empty, RequestOptions::default())
            .await
    }

    /// Form-encoded POST.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: Vec<(String, String)>,
        options: RequestOptions,
    ) -> Result<T> {
        let value = self
            .request(Method::Post, path, Query::new(), Body::Form(fields), options)
            .await?;
        decode(value)
    }
}

/// Decode a JSON value into `T`, mapping shape mismatches to `AppError::Parse`.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        tracing::error!(error = %e, "Unexpected response shape");
        AppError::Parse(e.to_string())
    })
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<Body> {
    serde_json::to_value(body)
        .map(Body::Json)
        .map_err(|e| AppError::Parse(format!("failed to encode request body: {}", e)))
}

fn error_detail(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorResponse>(body)
        .ok()
        .and_then(|err| err.text())
}
