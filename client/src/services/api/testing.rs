//! Scripted transport for unit tests.

use super::client::ApiClient;
use super::transport::{HttpRequest, HttpResponse, Transport};
use crate::core::error::Result;
use crate::events::EventBus;
use crate::store::session::SessionStore;
use crate::store::storage::MemoryStorage;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Answers requests from a queue of canned responses, falling back to
/// `200 {}` once the queue is empty. Every request is recorded.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse>>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, status: u16, body: &str) {
        self.responses.lock().push_back(Ok(HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }));
    }

    pub fn reply_json(&self, status: u16, body: serde_json::Value) {
        self.reply(status, &body.to_string());
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().clone()
    }

    pub fn last(&self) -> Option<HttpRequest> {
        self.seen.lock().last().cloned()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.seen.lock().push(request);
        let next = self.responses.lock().pop_front();
        next.unwrap_or(Ok(HttpResponse {
            status: 200,
            body: b"{}".to_vec(),
        }))
    }
}

/// Client over `transport` with an empty in-memory session.
pub fn api(transport: &Arc<ScriptedTransport>, base_url: &str) -> ApiClient {
    let session = Arc::new(SessionStore::new(Arc::new(MemoryStorage::new())));
    ApiClient::new(
        transport.clone(),
        base_url,
        Duration::from_secs(10),
        session,
        EventBus::new(),
    )
}
