//! # Test Backend
//!
//! A routed in-process fake of the BIUAI backend behind the public
//! [`Transport`] trait. Routes are matched on method and URL path; unrouted
//! requests answer 404.

#![allow(dead_code)]

use async_trait::async_trait;
use biuai_client::services::api::{HttpRequest, HttpResponse, Method, Transport};
use biuai_client::store::MemoryStorage;
use biuai_client::{ClientConfig, ClientContext, Result};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

type Handler = Box<dyn Fn(&HttpRequest) -> (u16, Value) + Send + Sync>;

struct Route {
    method: Method,
    path: String,
    delay: Duration,
    handler: Handler,
}

#[derive(Default)]
pub struct FakeBackend {
    routes: Mutex<Vec<Arc<Route>>>,
    seen: Mutex<Vec<HttpRequest>>,
    hits: Mutex<HashMap<String, usize>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Route with a fixed answer. A later route for the same method and path
    /// replaces the earlier one.
    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) {
        self.on_with(method, path, Duration::ZERO, move |_| (status, body.clone()));
    }

    pub fn on_with(
        &self,
        method: Method,
        path: &str,
        delay: Duration,
        handler: impl Fn(&HttpRequest) -> (u16, Value) + Send + Sync + 'static,
    ) {
        let mut routes = self.routes.lock();
        routes.retain(|r| !(r.method == method && r.path == path));
        routes.push(Arc::new(Route {
            method,
            path: path.to_string(),
            delay,
            handler: Box::new(handler),
        }));
    }

    pub fn hits(&self, method: Method, path: &str) -> usize {
        self.hits
            .lock()
            .get(&format!("{} {}", method, path))
            .copied()
            .unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().clone()
    }

    pub fn last_to(&self, path: &str) -> Option<HttpRequest> {
        self.seen
            .lock()
            .iter()
            .rev()
            .find(|r| path_of(&r.url) == path)
            .cloned()
    }
}

fn path_of(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    without_scheme
        .find('/')
        .map_or("/", |idx| &without_scheme[idx..])
}

#[async_trait]
impl Transport for FakeBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let path = path_of(&request.url).to_string();
        self.seen.lock().push(request.clone());
        *self
            .hits
            .lock()
            .entry(format!("{} {}", request.method, path))
            .or_default() += 1;

        let route = self
            .routes
            .lock()
            .iter()
            .find(|r| r.method == request.method && r.path == path)
            .cloned();

        let Some(route) = route else {
            return Ok(HttpResponse {
                status: 404,
                body: br#"{"detail":"Not Found"}"#.to_vec(),
            });
        };
        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }
        let (status, body) = (route.handler)(&request);
        Ok(HttpResponse {
            status,
            body: body.to_string().into_bytes(),
        })
    }
}

pub fn context(backend: &Arc<FakeBackend>) -> (ClientContext, Arc<MemoryStorage>) {
    context_with(backend, ClientConfig::default())
}

pub fn context_with(backend: &Arc<FakeBackend>, config: ClientConfig) -> (ClientContext, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let ctx = ClientContext::new(config, backend.clone(), storage.clone()).expect("valid test config");
    (ctx, storage)
}

/// Context with a signed-in session for user 1.
pub async fn signed_in(backend: &Arc<FakeBackend>) -> (ClientContext, Arc<MemoryStorage>) {
    backend.on(
        Method::Post,
        "/api/v1/auth/login",
        200,
        serde_json::json!({
            "access_token": "tok-abc",
            "token_type": "bearer",
            "user": {"id": 1, "email": "ana@biuai.com", "nome": "Ana"}
        }),
    );
    let (ctx, storage) = context(backend);
    ctx.auth
        .login("ana@biuai.com", "Segredo123")
        .await
        .expect("login against fake backend");
    ctx.events.drain();
    (ctx, storage)
}

pub fn lancamento(id: i64, tipo: &str, valor: f64, data: &str) -> Value {
    serde_json::json!({
        "id": id,
        "descricao": format!("Lançamento {}", id),
        "valor": valor,
        "tipo": tipo,
        "data_lancamento": data,
    })
}
