//! # Client Context
//!
//! The one place stores are built and wired together. An application holds a
//! single [`ClientContext`] and hands out `Arc`s of the stores it needs.
//!
//! ```rust,ignore
//! let config = ClientConfig::from_env()?;
//! let ctx = ClientContext::from_config(config)?;
//! if ctx.auth.check_auth().await {
//!     let data = ctx.dashboard.load_all().await;
//! }
//! ```
//!
//! Tests build a context with [`ClientContext::new`] and a scripted
//! [`Transport`] plus [`MemoryStorage`].

use crate::cache::{CacheKey, EntryStatus};
use crate::config::ClientConfig;
use crate::core::error::{AppError, Result};
use crate::events::EventBus;
use crate::model::{Conta, Meta};
use crate::notify::{NotificationCenter, ToastQueue};
use crate::services::api::{ApiClient, ChatStream, ReqwestTransport, Transport};
use crate::store::{
    AuthStore, DashboardStore, FileStorage, LancamentosStore, MemoryStorage, ResourceStore, SessionStore, Storage,
};
use crate::sync::ScopeToken;
use std::sync::Arc;

pub type Lancamentos = LancamentosStore<ApiClient>;
pub type Contas = ResourceStore<Conta, ApiClient>;
pub type Metas = ResourceStore<Meta, ApiClient>;
pub type Dashboard = DashboardStore<ApiClient, ApiClient>;

pub struct ClientContext {
    pub config: ClientConfig,
    pub session: Arc<SessionStore>,
    pub events: EventBus,
    /// REST backend client
    pub api: ApiClient,
    /// Chatbot sub-service client
    pub chatbot: ApiClient,
    pub auth: Arc<AuthStore>,
    pub lancamentos: Arc<Lancamentos>,
    pub contas: Arc<Contas>,
    pub metas: Arc<Metas>,
    pub dashboard: Arc<Dashboard>,
    pub toasts: Arc<ToastQueue>,
    pub notifications: Arc<NotificationCenter>,
}

impl ClientContext {
    /// Build over a real HTTP transport. Storage is the configured file, or
    /// memory when no path is set.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let storage: Arc<dyn Storage> = match &config.storage_path {
            Some(path) => Arc::new(FileStorage::open(path)?),
            None => Arc::new(MemoryStorage::new()),
        };
        Self::new(config, Arc::new(ReqwestTransport::new()), storage)
    }

    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>, storage: Arc<dyn Storage>) -> Result<Self> {
        config.validate().map_err(AppError::State)?;

        let session = Arc::new(SessionStore::new(storage.clone()));
        session.restore();
        let events = EventBus::new();

        let api = ApiClient::new(
            transport.clone(),
            &config.api_url,
            config.http_timeout,
            session.clone(),
            events.clone(),
        );
        let chatbot = ApiClient::new(
            transport,
            &config.chatbot_url,
            config.chat_timeout,
            session.clone(),
            events.clone(),
        );
        let shared_api = Arc::new(api.clone());

        let lancamentos = Arc::new(LancamentosStore::new(
            shared_api.clone(),
            &config.ttls,
            config.fallback,
            events.clone(),
        ));
        let contas = Arc::new(ResourceStore::new(
            shared_api.clone(),
            config.ttls.accounts,
            config.fallback,
            events.clone(),
        ));
        let metas = Arc::new(ResourceStore::new(
            shared_api,
            config.ttls.goals,
            config.fallback,
            events.clone(),
        ));
        let dashboard = Arc::new(DashboardStore::new(lancamentos.clone(), metas.clone(), storage));

        tracing::info!(
            api_url = %config.api_url,
            chatbot_url = %config.chatbot_url,
            fallback = ?config.fallback,
            authenticated = session.is_authenticated(),
            "Client context ready"
        );

        Ok(Self {
            auth: Arc::new(AuthStore::new(api.clone())),
            toasts: Arc::new(ToastQueue::new(config.max_visible_toasts)),
            notifications: Arc::new(NotificationCenter::new()),
            config,
            session,
            events,
            api,
            chatbot,
            lancamentos,
            contas,
            metas,
            dashboard,
        })
    }

    /// Log out and drop every cached bucket so the next user starts cold.
    pub fn logout(&self) {
        self.dashboard.stop_auto_refresh();
        self.auth.logout();
        self.invalidate_all();
    }

    pub fn invalidate_all(&self) {
        self.lancamentos.invalidate_all();
        self.contas.invalidate();
        self.metas.invalidate();
    }

    /// Open the chat push channel for `session_id`, alive until `token` is
    /// cancelled or the stream is dropped.
    pub fn chat_stream(&self, session_id: &str, token: ScopeToken) -> ChatStream {
        ChatStream::spawn(&self.chatbot, session_id, token)
    }

    /// Status of every cache bucket.
    pub fn cache_status(&self) -> Vec<(CacheKey, EntryStatus)> {
        let mut status = self.lancamentos.cache_status();
        status.push((CacheKey::Accounts, self.contas.status()));
        status.push((CacheKey::Goals, self.metas.status()));
        status.sort_by_key(|(key, _)| CacheKey::ALL.iter().position(|k| k == key));
        status
    }
}
