//! # Auth Store
//!
//! Login, registration, logout and session verification on top of the
//! [`SessionStore`](super::session::SessionStore) the HTTP adapter reads its
//! token from.
//!
//! A 401 on any authenticated request clears the session inside the adapter
//! itself; this store only drives the explicit transitions.

use crate::core::error::{AppError, Result};
use crate::events::ClientEvent;
use crate::services::api::{auth, ApiClient};
use crate::utils::validation;
use shared::dto::auth::{RegisterRequest, UserInfo};
use shared::dto::profile::ProfileUpdate;

pub struct AuthStore {
    api: ApiClient,
}

impl AuthStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn is_authenticated(&self) -> bool {
        self.api.session().is_authenticated()
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.api.session().user()
    }

    /// Exchange credentials for a token and persist the session.
    #[tracing::instrument(skip_all, fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<UserInfo> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(vec!["Email e senha são obrigatórios".to_string()]));
        }
        let response = auth::login(&self.api, email.trim(), password).await?;
        let user = response.user;
        self.api.session().set(response.access_token, user.clone())?;
        self.api.events().emit(ClientEvent::LoggedIn { user_id: user.id });
        Ok(user)
    }

    /// Register, then log in with the same credentials.
    #[tracing::instrument(skip_all, fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserInfo> {
        let mut errors = Vec::new();
        if request.nome.trim().is_empty() {
            errors.push("Nome é obrigatório".to_string());
        }
        errors.extend(validation::validar_email(&request.email));
        errors.extend(validation::validar_senha(&request.password));
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        auth::register(&self.api, request).await?;
        self.login(&request.email, &request.password).await
    }

    pub fn logout(&self) {
        let user_id = self.api.session().user().map(|u| u.id);
        self.api.session().clear();
        tracing::info!(user_id = ?user_id, "Logged out");
        self.api.events().emit(ClientEvent::LoggedOut);
    }

    /// Restore the persisted session and verify it against the backend.
    /// Any failure ends in a logged-out state.
    #[tracing::instrument(skip_all)]
    pub async fn check_auth(&self) -> bool {
        let restored = self.api.session().restore();
        if restored.token.is_none() {
            tracing::debug!("No persisted token");
            return false;
        }

        match auth::me(&self.api).await {
            Ok(user) => {
                if let Err(e) = self.api.session().set_user(user) {
                    tracing::warn!(error = %e, "Failed to persist verified user");
                }
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session verification failed");
                self.logout();
                false
            }
        }
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserInfo> {
        if !self.is_authenticated() {
            return Err(AppError::State("Nenhuma sessão ativa".to_string()));
        }
        let user = auth::update_me(&self.api, update).await?;
        self.api.session().set_user(user.clone())?;
        Ok(user)
    }
}
