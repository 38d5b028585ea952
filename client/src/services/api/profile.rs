//! Profile endpoints under `/api/v1/usuarios`.

use super::client::ApiClient;
use super::query::Query;
use super::transport::{Body, Method};
use crate::core::error::Result;
use serde_json::Value;
use shared::dto::auth::UserInfo;
use shared::dto::profile::{PasswordChange, ProfileUpdate, UserPreferences, UserStats};

pub async fn profile(client: &ApiClient) -> Result<UserInfo> {
    client.get("/api/v1/usuarios/profile", Query::new()).await
}

#[tracing::instrument(skip_all)]
pub async fn update_profile(client: &ApiClient, update: &ProfileUpdate) -> Result<UserInfo> {
    let user: UserInfo = client.put("/api/v1/usuarios/profile", update).await?;
    tracing::info!(user_id = user.id, "Profile updated");
    Ok(user)
}

#[tracing::instrument(skip_all)]
pub async fn change_password(client: &ApiClient, change: &PasswordChange) -> Result<Value> {
    client.put("/api/v1/usuarios/change-password", change).await
}

pub async fn preferences(client: &ApiClient) -> Result<UserPreferences> {
    client.get("/api/v1/usuarios/preferences", Query::new()).await
}

pub async fn update_preferences(client: &ApiClient, preferences: &UserPreferences) -> Result<UserPreferences> {
    client.put("/api/v1/usuarios/preferences", preferences).await
}

pub async fn stats(client: &ApiClient) -> Result<UserStats> {
    client.get("/api/v1/usuarios/stats", Query::new()).await
}

#[tracing::instrument(skip_all)]
pub async fn deactivate(client: &ApiClient) -> Result<Value> {
    tracing::warn!("Deactivating account");
    client
        .request(Method::Post, "/api/v1/usuarios/deactivate", Query::new(), Body::Empty, Default::default())
        .await
}

#[tracing::instrument(skip_all)]
pub async fn request_deletion(client: &ApiClient) -> Result<Value> {
    tracing::warn!("Requesting data deletion");
    client
        .request(
            Method::Post,
            "/api/v1/usuarios/request-deletion",
            Query::new(),
            Body::Empty,
            Default::default(),
        )
        .await
}
