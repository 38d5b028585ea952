//! # Authentication Endpoints
//!
//! Login (form-encoded OAuth2 password flow), registration and the current
//! user. Login and register are sent without a token, and a 401 from them
//! means bad credentials rather than an expired session.

use super::client::{decode, ApiClient, RequestOptions};
use super::query::Query;
use super::transport::{Body, Method};
use crate::core::error::{AppError, Result};
use shared::dto::auth::{RegisterRequest, TokenResponse, UserInfo};
use shared::dto::profile::ProfileUpdate;

/// Login with email and password.
#[tracing::instrument(skip(client, password), fields(email = %email))]
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<TokenResponse> {
    tracing::info!("Attempting login");
    let start = std::time::Instant::now();

    let fields = vec![
        ("username".to_string(), email.to_string()),
        ("password".to_string(), password.to_string()),
    ];
    let result = client
        .post_form::<TokenResponse>("/api/v1/auth/login", fields, RequestOptions::anonymous())
        .await;

    match &result {
        Ok(response) => tracing::info!(
            user_id = response.user.id,
            duration_ms = start.elapsed().as_millis(),
            "Login successful"
        ),
        Err(e) => tracing::warn!(
            error = %e,
            duration_ms = start.elapsed().as_millis(),
            "Login failed"
        ),
    }
    result
}

/// Register a new user. Does not log in.
#[tracing::instrument(skip_all, fields(email = %request.email))]
pub async fn register(client: &ApiClient, request: &RegisterRequest) -> Result<UserInfo> {
    let body = serde_json::to_value(request)
        .map(Body::Json)
        .map_err(|e| AppError::Parse(e.to_string()))?;
    let value = client
        .request(
            Method::Post,
            "/api/v1/auth/register",
            Query::new(),
            body,
            RequestOptions::anonymous(),
        )
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Registration failed");
            e
        })?;
    tracing::info!("Registration successful");
    decode(value)
}

/// Current user for the session token. Fails with `AppError::Auth` (and
/// clears the session) when the token is no longer accepted.
pub async fn me(client: &ApiClient) -> Result<UserInfo> {
    client.get("/api/v1/auth/me", Query::new()).await
}

/// `PUT /api/v1/users/me`
pub async fn update_me(client: &ApiClient, update: &ProfileUpdate) -> Result<UserInfo> {
    client.put("/api/v1/users/me", update).await
}
