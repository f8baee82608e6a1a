//! Auth route handlers.
//!
//! Login answers with a bearer token; the SPA keeps it and sends it back in
//! `Authorization`. Logout is acknowledged but nothing is stored server-side.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::extract::ApiJson;
use crate::middleware::RequireAuth;
use crate::models::PublicUser;
use crate::response::{self, MessageBody};
use crate::services::AuthService;
use crate::state::AppState;

/// Registration form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

/// Login form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct CheckAuthResponse {
    pub success: bool,
    pub message: String,
    pub user: PublicUser,
}

/// Handle registration.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<RegisterRequest>,
) -> Result<Json<MessageBody>> {
    AuthService::new(state.pool(), state.tokens())
        .register(&form.user_name, &form.email, &form.password)
        .await?;

    Ok(response::message("Registration successful"))
}

/// Handle login.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (user, token) = AuthService::new(state.pool(), state.tokens())
        .login(&form.email, &form.password)
        .await?;

    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(Json(LoginResponse {
        success: true,
        message: "Logged in successfully".to_string(),
        token,
        user: PublicUser::from(&user),
    }))
}

/// Handle logout.
pub async fn logout() -> Json<MessageBody> {
    clear_sentry_user();
    response::message("Logged out successfully!")
}

/// Echo the authenticated user back to the SPA.
pub async fn check_auth(RequireAuth(claims): RequireAuth) -> Json<CheckAuthResponse> {
    Json(CheckAuthResponse {
        success: true,
        message: "Authenticated user!".to_string(),
        user: PublicUser::from(&claims),
    })
}
