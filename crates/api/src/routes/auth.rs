//! Authentication routes.
//!
//! Registration and login both return a bearer token alongside the user so
//! clients can authenticate immediately. Logout revokes the presented token
//! server-side.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::user::User;
use crate::services::AuthService;
use crate::state::AppState;

/// Request to register a new account.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request to log in.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response carrying a fresh bearer token and the authenticated user.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let auth = AuthService::new(state.pool());

    let user = auth
        .register(&request.name, &request.email, &request.password)
        .await?;
    let token = auth.issue_token(&user, state.config().token_ttl()).await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.pool());

    let user = auth.login(&request.email, &request.password).await?;
    let token = auth.issue_token(&user, state.config().token_ttl()).await?;

    Ok(Json(AuthResponse { token, user }))
}

/// POST /api/auth/logout
///
/// Revokes the token in the `Authorization` header. Requires a valid token,
/// so a revoked or expired token cannot be "logged out" twice.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    CurrentUser(_user): CurrentUser,
) -> Result<StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    AuthService::new(state.pool()).revoke_token(token).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/profile
pub async fn profile(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
