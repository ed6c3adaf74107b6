//! Authentication middleware and extractors.
//!
//! Provides an extractor that resolves the `Authorization: Bearer` header to
//! a user via the token store. Handlers that take `CurrentUser` are
//! protected; everything else is public.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::db::tokens::TokenRepository;
use crate::error::set_sentry_user;
use crate::models::user::User;
use crate::services::auth::token_digest;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentUser(user): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct CurrentUser(pub User);

/// Error returned when authentication is required but missing or invalid.
pub enum AuthRejection {
    /// No `Authorization: Bearer` header on the request.
    MissingToken,
    /// Token unknown, expired, or revoked.
    InvalidToken,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::MissingToken => "Authentication required",
            Self::InvalidToken => "Invalid or expired token",
        };
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection::MissingToken)?;

        let user = TokenRepository::new(state.pool())
            .resolve(&token_digest(token))
            .await
            .map_err(|_| AuthRejection::InvalidToken)?
            .ok_or(AuthRejection::InvalidToken)?;

        set_sentry_user(&user.id, Some(user.email.as_str()));

        Ok(Self(user))
    }
}

/// Pull the bearer token out of the `Authorization` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
