//! Wishlist routes. All require authentication.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use orchard_core::{ProductId, WishlistEntryId};

use crate::db::{RepositoryError, WishlistRepository};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::cart::WishlistItem;
use crate::state::AppState;

/// Request to add a product to the wishlist.
#[derive(Debug, Deserialize)]
pub struct AddToWishlistRequest {
    pub product_id: ProductId,
}

/// GET /api/wishlist
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<WishlistItem>>> {
    let items = WishlistRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(items))
}

/// POST /api/wishlist
///
/// Adding a product already on the wishlist is a no-op.
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<AddToWishlistRequest>,
) -> Result<StatusCode> {
    WishlistRepository::new(state.pool())
        .add(user.id, request.product_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product not found".to_string()),
            other => other.into(),
        })?;

    Ok(StatusCode::CREATED)
}

/// DELETE /api/wishlist/{id}
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<WishlistEntryId>,
) -> Result<StatusCode> {
    let removed = WishlistRepository::new(state.pool())
        .remove(id, user.id)
        .await?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Wishlist entry not found".to_string()))
    }
}
