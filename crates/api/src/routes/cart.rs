//! Cart routes. All require authentication.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use orchard_core::{CartEntryId, ProductId};

use crate::db::CartRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::cart::CartItem;
use crate::state::AppState;

/// Request to add a product to the cart or change its quantity.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// Response for a cart mutation.
#[derive(Debug, Serialize)]
pub struct CartEntryResponse {
    pub id: CartEntryId,
}

/// GET /api/cart
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CartItem>>> {
    let items = CartRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(items))
}

/// POST /api/cart
///
/// Adding a product already in the cart replaces its quantity.
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartEntryResponse>)> {
    if request.quantity < 1 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let id = CartRepository::new(state.pool())
        .upsert(user.id, request.product_id, request.quantity)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Product not found".to_string())
            }
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(CartEntryResponse { id })))
}

/// DELETE /api/cart/{id}
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<CartEntryId>,
) -> Result<StatusCode> {
    let removed = CartRepository::new(state.pool()).remove(id, user.id).await?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Cart entry not found".to_string()))
    }
}
