//! Order routes. All require authentication.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use orchard_core::{OrderId, ProductId};

use crate::db::{OrderItemDraft, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::order::{OrderView, ShippingAddress};
use crate::services::CheckoutService;
use crate::state::AppState;

/// A line item in an order request, carrying the purchase-time snapshot.
#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

/// Request to place an order.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub payment_method: String,
    pub shipping_address: ShippingAddress,
}

/// POST /api/orders
///
/// Places the order and clears the user's cart atomically. Totals are
/// computed server-side from the line items.
pub async fn place(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderView>)> {
    let items = request
        .items
        .into_iter()
        .map(|item| OrderItemDraft {
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
        })
        .collect();

    let order = CheckoutService::new(state.pool())
        .place(user.id, items, request.payment_method, request.shipping_address)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<OrderView>>> {
    let orders = OrderRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id}
pub async fn get(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderView>> {
    let order = OrderRepository::new(state.pool())
        .get(id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    Ok(Json(order))
}

/// POST /api/orders/{id}/cancel
///
/// Only orders still in `processing` can be cancelled. Missing, foreign,
/// and non-cancellable orders all answer 404.
pub async fn cancel(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderView>> {
    let repo = OrderRepository::new(state.pool());

    let cancelled = repo.cancel(id, user.id).await?;
    if !cancelled {
        return Err(AppError::NotFound("Order not found".to_string()));
    }

    let order = repo.get(id, user.id).await?.ok_or_else(|| {
        AppError::Internal(format!("order {id} missing immediately after cancel"))
    })?;

    Ok(Json(order))
}
