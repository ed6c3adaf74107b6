//! Product catalog routes.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use orchard_core::ProductId;

use crate::db::{ProductRepository, ReviewRepository};
use crate::error::{AppError, Result};
use crate::models::catalog::Product;
use crate::models::review::ProductReview;
use crate::state::AppState;

/// Query string for product search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// GET /api/products
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// GET /api/search?q=...
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let term = query.q.trim();
    if term.is_empty() {
        return Err(AppError::BadRequest("Search query is required".to_string()));
    }

    let products = ProductRepository::new(state.pool()).search(term).await?;
    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

/// GET /api/products/{id}/reviews
pub async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<ProductReview>>> {
    // 404 for unknown products rather than an empty list
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let reviews = ReviewRepository::new(state.pool())
        .list_for_product(id)
        .await?;

    Ok(Json(reviews))
}
