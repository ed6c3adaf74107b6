//! Category routes.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::db::CategoryRepository;
use crate::error::{AppError, Result};
use crate::models::catalog::{Category, Product};
use crate::state::AppState;

/// GET /api/categories
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}

/// GET /api/categories/{slug}
pub async fn get(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Category>> {
    let category = CategoryRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(Json(category))
}

/// GET /api/categories/{slug}/products
pub async fn products(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let repo = CategoryRepository::new(state.pool());

    let category = repo
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    let products = repo.products(category.id).await?;
    Ok(Json(products))
}
