//! Catalog domain types: products and categories.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use orchard_core::{CategoryId, ProductId};

/// A catalog product.
///
/// `rating` is a denormalized aggregate maintained by the review repository;
/// it always equals the mean of the product's review rows (0 if none).
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    /// Reference price the current price is discounted from, if any.
    pub discount: Option<Decimal>,
    pub images: Vec<String>,
    pub rating: f64,
    pub stock: i32,
    pub brand: Option<String>,
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
}

/// A product grouping.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub product_count: i32,
}
