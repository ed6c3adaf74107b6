//! Review domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use orchard_core::{OrderId, ProductId, ReviewId, UserId};

/// A product review left by a user for a delivered order.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub order_id: OrderId,
    /// Star rating, 1 through 5.
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A review joined with its author's public profile, for product pages.
#[derive(Debug, Clone, Serialize)]
pub struct ProductReview {
    pub id: ReviewId,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub reviewer_name: String,
    pub reviewer_avatar: Option<String>,
}
