//! Review routes. All require authentication.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use orchard_core::{OrderId, ProductId, ReviewId};

use crate::db::ReviewRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::review::Review;
use crate::state::AppState;

/// Request to submit a review.
///
/// `order_id` pins the review to a specific delivered order; when omitted,
/// the earliest qualifying delivered order is used.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub product_id: ProductId,
    pub order_id: Option<OrderId>,
    pub rating: i32,
    pub comment: String,
}

/// Request to edit an existing review.
#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: i32,
    pub comment: String,
}

/// Response carrying a review and the product's recomputed mean rating.
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub review: Review,
    pub product_rating: f64,
}

/// Response after deleting a review.
#[derive(Debug, Serialize)]
pub struct DeleteReviewResponse {
    pub product_rating: f64,
}

fn validate_rating(rating: i32) -> Result<()> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Rating must be between 1 and 5".to_string(),
        ))
    }
}

fn validate_comment(comment: &str) -> Result<&str> {
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("Comment is required".to_string()));
    }
    Ok(trimmed)
}

/// POST /api/reviews
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>)> {
    validate_rating(request.rating)?;
    let comment = validate_comment(&request.comment)?;

    let (review, product_rating) = ReviewRepository::new(state.pool())
        .create(
            user.id,
            request.product_id,
            request.order_id,
            request.rating,
            comment,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReviewResponse {
            review,
            product_rating,
        }),
    ))
}

/// PUT /api/reviews/{id}
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<ReviewId>,
    Json(request): Json<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>> {
    validate_rating(request.rating)?;
    let comment = validate_comment(&request.comment)?;

    let (review, product_rating) = ReviewRepository::new(state.pool())
        .update(id, user.id, request.rating, comment)
        .await?;

    Ok(Json(ReviewResponse {
        review,
        product_rating,
    }))
}

/// DELETE /api/reviews/{id}
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<ReviewId>,
) -> Result<Json<DeleteReviewResponse>> {
    let product_rating = ReviewRepository::new(state.pool())
        .delete(id, user.id)
        .await?;

    Ok(Json(DeleteReviewResponse { product_rating }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        for rating in 1..=5 {
            assert!(validate_rating(rating).is_ok());
        }
        for rating in [0, 6, -1] {
            assert!(validate_rating(rating).is_err());
        }
    }

    #[test]
    fn test_comment_trimmed() {
        assert_eq!(validate_comment("  great fit  ").unwrap(), "great fit");
    }

    #[test]
    fn test_blank_comment_rejected() {
        assert!(validate_comment("").is_err());
        assert!(validate_comment("   \t\n").is_err());
    }
}
