//! Review repository: submission gating and rating aggregation.
//!
//! `products.rating` is a cached mean over the product's review rows. Every
//! mutation here recomputes it inside the same transaction as the review
//! write, under a `FOR UPDATE` lock on the product row, so two concurrent
//! writers cannot overwrite each other's recomputed average with a stale one.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;

use orchard_core::{OrderId, ProductId, ReviewId, UserId};

use crate::models::review::{ProductReview, Review};

/// Errors from review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The product being reviewed does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// The user has no delivered order containing this product (or the
    /// order they named does not qualify).
    #[error("you can only review products from delivered orders")]
    NotEligible,

    /// A review for this (user, product, order) triple already exists.
    #[error("you have already reviewed this product for this order")]
    Duplicate,

    /// The review does not exist or is not owned by the acting user.
    /// The two cases are deliberately indistinguishable.
    #[error("review not found")]
    NotFound,
}

/// Internal row type for review queries.
#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: i32,
    user_id: i32,
    product_id: i32,
    order_id: i32,
    rating: i32,
    comment: String,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: ReviewId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            order_id: OrderId::new(row.order_id),
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Submit a review.
    ///
    /// Eligibility: the user must own a delivered order containing the
    /// product. When `order_id` is given, that specific order must qualify;
    /// otherwise the earliest qualifying delivered order is used. At most
    /// one review may exist per (user, product, order) triple.
    ///
    /// Returns the created review and the product's new mean rating.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound`, `NotEligible`, or `Duplicate` when the
    /// preconditions fail (no review row is created), and `Database` on
    /// storage errors.
    pub async fn create(
        &self,
        user_id: UserId,
        product_id: ProductId,
        order_id: Option<OrderId>,
        rating: i32,
        comment: &str,
    ) -> Result<(Review, f64), ReviewError> {
        let mut tx = self.pool.begin().await?;

        lock_product(&mut tx, product_id).await?;

        let order_id = resolve_eligible_order(&mut tx, user_id, product_id, order_id).await?;

        let existing: Option<(i32,)> = sqlx::query_as(
            r"
            SELECT id FROM reviews
            WHERE user_id = $1 AND product_id = $2 AND order_id = $3
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_some() {
            return Err(ReviewError::Duplicate);
        }

        let row = sqlx::query_as::<_, ReviewRow>(
            r"
            INSERT INTO reviews (user_id, product_id, order_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, product_id, order_id, rating, comment, created_at
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(order_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&mut *tx)
        .await?;

        let mean = recompute_rating(&mut tx, product_id).await?;
        tx.commit().await?;

        Ok((row.into(), mean))
    }

    /// Update one of the user's own reviews and recompute the product
    /// rating. Lookup is by (id, user) so foreign reviews read as missing.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::NotFound` if no such owned review exists, and
    /// `Database` on storage errors.
    pub async fn update(
        &self,
        review_id: ReviewId,
        user_id: UserId,
        rating: i32,
        comment: &str,
    ) -> Result<(Review, f64), ReviewError> {
        let mut tx = self.pool.begin().await?;

        let product_id = find_owned_review(&mut tx, review_id, user_id).await?;
        lock_product(&mut tx, product_id).await?;

        let row = sqlx::query_as::<_, ReviewRow>(
            r"
            UPDATE reviews
            SET rating = $3, comment = $4
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, product_id, order_id, rating, comment, created_at
            ",
        )
        .bind(review_id)
        .bind(user_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&mut *tx)
        .await?;

        let mean = recompute_rating(&mut tx, product_id).await?;
        tx.commit().await?;

        Ok((row.into(), mean))
    }

    /// Delete one of the user's own reviews and recompute the product
    /// rating (which resets to 0 when the last review goes).
    ///
    /// Returns the product's new mean rating.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::NotFound` if no such owned review exists, and
    /// `Database` on storage errors.
    pub async fn delete(&self, review_id: ReviewId, user_id: UserId) -> Result<f64, ReviewError> {
        let mut tx = self.pool.begin().await?;

        let product_id = find_owned_review(&mut tx, review_id, user_id).await?;
        lock_product(&mut tx, product_id).await?;

        sqlx::query("DELETE FROM reviews WHERE id = $1 AND user_id = $2")
            .bind(review_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let mean = recompute_rating(&mut tx, product_id).await?;
        tx.commit().await?;

        Ok(mean)
    }

    /// List a product's reviews with reviewer name and avatar, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductReview>, ReviewError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: i32,
            rating: i32,
            comment: String,
            created_at: DateTime<Utc>,
            reviewer_name: String,
            reviewer_avatar: Option<String>,
        }

        let rows = sqlx::query_as::<_, Row>(
            r"
            SELECT r.id, r.rating, r.comment, r.created_at,
                   u.name AS reviewer_name, u.avatar AS reviewer_avatar
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.product_id = $1
            ORDER BY r.created_at DESC, r.id DESC
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ProductReview {
                id: ReviewId::new(r.id),
                rating: r.rating,
                comment: r.comment,
                created_at: r.created_at,
                reviewer_name: r.reviewer_name,
                reviewer_avatar: r.reviewer_avatar,
            })
            .collect())
    }
}

/// Take a row-level lock on the product, serializing rating recomputation.
async fn lock_product(
    tx: &mut Transaction<'_, Postgres>,
    product_id: ProductId,
) -> Result<(), ReviewError> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1 FOR UPDATE")
        .bind(product_id)
        .fetch_optional(&mut **tx)
        .await?;

    if row.is_none() {
        return Err(ReviewError::ProductNotFound);
    }
    Ok(())
}

/// Find the delivered order that makes this review eligible.
///
/// With an explicit order id the caller has pinned the triple; without one,
/// the earliest qualifying delivered order is chosen.
async fn resolve_eligible_order(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
    product_id: ProductId,
    order_id: Option<OrderId>,
) -> Result<OrderId, ReviewError> {
    let row: Option<(i32,)> = if let Some(order_id) = order_id {
        sqlx::query_as(
            r"
            SELECT o.id
            FROM orders o
            JOIN order_items oi ON oi.order_id = o.id
            WHERE o.id = $1 AND o.user_id = $2 AND o.status = 'delivered'
              AND oi.product_id = $3
            LIMIT 1
            ",
        )
        .bind(order_id)
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(&mut **tx)
        .await?
    } else {
        sqlx::query_as(
            r"
            SELECT o.id
            FROM orders o
            JOIN order_items oi ON oi.order_id = o.id
            WHERE o.user_id = $1 AND o.status = 'delivered' AND oi.product_id = $2
            ORDER BY o.created_at ASC, o.id ASC
            LIMIT 1
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(&mut **tx)
        .await?
    };

    row.map(|(id,)| OrderId::new(id))
        .ok_or(ReviewError::NotEligible)
}

/// Resolve a review to its product, enforcing ownership.
async fn find_owned_review(
    tx: &mut Transaction<'_, Postgres>,
    review_id: ReviewId,
    user_id: UserId,
) -> Result<ProductId, ReviewError> {
    let row: Option<(i32,)> =
        sqlx::query_as("SELECT product_id FROM reviews WHERE id = $1 AND user_id = $2")
            .bind(review_id)
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await?;

    row.map(|(id,)| ProductId::new(id))
        .ok_or(ReviewError::NotFound)
}

/// Recompute the product's mean rating from its current review rows and
/// persist it. A product with no reviews stores 0.
async fn recompute_rating(
    tx: &mut Transaction<'_, Postgres>,
    product_id: ProductId,
) -> Result<f64, ReviewError> {
    let (mean,): (f64,) = sqlx::query_as(
        r"
        SELECT COALESCE(AVG(rating)::float8, 0)
        FROM reviews
        WHERE product_id = $1
        ",
    )
    .bind(product_id)
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query("UPDATE products SET rating = $2 WHERE id = $1")
        .bind(product_id)
        .bind(mean)
        .execute(&mut **tx)
        .await?;

    Ok(mean)
}
