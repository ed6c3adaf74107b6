//! Order repository for database operations.
//!
//! Order placement is all-or-nothing: the order row, its item snapshots, and
//! the cart clear happen in one transaction, so a storage fault partway
//! through leaves no observable trace.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use orchard_core::{OrderId, OrderItemId, OrderStatus, ProductId, ReviewId, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem, OrderItemView, OrderView, ShippingAddress};
use crate::models::review::Review;

/// A validated line item ready to be written, carrying the purchase-time
/// name and price snapshot exactly as the client supplied them.
#[derive(Debug, Clone)]
pub struct OrderItemDraft {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

/// A validated order ready to be written, with totals already computed.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub items: Vec<OrderItemDraft>,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub payment_method: String,
    pub shipping_address: ShippingAddress,
}

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    subtotal: Decimal,
    shipping: Decimal,
    tax: Decimal,
    total: Decimal,
    status: OrderStatus,
    payment_method: String,
    shipping_address: String,
    shipping_city: String,
    shipping_state: String,
    shipping_zip: String,
    shipping_country: String,
    tracking_number: Option<String>,
    created_at: DateTime<Utc>,
    shipped_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            subtotal: row.subtotal,
            shipping: row.shipping,
            tax: row.tax,
            total: row.total,
            status: row.status,
            payment_method: row.payment_method,
            shipping_address: ShippingAddress {
                address: row.shipping_address,
                city: row.shipping_city,
                state: row.shipping_state,
                zip: row.shipping_zip,
                country: row.shipping_country,
            },
            tracking_number: row.tracking_number,
            created_at: row.created_at,
            shipped_at: row.shipped_at,
            delivered_at: row.delivered_at,
        }
    }
}

/// Internal row type for order items with the owner's review left-joined on
/// (`user_id`, `product_id`, `order_id`).
#[derive(Debug, sqlx::FromRow)]
struct ItemWithReviewRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    quantity: i32,
    price: Decimal,
    name: String,
    review_id: Option<i32>,
    review_rating: Option<i32>,
    review_comment: Option<String>,
    review_created_at: Option<DateTime<Utc>>,
}

impl ItemWithReviewRow {
    fn into_view(self, owner: UserId) -> OrderItemView {
        let review = match (
            self.review_id,
            self.review_rating,
            self.review_comment,
            self.review_created_at,
        ) {
            (Some(id), Some(rating), Some(comment), Some(created_at)) => Some(Review {
                id: ReviewId::new(id),
                user_id: owner,
                product_id: ProductId::new(self.product_id),
                order_id: OrderId::new(self.order_id),
                rating,
                comment,
                created_at,
            }),
            _ => None,
        };

        OrderItemView {
            item: OrderItem {
                id: OrderItemId::new(self.id),
                order_id: OrderId::new(self.order_id),
                product_id: ProductId::new(self.product_id),
                quantity: self.quantity,
                price: self.price,
                name: self.name,
            },
            review,
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, subtotal, shipping, tax, total, status, \
     payment_method, shipping_address, shipping_city, shipping_state, shipping_zip, \
     shipping_country, tracking_number, created_at, shipped_at, delivered_at";

const ITEM_WITH_REVIEW_QUERY: &str = r"
    SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price, oi.name,
           r.id AS review_id, r.rating AS review_rating,
           r.comment AS review_comment, r.created_at AS review_created_at
    FROM order_items oi
    JOIN orders o ON o.id = oi.order_id
    LEFT JOIN reviews r
        ON r.order_id = oi.order_id
        AND r.product_id = oi.product_id
        AND r.user_id = o.user_id
    WHERE o.user_id = $1
";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order: insert the order row and its item snapshots, then
    /// clear the user's cart, all in one transaction.
    ///
    /// The cart is cleared unconditionally; whatever rows it held at commit
    /// time are gone regardless of whether they match the ordered items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back and nothing persists.
    pub async fn place(
        &self,
        user_id: UserId,
        draft: &OrderDraft,
    ) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (order_id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO orders (
                user_id, subtotal, shipping, tax, total, status, payment_method,
                shipping_address, shipping_city, shipping_state, shipping_zip,
                shipping_country
            )
            VALUES ($1, $2, $3, $4, $5, 'processing', $6, $7, $8, $9, $10, $11)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(draft.subtotal)
        .bind(draft.shipping)
        .bind(draft.tax)
        .bind(draft.total)
        .bind(&draft.payment_method)
        .bind(&draft.shipping_address.address)
        .bind(&draft.shipping_address.city)
        .bind(&draft.shipping_address.state)
        .bind(&draft.shipping_address.zip)
        .bind(&draft.shipping_address.country)
        .fetch_one(&mut *tx)
        .await?;

        for item in &draft.items {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, price, name)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .bind(&item.name)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(OrderId::new(order_id))
    }

    /// List a user's orders, newest first, each with its items and the
    /// user's per-item reviews attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<OrderView>, RepositoryError> {
        let order_rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let item_rows = sqlx::query_as::<_, ItemWithReviewRow>(&format!(
            "{ITEM_WITH_REVIEW_QUERY} ORDER BY oi.order_id, oi.id"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut items_by_order: HashMap<i32, Vec<OrderItemView>> = HashMap::new();
        for row in item_rows {
            items_by_order
                .entry(row.order_id)
                .or_default()
                .push(row.into_view(user_id));
        }

        Ok(order_rows
            .into_iter()
            .map(|row| {
                let items = items_by_order.remove(&row.id).unwrap_or_default();
                OrderView {
                    order: row.into(),
                    items,
                }
            })
            .collect())
    }

    /// Get one of the user's orders with items and reviews attached.
    ///
    /// Returns `None` if the order does not exist or belongs to another
    /// user; the two cases are indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<OrderView>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(order_row) = row else {
            return Ok(None);
        };

        let item_rows = sqlx::query_as::<_, ItemWithReviewRow>(&format!(
            "{ITEM_WITH_REVIEW_QUERY} AND oi.order_id = $2 ORDER BY oi.id"
        ))
        .bind(user_id)
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(OrderView {
            order: order_row.into(),
            items: item_rows
                .into_iter()
                .map(|r| r.into_view(user_id))
                .collect(),
        }))
    }

    /// Cancel an order, provided it is owned by the user and still in
    /// `processing`.
    ///
    /// Returns `false` when no row matched; missing, foreign, and
    /// non-cancellable orders are deliberately indistinguishable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn cancel(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE orders
            SET status = 'cancelled'
            WHERE id = $1 AND user_id = $2 AND status = 'processing'
            ",
        )
        .bind(order_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
