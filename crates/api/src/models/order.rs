//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orchard_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::review::Review;

/// A shipping address as captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub payment_method: String,
    pub shipping_address: ShippingAddress,
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

/// A line item within an order.
///
/// `name` and `price` are purchase-time snapshots copied from the client's
/// cart view; they are immutable and independent of later catalog edits.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
    pub name: String,
}

/// An order item decorated with the acting user's review of that
/// (product, order) pair, if any.
///
/// The review attachment is a derived read-side join, computed per request;
/// it is never stored.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemView {
    #[serde(flatten)]
    pub item: OrderItem,
    pub review: Option<Review>,
}

/// An order with its items attached, as returned by the read endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemView>,
}
