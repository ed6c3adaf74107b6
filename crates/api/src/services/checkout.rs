//! Checkout service: order validation, totals, and placement.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use orchard_core::UserId;

use crate::db::RepositoryError;
use crate::db::orders::{OrderDraft, OrderItemDraft, OrderRepository};
use crate::models::order::{OrderView, ShippingAddress};

/// Flat shipping fee applied to every order.
const SHIPPING_FLAT: Decimal = Decimal::from_parts(1299, 0, 0, false, 2);

/// Tax rate applied to the item subtotal (8%).
const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The order contained no items.
    #[error("order must contain at least one item")]
    EmptyOrder,

    /// A required field was missing or blank.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// An item quantity was zero or negative.
    #[error("item quantity must be at least 1")]
    InvalidQuantity,

    /// An item price was negative.
    #[error("item price must not be negative")]
    InvalidPrice,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Order money amounts derived from the line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute totals for a set of line items.
    ///
    /// Subtotal is the sum of price times quantity, shipping is a flat fee,
    /// and tax is 8% of the subtotal rounded to cents.
    #[must_use]
    pub fn compute(items: &[OrderItemDraft]) -> Self {
        let subtotal: Decimal = items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();
        let tax = (subtotal * TAX_RATE).round_dp(2);

        Self {
            subtotal,
            shipping: SHIPPING_FLAT,
            tax,
            total: subtotal + SHIPPING_FLAT + tax,
        }
    }
}

/// Checkout service.
///
/// Validates an order request, computes totals server-side, and hands the
/// resulting draft to the order repository for atomic placement.
pub struct CheckoutService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Place an order from the supplied line items.
    ///
    /// Totals are computed here regardless of anything the client claims.
    /// Placement writes the order, snapshots the items, and clears the
    /// user's cart in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns a validation error before anything is written, or
    /// `CheckoutError::Repository` if the transaction fails.
    pub async fn place(
        &self,
        user_id: UserId,
        items: Vec<OrderItemDraft>,
        payment_method: String,
        shipping_address: ShippingAddress,
    ) -> Result<OrderView, CheckoutError> {
        validate_items(&items)?;
        validate_payment_method(&payment_method)?;
        validate_address(&shipping_address)?;

        let totals = OrderTotals::compute(&items);
        let draft = OrderDraft {
            items,
            subtotal: totals.subtotal,
            shipping: totals.shipping,
            tax: totals.tax,
            total: totals.total,
            payment_method,
            shipping_address,
        };

        let order_id = self.orders.place(user_id, &draft).await?;

        self.orders.get(order_id, user_id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "order {order_id} missing immediately after placement"
            ))
            .into()
        })
    }
}

fn validate_items(items: &[OrderItemDraft]) -> Result<(), CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyOrder);
    }

    for item in items {
        if item.quantity < 1 {
            return Err(CheckoutError::InvalidQuantity);
        }
        // NUMERIC(10,2) columns round finer precision on insert
        if item.price.is_sign_negative() || item.price.round_dp(2) != item.price {
            return Err(CheckoutError::InvalidPrice);
        }
        if item.name.trim().is_empty() {
            return Err(CheckoutError::MissingField("item name"));
        }
    }

    Ok(())
}

fn validate_payment_method(payment_method: &str) -> Result<(), CheckoutError> {
    if payment_method.trim().is_empty() {
        return Err(CheckoutError::MissingField("payment_method"));
    }
    Ok(())
}

fn validate_address(address: &ShippingAddress) -> Result<(), CheckoutError> {
    let fields = [
        ("address", &address.address),
        ("city", &address.city),
        ("state", &address.state),
        ("zip", &address.zip),
        ("country", &address.country),
    ];

    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(CheckoutError::MissingField(name));
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use orchard_core::ProductId;

    fn item(price: &str, quantity: i32) -> OrderItemDraft {
        OrderItemDraft {
            product_id: ProductId::new(1),
            name: "Walnut Desk Organizer".to_string(),
            price: price.parse().unwrap(),
            quantity,
        }
    }

    #[test]
    fn totals_for_single_item() {
        let totals = OrderTotals::compute(&[item("45.00", 1)]);
        assert_eq!(totals.subtotal, "45.00".parse::<Decimal>().unwrap());
        assert_eq!(totals.shipping, "12.99".parse::<Decimal>().unwrap());
        assert_eq!(totals.tax, "3.60".parse::<Decimal>().unwrap());
        assert_eq!(totals.total, "61.59".parse::<Decimal>().unwrap());
    }

    #[test]
    fn totals_multiply_by_quantity() {
        let totals = OrderTotals::compute(&[item("10.00", 3), item("2.50", 2)]);
        assert_eq!(totals.subtotal, "35.00".parse::<Decimal>().unwrap());
        assert_eq!(totals.tax, "2.80".parse::<Decimal>().unwrap());
        assert_eq!(totals.total, "50.79".parse::<Decimal>().unwrap());
    }

    #[test]
    fn tax_rounds_to_cents() {
        // 19.99 * 0.08 = 1.5992 -> 1.60
        let totals = OrderTotals::compute(&[item("19.99", 1)]);
        assert_eq!(totals.tax, "1.60".parse::<Decimal>().unwrap());
    }

    #[test]
    fn empty_order_rejected() {
        assert!(matches!(validate_items(&[]), Err(CheckoutError::EmptyOrder)));
    }

    #[test]
    fn zero_quantity_rejected() {
        assert!(matches!(
            validate_items(&[item("5.00", 0)]),
            Err(CheckoutError::InvalidQuantity)
        ));
    }

    #[test]
    fn sub_cent_price_rejected() {
        assert!(matches!(
            validate_items(&[item("9.999", 1)]),
            Err(CheckoutError::InvalidPrice)
        ));
        assert!(matches!(
            validate_items(&[item("-1.00", 1)]),
            Err(CheckoutError::InvalidPrice)
        ));
        assert!(validate_items(&[item("9.99", 1), item("10", 1)]).is_ok());
    }

    #[test]
    fn blank_address_field_rejected() {
        let address = ShippingAddress {
            address: "1 Main St".to_string(),
            city: String::new(),
            state: "CA".to_string(),
            zip: "94000".to_string(),
            country: "US".to_string(),
        };
        assert!(matches!(
            validate_address(&address),
            Err(CheckoutError::MissingField("city"))
        ));
    }
}
