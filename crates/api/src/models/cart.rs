//! Cart and wishlist domain types.

use serde::Serialize;

use orchard_core::{CartEntryId, WishlistEntryId};

use super::catalog::Product;

/// A cart entry joined with its product data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    /// ID of the cart entry (not the product).
    pub id: CartEntryId,
    pub quantity: i32,
    pub product: Product,
}

/// A wishlist entry joined with its product data.
///
/// Wishlist entries are existence-only; there is no quantity.
#[derive(Debug, Clone, Serialize)]
pub struct WishlistItem {
    /// ID of the wishlist entry (not the product).
    pub id: WishlistEntryId,
    pub product: Product,
}
