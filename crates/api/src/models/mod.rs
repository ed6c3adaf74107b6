//! Domain models for the storefront API.
//!
//! These types represent validated domain objects separate from database row
//! types; the `db` repositories convert rows into them.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod review;
pub mod user;

pub use cart::{CartItem, WishlistItem};
pub use catalog::{Category, Product};
pub use order::{Order, OrderItem, OrderItemView, OrderView, ShippingAddress};
pub use review::{ProductReview, Review};
pub use user::User;
