//! Database operations for the storefront `PostgreSQL`.
//!
//! ## Tables
//!
//! - `users` - Accounts and password hashes
//! - `auth_tokens` - Opaque bearer token digests
//! - `categories`, `products` - Catalog (mostly read-only; `products.rating`
//!   is maintained by the review repository)
//! - `cart`, `wishlist` - Per-user (user, product) entries
//! - `orders`, `order_items` - Orders with purchase-time item snapshots
//! - `reviews` - One review per (user, product, order) triple
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p orchard-cli -- migrate
//! ```

pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod tokens;
pub mod users;
pub mod wishlist;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use cart::CartRepository;
pub use categories::CategoryRepository;
pub use orders::{OrderDraft, OrderItemDraft, OrderRepository};
pub use products::ProductRepository;
pub use reviews::{ReviewError, ReviewRepository};
pub use tokens::TokenRepository;
pub use users::UserRepository;
pub use wishlist::WishlistRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
