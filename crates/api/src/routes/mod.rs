//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Health check
//!
//! # Auth
//! POST /api/auth/register             - Create account, returns bearer token
//! POST /api/auth/login                - Login, returns bearer token
//! POST /api/auth/logout               - Revoke the presented token
//! GET  /api/profile                   - Current user (requires auth)
//!
//! # Catalog
//! GET  /api/products                  - Product listing
//! GET  /api/search?q=...              - Product search
//! GET  /api/products/{id}             - Product detail
//! GET  /api/products/{id}/reviews     - Product reviews
//! GET  /api/categories                - Category listing
//! GET  /api/categories/{slug}         - Category detail
//! GET  /api/categories/{slug}/products - Products in a category
//!
//! # Cart & wishlist (require auth)
//! GET    /api/cart                    - Cart contents
//! POST   /api/cart                    - Add/update a cart entry
//! DELETE /api/cart/{id}               - Remove a cart entry
//! GET    /api/wishlist                - Wishlist contents
//! POST   /api/wishlist                - Add a product
//! DELETE /api/wishlist/{id}           - Remove a wishlist entry
//!
//! # Orders (require auth)
//! POST /api/orders                    - Place an order (clears cart)
//! GET  /api/orders                    - Order history with items
//! GET  /api/orders/{id}               - Single order
//! POST /api/orders/{id}/cancel        - Cancel a processing order
//!
//! # Reviews (require auth)
//! POST   /api/reviews                 - Submit a review
//! PUT    /api/reviews/{id}            - Edit own review
//! DELETE /api/reviews/{id}            - Delete own review
//! ```

pub mod auth;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the catalog routes router (public).
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/search", get(products::search))
        .route("/products/{id}", get(products::get))
        .route("/products/{id}/reviews", get(products::reviews))
        .route("/categories", get(categories::list))
        .route("/categories/{slug}", get(categories::get))
        .route("/categories/{slug}/products", get(categories::products))
}

/// Create the account routes router (all require auth).
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(auth::profile))
        .route("/cart", get(cart::list).post(cart::add))
        .route("/cart/{id}", delete(cart::remove))
        .route("/wishlist", get(wishlist::list).post(wishlist::add))
        .route("/wishlist/{id}", delete(wishlist::remove))
        .route("/orders", get(orders::list).post(orders::place))
        .route("/orders/{id}", get(orders::get))
        .route("/orders/{id}/cancel", post(orders::cancel))
        .route("/reviews", post(reviews::create))
        .route(
            "/reviews/{id}",
            put(reviews::update).delete(reviews::delete),
        )
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}
