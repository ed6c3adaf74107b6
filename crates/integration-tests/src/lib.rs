//! Integration test helpers for the Orchard API.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations + seed
//! cargo run -p orchard-cli -- migrate
//! cargo run -p orchard-cli -- seed
//!
//! # Start the API server
//! cargo run -p orchard-api
//!
//! # Run the ignored integration tests
//! cargo test -p orchard-integration-tests -- --ignored
//! ```
//!
//! Tests register throwaway accounts with random emails, so they can run
//! repeatedly against the same database.

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// Password used for all throwaway test accounts.
pub const TEST_PASSWORD: &str = "integration-pass-1";

/// Register a throwaway account and return its bearer token and user JSON.
///
/// # Panics
///
/// Panics if the server is unreachable or registration fails.
pub async fn register_test_user(client: &Client) -> (String, Value) {
    let base_url = api_base_url();
    let email = format!("it-{}@example.com", Uuid::new_v4());

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "name": "Integration Test",
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .send()
        .await
        .expect("Failed to register test user");

    assert_eq!(resp.status(), 201, "registration should succeed");

    let body: Value = resp.json().await.expect("Failed to parse response");
    let token = body["token"].as_str().expect("token missing").to_string();
    (token, body["user"].clone())
}

/// Fetch the product listing and return the first product's id.
///
/// # Panics
///
/// Panics if the server is unreachable or the catalog is empty (run
/// `orchard-cli seed` first).
pub async fn first_product_id(client: &Client) -> i64 {
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("Failed to list products");

    assert_eq!(resp.status(), 200);

    let products: Value = resp.json().await.expect("Failed to parse products");
    products[0]["id"]
        .as_i64()
        .expect("catalog is empty; run the seed command first")
}
