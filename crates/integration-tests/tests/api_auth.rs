//! Integration tests for registration, login, and token lifecycle.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p orchard-api)
//!
//! Run with: cargo test -p orchard-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use orchard_integration_tests::{TEST_PASSWORD, api_base_url, register_test_user};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_login_profile_round_trip() {
    let client = Client::new();
    let base_url = api_base_url();

    let (token, user) = register_test_user(&client).await;
    let email = user["email"].as_str().expect("email missing");

    // Login with the same credentials
    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(resp.status(), StatusCode::OK);

    // Profile is reachable with the registration token
    let resp = client
        .get(format!("{base_url}/api/profile"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get profile");
    assert_eq!(resp.status(), StatusCode::OK);

    let profile: Value = resp.json().await.expect("Failed to parse profile");
    assert_eq!(profile["email"], user["email"]);
    // Password material never leaves the server
    assert!(profile.get("password_hash").is_none());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_email_rejected() {
    let client = Client::new();
    let base_url = api_base_url();

    let (_, user) = register_test_user(&client).await;

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "name": "Second Account",
            "email": user["email"],
            "password": TEST_PASSWORD,
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_wrong_password_rejected() {
    let client = Client::new();
    let base_url = api_base_url();

    let (_, user) = register_test_user(&client).await;

    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": user["email"], "password": "not-the-password" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_logout_revokes_token() {
    let client = Client::new();
    let base_url = api_base_url();

    let (token, _) = register_test_user(&client).await;

    let resp = client
        .post(format!("{base_url}/api/auth/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to logout");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The token is dead afterwards
    let resp = client
        .get(format!("{base_url}/api/profile"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_protected_routes_require_token() {
    let client = Client::new();
    let base_url = api_base_url();

    for path in ["/api/profile", "/api/cart", "/api/orders", "/api/wishlist"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "path: {path}");
    }
}
