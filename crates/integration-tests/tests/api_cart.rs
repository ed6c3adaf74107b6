//! Integration tests for cart and wishlist.
//!
//! Requires a running API server, migrated database, and seeded catalog.
//!
//! Run with: cargo test -p orchard-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use orchard_integration_tests::{api_base_url, first_product_id, register_test_user};

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_cart_add_list_remove() {
    let client = Client::new();
    let base_url = api_base_url();

    let (token, _) = register_test_user(&client).await;
    let product_id = first_product_id(&client).await;

    // Add to cart
    let resp = client
        .post(format!("{base_url}/api/cart"))
        .bearer_auth(&token)
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let entry: Value = resp.json().await.expect("Failed to parse entry");
    let entry_id = entry["id"].as_i64().expect("entry id missing");

    // Listing shows the product with its quantity
    let resp = client
        .get(format!("{base_url}/api/cart"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let items: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(items.as_array().map(Vec::len), Some(1));
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["product"]["id"], product_id);

    // Adding again replaces the quantity rather than stacking a second row
    let resp = client
        .post(format!("{base_url}/api/cart"))
        .bearer_auth(&token)
        .json(&json!({ "product_id": product_id, "quantity": 5 }))
        .send()
        .await
        .expect("Failed to update cart");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let items: Value = client
        .get(format!("{base_url}/api/cart"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list cart")
        .json()
        .await
        .expect("Failed to parse cart");
    assert_eq!(items.as_array().map(Vec::len), Some(1));
    assert_eq!(items[0]["quantity"], 5);

    // Remove
    let resp = client
        .delete(format!("{base_url}/api/cart/{entry_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to remove from cart");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Removing again answers 404
    let resp = client
        .delete(format!("{base_url}/api/cart/{entry_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_cart_rejects_unknown_product() {
    let client = Client::new();
    let base_url = api_base_url();

    let (token, _) = register_test_user(&client).await;

    let resp = client
        .post(format!("{base_url}/api/cart"))
        .bearer_auth(&token)
        .json(&json!({ "product_id": 999_999, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_wishlist_add_is_idempotent() {
    let client = Client::new();
    let base_url = api_base_url();

    let (token, _) = register_test_user(&client).await;
    let product_id = first_product_id(&client).await;

    for _ in 0..2 {
        let resp = client
            .post(format!("{base_url}/api/wishlist"))
            .bearer_auth(&token)
            .json(&json!({ "product_id": product_id }))
            .send()
            .await
            .expect("Failed to add to wishlist");
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let items: Value = client
        .get(format!("{base_url}/api/wishlist"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list wishlist")
        .json()
        .await
        .expect("Failed to parse wishlist");
    assert_eq!(items.as_array().map(Vec::len), Some(1));
}
