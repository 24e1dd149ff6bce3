//! Integration tests for the cart API.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use goodstock_integration_tests::{TestApp, test_state};
use goodstock_storefront::persist::MemoryStore;

fn app() -> TestApp {
    TestApp::new(test_state(Arc::new(MemoryStore::new())))
}

#[tokio::test]
async fn test_new_shopper_has_empty_cart() {
    let mut app = app();
    let resp = app.get("/api/cart").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["cart"]["is_empty"], true);
    assert_eq!(resp.body["cart"]["item_count"], 0);
    assert_eq!(resp.body["summary"]["visible"], false);
    assert!(app.cookie().is_some(), "first visit should set a session cookie");
}

#[tokio::test]
async fn test_repeated_add_merges_into_one_line() {
    let mut app = app();
    for _ in 0..3 {
        let resp = app
            .post("/api/cart/add", json!({"product_id": "runner", "size": "42"}))
            .await;
        assert_eq!(resp.status, StatusCode::OK);
    }

    let resp = app.get("/api/cart").await;
    let items = resp.body["cart"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(resp.body["cart"]["subtotal"]["formatted"], "Rp 300.000");
}

#[tokio::test]
async fn test_sizes_are_separate_lines() {
    let mut app = app();
    app.post("/api/cart/add", json!({"product_id": "runner", "size": "42"}))
        .await;
    app.post("/api/cart/add", json!({"product_id": "runner", "size": "43"}))
        .await;

    let resp = app.get("/api/cart").await;
    assert_eq!(resp.body["cart"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(resp.body["cart"]["item_count"], 2);
}

#[tokio::test]
async fn test_totals_follow_every_mutation() {
    let mut app = app();
    app.post("/api/cart/add", json!({"product_id": "runner"})).await;
    app.post("/api/cart/add", json!({"product_id": "hoodie"})).await;
    let resp = app.post("/api/cart/add", json!({"product_id": "cap"})).await;
    assert_eq!(resp.body["cart"]["item_count"], 3);
    assert_eq!(resp.body["cart"]["subtotal"]["formatted"], "Rp 800.000");

    let resp = app
        .post(
            "/api/cart/update",
            json!({"product_id": "hoodie", "quantity": 3}),
        )
        .await;
    assert_eq!(resp.body["changed"], true);
    assert_eq!(resp.body["cart"]["item_count"], 5);
    assert_eq!(resp.body["cart"]["subtotal"]["formatted"], "Rp 1.200.000");

    let resp = app
        .post("/api/cart/decrement", json!({"product_id": "hoodie"}))
        .await;
    assert_eq!(resp.body["cart"]["item_count"], 4);

    let resp = app
        .post("/api/cart/remove", json!({"product_id": "cap"}))
        .await;
    assert_eq!(resp.body["cart"]["item_count"], 3);
    assert_eq!(resp.body["cart"]["subtotal"]["formatted"], "Rp 500.000");

    let resp = app.post("/api/cart/clear", json!({})).await;
    assert_eq!(resp.body["cart"]["is_empty"], true);
    assert_eq!(resp.body["cart"]["subtotal"]["formatted"], "Rp 0");
}

#[tokio::test]
async fn test_update_to_zero_removes_line() {
    let mut app = app();
    app.post("/api/cart/add", json!({"product_id": "cap"})).await;

    let resp = app
        .post("/api/cart/update", json!({"product_id": "cap", "quantity": 0}))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["cart"]["is_empty"], true);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let mut app = app();
    let resp = app
        .post("/api/cart/add", json!({"product_id": "ghost"}))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert!(resp.body["error"].is_string());

    let resp = app.get("/api/cart").await;
    assert_eq!(resp.body["cart"]["is_empty"], true);
}

#[tokio::test]
async fn test_invalid_input_is_rejected() {
    let mut app = app();

    let resp = app
        .post("/api/cart/add", json!({"product_id": "runner", "size": "99"}))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .post("/api/cart/add", json!({"product_id": "cap", "size": "M"}))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app.post_raw("/api/cart/add", "{not json").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app.get("/api/cart").await;
    assert_eq!(resp.body["cart"]["is_empty"], true);
}

#[tokio::test]
async fn test_summary_shows_on_add_and_can_be_dismissed() {
    let mut app = app();
    let resp = app.post("/api/cart/add", json!({"product_id": "runner"})).await;
    assert_eq!(resp.body["summary"]["visible"], true);
    assert!(resp.body["summary"]["remaining_ms"].as_u64().unwrap() <= 4000);

    let resp = app.post("/api/cart/summary/dismiss", json!({})).await;
    assert_eq!(resp.body["summary"]["visible"], false);
    assert_eq!(resp.body["cart"]["item_count"], 1);
}

#[tokio::test]
async fn test_cart_badge() {
    let mut app = app();
    let resp = app.get("/api/cart/count").await;
    assert_eq!(resp.body["visible"], false);

    app.post("/api/cart/add", json!({"product_id": "runner"})).await;
    app.post("/api/cart/add", json!({"product_id": "runner"})).await;
    let resp = app.get("/api/cart/count").await;
    assert_eq!(resp.body["count"], 2);
    assert_eq!(resp.body["label"], "2");
    assert_eq!(resp.body["visible"], true);
}

#[tokio::test]
async fn test_shoppers_are_isolated() {
    let state = test_state(Arc::new(MemoryStore::new()));
    let mut alice = TestApp::new(state.clone());
    let mut bob = TestApp::new(state);

    alice
        .post("/api/cart/add", json!({"product_id": "runner"}))
        .await;

    let resp = bob.get("/api/cart").await;
    assert_eq!(resp.body["cart"]["is_empty"], true);
    let resp = alice.get("/api/cart").await;
    assert_eq!(resp.body["cart"]["item_count"], 1);
}
