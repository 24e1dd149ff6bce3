//! Integration tests for the catalog, navigation and seller chat.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use goodstock_integration_tests::{TestApp, test_state};
use goodstock_storefront::persist::MemoryStore;

fn app() -> TestApp {
    TestApp::new(test_state(Arc::new(MemoryStore::new())))
}

#[tokio::test]
async fn test_health() {
    let mut app = app();
    let resp = app.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    let resp = app.get("/health/ready").await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_category_grid() {
    let mut app = app();
    let resp = app.get("/api/categories").await;
    assert_eq!(resp.status, StatusCode::OK);

    let keys: Vec<&str> = resp
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|tile| tile["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, ["sneakers", "apparel", "accessories", "bags"]);
    assert_eq!(resp.body[0]["href"], "/category/sneakers");
}

#[tokio::test]
async fn test_category_lookup() {
    let mut app = app();
    let resp = app.get("/api/categories/bags").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["name"], "Bags");
    assert_eq!(resp.body["subcategories"][0], "Backpacks");

    let resp = app.get("/api/categories/boats").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_nav_highlighting() {
    let mut app = app();
    let resp = app.get("/api/nav?active=apparel").await;
    assert_eq!(resp.body["active"], "apparel");
    let active: Vec<bool> = resp.body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["active"].as_bool().unwrap())
        .collect();
    assert_eq!(active, [false, true, false, false]);

    let resp = app.get("/api/nav?active=boats").await;
    assert!(resp.body["active"].is_null());

    let resp = app.get("/api/nav").await;
    assert!(resp.body["active"].is_null());
}

#[tokio::test]
async fn test_product_inquiry_link() {
    let mut app = app();
    let resp = app.get("/api/chat/product/runner?size=42").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.body["message"],
        "Hi Goodstock-X! I'm interested in Runner by Goodstock (size 42) (Rp 100.000). Is it still available?"
    );
    assert!(
        resp.body["url"]
            .as_str()
            .unwrap()
            .starts_with("https://wa.me/6281234567890?text=Hi%20Goodstock-X")
    );

    let resp = app.get("/api/chat/product/runner?size=99").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cart_order_link() {
    let mut app = app();
    let resp = app.get("/api/chat/cart").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    app.post("/api/cart/add", json!({"product_id": "hoodie", "size": "M"}))
        .await;
    app.post("/api/cart/add", json!({"product_id": "hoodie", "size": "M"}))
        .await;
    app.post("/api/cart/add", json!({"product_id": "cap"})).await;

    let resp = app.get("/api/chat/cart").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.body["message"],
        "Hi Goodstock-X! I'd like to order:\n\
         - 2x Hoodie (size M) @ Rp 200.000 = Rp 400.000\n\
         - 1x Cap @ Rp 500.000 = Rp 500.000\n\
         Total: Rp 900.000"
    );
}
