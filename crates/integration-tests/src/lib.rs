//! Integration tests for Goodstock-X.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p goodstock-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart API and floating summary
//! - `storefront_wishlist` - Wishlist API and product listing
//! - `storefront_catalog` - Catalog, navigation and seller chat
//! - `persistence_restart` - Shopper state surviving a restart
//!
//! Tests drive the storefront router in-process. [`TestApp`] plays the
//! browser: it keeps the session cookie between requests so every request
//! belongs to the same shopper.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use goodstock_core::PhoneNumber;
use goodstock_storefront::backend::StaticProductSource;
use goodstock_storefront::catalog::Catalog;
use goodstock_storefront::config::StorefrontConfig;
use goodstock_storefront::persist::KeyValueStore;
use goodstock_storefront::state::AppState;

/// Products served by the test backend.
pub const PRODUCTS: &str = r#"[
    {"id": "runner", "name": "Runner", "brand": "Goodstock", "price": 100000,
     "category": "sneakers", "sizes": ["42", "43"], "promotion": "new",
     "image_url": "/images/runner.jpg"},
    {"id": "hoodie", "name": "Hoodie", "brand": "Goodstock", "price": 200000,
     "category": "apparel", "sizes": ["M", "L"], "image_url": "/images/hoodie.jpg"},
    {"id": "cap", "name": "Cap", "brand": "Goodstock", "price": 500000,
     "category": "accessories", "image_url": "/images/cap.jpg"}
]"#;

/// Seller number used by the test configuration.
pub const SELLER: &str = "+6281234567890";

/// Build application state over `store` with the test products.
///
/// # Panics
///
/// Panics if the fixtures are invalid.
#[allow(clippy::expect_used)]
#[must_use]
pub fn test_state(store: Arc<dyn KeyValueStore>) -> AppState {
    let seller = PhoneNumber::parse(SELLER).expect("valid seller number");
    let config = StorefrontConfig::new("http://localhost:3000", seller);
    let products = StaticProductSource::from_json(PRODUCTS).expect("valid product fixtures");
    AppState::new(config, Catalog::builtin(), Arc::new(products), store)
}

/// Response status and JSON body.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// One shopper's browser against an in-process storefront.
///
/// Clones share the router and start with the same cookie, like two tabs.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// A new shopper with no session cookie.
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            router: goodstock_storefront::app(state),
            cookie: None,
        }
    }

    /// The current session cookie, if one was set.
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Reuse another browser's session cookie.
    pub fn set_cookie(&mut self, cookie: Option<String>) {
        self.cookie = cookie;
    }

    /// Send a GET request.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send("GET", uri, None).await
    }

    /// Send a POST request with a JSON body.
    pub async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send("POST", uri, Some(body.to_string())).await
    }

    /// Send a POST request with a raw body.
    pub async fn post_raw(&mut self, uri: &str, body: &str) -> TestResponse {
        self.send("POST", uri, Some(body.to_owned())).await
    }

    #[allow(clippy::expect_used)]
    async fn send(&mut self, method: &str, uri: &str, body: Option<String>) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body)),
            None => request.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let set_cookie = set_cookie.to_str().expect("ascii cookie");
            let pair = set_cookie.split(';').next().unwrap_or_default();
            self.cookie = Some(pair.to_owned());
        }

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse { status, body }
    }
}
