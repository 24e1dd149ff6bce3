//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//! GET  /health/ready                 - Readiness check (probes the product backend)
//!
//! # Catalog
//! GET  /api/categories               - Category grid
//! GET  /api/categories/{key}         - One category (404 if unknown)
//! GET  /api/nav?active={key}         - Navigation with highlighting
//! GET  /api/products?category={key}  - Product cards
//!
//! # Cart
//! GET  /api/cart                     - Cart view and floating summary state
//! GET  /api/cart/count               - Cart count badge
//! POST /api/cart/add                 - Add one unit {product_id, size?}
//! POST /api/cart/update              - Set quantity {product_id, size?, quantity}
//! POST /api/cart/decrement           - Remove one unit {product_id, size?}
//! POST /api/cart/remove              - Remove a line {product_id, size?}
//! POST /api/cart/clear               - Empty the cart
//! POST /api/cart/summary/dismiss     - Hide the floating summary
//!
//! # Wishlist
//! GET  /api/wishlist                 - Wishlist view
//! GET  /api/wishlist/count           - Wishlist count badge
//! GET  /api/wishlist/contains/{id}   - Membership
//! POST /api/wishlist/add             - Save {product_id}
//! POST /api/wishlist/remove          - Unsave {product_id}
//! POST /api/wishlist/toggle          - Flip membership {product_id}
//! POST /api/wishlist/clear           - Empty the wishlist
//!
//! # Seller chat
//! GET  /api/chat/product/{id}?size=  - Product inquiry link
//! GET  /api/chat/cart                - Cart order link (400 if the cart is empty)
//! ```

pub mod cart;
pub mod catalog;
pub mod chat;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/{key}", get(catalog::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/decrement", post(cart::decrement))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/summary/dismiss", post(cart::dismiss_summary))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/count", get(wishlist::count))
        .route("/contains/{id}", get(wishlist::contains))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
        .route("/toggle", post(wishlist::toggle))
        .route("/clear", post(wishlist::clear))
}

/// Create the seller chat routes router.
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/product/{id}", get(chat::product))
        .route("/cart", get(chat::cart))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", catalog_routes())
        .route("/nav", get(catalog::nav))
        .route("/products", get(products::index))
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/chat", chat_routes())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", api_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the product backend is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.products().probe().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use goodstock_core::{CategoryKey, PhoneNumber, Product, ProductId};

    use super::*;
    use crate::backend::{BackendError, ProductSource, StaticProductSource};
    use crate::catalog::Catalog;
    use crate::config::StorefrontConfig;
    use crate::persist::MemoryStore;

    struct Offline;

    #[async_trait]
    impl ProductSource for Offline {
        async fn fetch_product(&self, id: &ProductId) -> std::result::Result<Product, BackendError> {
            Err(BackendError::NotFound(id.clone()))
        }

        async fn list_products(
            &self,
            _category: Option<&CategoryKey>,
        ) -> std::result::Result<Vec<Product>, BackendError> {
            Ok(Vec::new())
        }

        async fn probe(&self) -> std::result::Result<(), BackendError> {
            Err(BackendError::Status {
                status: 503,
                body: "down".to_string(),
            })
        }
    }

    fn state(products: Arc<dyn ProductSource>) -> AppState {
        let config = StorefrontConfig::new(
            "http://localhost:3000",
            PhoneNumber::parse("+6281234567890").unwrap(),
        );
        AppState::new(
            config,
            Catalog::builtin(),
            products,
            Arc::new(MemoryStore::new()),
        )
    }

    async fn status(state: AppState, uri: &str) -> StatusCode {
        crate::app(state)
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health() {
        let state = state(Arc::new(StaticProductSource::default()));
        assert_eq!(status(state.clone(), "/health").await, StatusCode::OK);
        assert_eq!(status(state, "/health/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_reports_backend_outage() {
        let state = state(Arc::new(Offline));
        assert_eq!(status(state.clone(), "/health").await, StatusCode::OK);
        assert_eq!(
            status(state, "/health/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let state = state(Arc::new(StaticProductSource::default()));
        assert_eq!(status(state, "/api/nope").await, StatusCode::NOT_FOUND);
    }
}
