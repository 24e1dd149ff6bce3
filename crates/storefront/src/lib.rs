//! Goodstock-X storefront library.
//!
//! Shopper state for the storefront: the cart and wishlist, the category
//! catalog, and the view models the client renders from them. The binary
//! serves all of it as a JSON API; this library is what the binary, the CLI
//! and the integration tests share.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod cart;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod format;
pub mod middleware;
pub mod persist;
pub mod routes;
pub mod selectors;
pub mod session;
pub mod state;
pub mod summary;
pub mod wishlist;

use axum::Router;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the storefront router with its session layer.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.shared_store(), state.config());

    routes::routes()
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
