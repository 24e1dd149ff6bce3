//! Wishlist route handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use goodstock_core::ProductId;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::Shopper;
use crate::selectors::{Badge, WishlistView, wishlist_badge, wishlist_view};
use crate::session::ShopperSession;
use crate::state::AppState;

/// Names one product.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub product_id: ProductId,
}

/// Membership of one product.
#[derive(Debug, Serialize)]
pub struct Membership {
    pub product_id: ProductId,
    pub in_wishlist: bool,
}

/// Wishlist view plus the outcome of a mutation.
#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    /// Whether the request changed the wishlist.
    pub changed: bool,
    /// Membership of the product the request named, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_wishlist: Option<bool>,
    pub wishlist: WishlistView,
}

impl WishlistResponse {
    fn new(
        session: &ShopperSession,
        state: &AppState,
        changed: bool,
        in_wishlist: Option<bool>,
    ) -> Self {
        Self {
            changed,
            in_wishlist,
            wishlist: wishlist_view(session.wishlist().items(), state.config().currency),
        }
    }
}

/// Display the wishlist.
#[instrument(skip(state, shopper), fields(shopper_id = %shopper.id))]
pub async fn show(State(state): State<AppState>, shopper: Shopper) -> Json<WishlistView> {
    let session = shopper.session.lock().await;
    Json(wishlist_view(
        session.wishlist().items(),
        state.config().currency,
    ))
}

/// Wishlist count badge.
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn count(shopper: Shopper) -> Json<Badge> {
    let session = shopper.session.lock().await;
    Json(wishlist_badge(session.wishlist().items()))
}

/// Whether a product is saved.
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn contains(shopper: Shopper, Path(product_id): Path<String>) -> Result<Json<Membership>> {
    let product_id = ProductId::parse(&product_id)?;
    let session = shopper.session.lock().await;
    let in_wishlist = session.wishlist().is_in_wishlist(&product_id);
    Ok(Json(Membership {
        product_id,
        in_wishlist,
    }))
}

/// Save a product.
#[instrument(skip(state, shopper, payload), fields(shopper_id = %shopper.id))]
pub async fn add(
    State(state): State<AppState>,
    shopper: Shopper,
    payload: std::result::Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<WishlistResponse>> {
    let Json(request) = payload?;
    let product = state.products().fetch_product(&request.product_id).await?;
    add_breadcrumb(
        "wishlist",
        "Added item to wishlist",
        Some(&[("product_id", product.id.as_str())]),
    );

    let mut session = shopper.session.lock().await;
    let changed = session.wishlist_mut().add_item(product);
    tracing::info!(product_id = %request.product_id, changed, "Item added to wishlist");
    Ok(Json(WishlistResponse::new(
        &session,
        &state,
        changed,
        Some(true),
    )))
}

/// Remove a product.
#[instrument(skip(state, shopper, payload), fields(shopper_id = %shopper.id))]
pub async fn remove(
    State(state): State<AppState>,
    shopper: Shopper,
    payload: std::result::Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<WishlistResponse>> {
    let Json(request) = payload?;
    add_breadcrumb(
        "wishlist",
        "Removed item from wishlist",
        Some(&[("product_id", request.product_id.as_str())]),
    );

    let mut session = shopper.session.lock().await;
    let changed = session.wishlist_mut().remove_item(&request.product_id);
    tracing::info!(product_id = %request.product_id, changed, "Item removed from wishlist");
    Ok(Json(WishlistResponse::new(
        &session,
        &state,
        changed,
        Some(false),
    )))
}

/// Flip a product's membership.
///
/// The product is only fetched when it is about to be added.
#[instrument(skip(state, shopper, payload), fields(shopper_id = %shopper.id))]
pub async fn toggle(
    State(state): State<AppState>,
    shopper: Shopper,
    payload: std::result::Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<WishlistResponse>> {
    let Json(request) = payload?;

    {
        let mut session = shopper.session.lock().await;
        if session.wishlist().is_in_wishlist(&request.product_id) {
            session.wishlist_mut().remove_item(&request.product_id);
            tracing::info!(product_id = %request.product_id, "Wishlist toggled off");
            return Ok(Json(WishlistResponse::new(
                &session,
                &state,
                true,
                Some(false),
            )));
        }
    }

    let product = state.products().fetch_product(&request.product_id).await?;
    add_breadcrumb(
        "wishlist",
        "Toggled item into wishlist",
        Some(&[("product_id", product.id.as_str())]),
    );

    let mut session = shopper.session.lock().await;
    // Another request may have added it while the product was being fetched
    let now_saved = session.wishlist_mut().toggle_item(product);
    tracing::info!(product_id = %request.product_id, now_saved, "Wishlist toggled");
    Ok(Json(WishlistResponse::new(
        &session,
        &state,
        true,
        Some(now_saved),
    )))
}

/// Empty the wishlist.
#[instrument(skip(state, shopper), fields(shopper_id = %shopper.id))]
pub async fn clear(State(state): State<AppState>, shopper: Shopper) -> Json<WishlistResponse> {
    add_breadcrumb("wishlist", "Cleared wishlist", None);
    let mut session = shopper.session.lock().await;
    let changed = session.wishlist_mut().clear_wishlist();
    Json(WishlistResponse::new(&session, &state, changed, None))
}
