//! Cart route handlers.
//!
//! Every mutation answers with the full cart view and the floating summary
//! state, so the client can re-render badge, drawer and summary in one go.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use goodstock_core::{ProductId, Size};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::Shopper;
use crate::selectors::{Badge, CartView, cart_badge, cart_view};
use crate::session::ShopperSession;
use crate::state::AppState;

/// Identifies one cart line.
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: Option<Size>,
}

/// Sets a line's quantity. Zero or less removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: Option<Size>,
    pub quantity: i64,
}

/// Floating summary state for the client.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub visible: bool,
    /// Milliseconds until the summary hides itself.
    pub remaining_ms: Option<u64>,
}

/// Cart view plus summary state.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    /// Whether the request changed the cart.
    pub changed: bool,
    pub cart: CartView,
    pub summary: SummaryView,
}

impl CartResponse {
    fn new(session: &ShopperSession, state: &AppState, changed: bool) -> Self {
        let summary = session.summary();
        Self {
            changed,
            cart: cart_view(session.cart().lines(), state.config().currency),
            summary: SummaryView {
                visible: summary.is_visible(),
                remaining_ms: summary
                    .remaining()
                    .map(|left| u64::try_from(left.as_millis()).unwrap_or(u64::MAX)),
            },
        }
    }
}

/// Display the cart.
#[instrument(skip(state, shopper), fields(shopper_id = %shopper.id))]
pub async fn show(State(state): State<AppState>, shopper: Shopper) -> Json<CartResponse> {
    let session = shopper.session.lock().await;
    Json(CartResponse::new(&session, &state, false))
}

/// Cart count badge.
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn count(shopper: Shopper) -> Json<Badge> {
    let session = shopper.session.lock().await;
    Json(cart_badge(session.cart().lines()))
}

/// Add one unit of a product.
#[instrument(skip(state, shopper, payload), fields(shopper_id = %shopper.id))]
pub async fn add(
    State(state): State<AppState>,
    shopper: Shopper,
    payload: std::result::Result<Json<LineRequest>, JsonRejection>,
) -> Result<Json<CartResponse>> {
    let Json(request) = payload?;
    // Fetch before locking so a slow backend never blocks the shopper's other requests
    let product = state.products().fetch_product(&request.product_id).await?;

    if !product.accepts_size(request.size.as_ref()) {
        return Err(AppError::BadRequest(format!(
            "size {} is not available for {}",
            request.size.as_ref().map_or("(none)", Size::as_str),
            product.id
        )));
    }

    add_breadcrumb(
        "cart",
        "Added item to cart",
        Some(&[("product_id", product.id.as_str())]),
    );

    let mut session = shopper.session.lock().await;
    let changed = session.add_to_cart(product, request.size);
    tracing::info!(
        product_id = %request.product_id,
        total_items = session.cart().total_items(),
        "Item added to cart"
    );
    Ok(Json(CartResponse::new(&session, &state, changed)))
}

/// Set a line's quantity.
#[instrument(skip(state, shopper, payload), fields(shopper_id = %shopper.id))]
pub async fn update(
    State(state): State<AppState>,
    shopper: Shopper,
    payload: std::result::Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<CartResponse>> {
    let Json(request) = payload?;
    add_breadcrumb(
        "cart",
        "Updated cart quantity",
        Some(&[("product_id", request.product_id.as_str())]),
    );

    let mut session = shopper.session.lock().await;
    let changed = session.update_cart_quantity(
        &request.product_id,
        request.size.as_ref(),
        request.quantity,
    );
    tracing::info!(
        product_id = %request.product_id,
        quantity = request.quantity,
        changed,
        "Cart quantity updated"
    );
    Ok(Json(CartResponse::new(&session, &state, changed)))
}

/// Remove one unit, dropping the line at zero.
#[instrument(skip(state, shopper, payload), fields(shopper_id = %shopper.id))]
pub async fn decrement(
    State(state): State<AppState>,
    shopper: Shopper,
    payload: std::result::Result<Json<LineRequest>, JsonRejection>,
) -> Result<Json<CartResponse>> {
    let Json(request) = payload?;
    let mut session = shopper.session.lock().await;
    let changed = session.decrement_cart_item(&request.product_id, request.size.as_ref());
    tracing::debug!(product_id = %request.product_id, changed, "Cart item decremented");
    Ok(Json(CartResponse::new(&session, &state, changed)))
}

/// Remove a line.
#[instrument(skip(state, shopper, payload), fields(shopper_id = %shopper.id))]
pub async fn remove(
    State(state): State<AppState>,
    shopper: Shopper,
    payload: std::result::Result<Json<LineRequest>, JsonRejection>,
) -> Result<Json<CartResponse>> {
    let Json(request) = payload?;
    add_breadcrumb(
        "cart",
        "Removed item from cart",
        Some(&[("product_id", request.product_id.as_str())]),
    );

    let mut session = shopper.session.lock().await;
    let changed = session.remove_from_cart(&request.product_id, request.size.as_ref());
    tracing::info!(product_id = %request.product_id, changed, "Item removed from cart");
    Ok(Json(CartResponse::new(&session, &state, changed)))
}

/// Empty the cart.
#[instrument(skip(state, shopper), fields(shopper_id = %shopper.id))]
pub async fn clear(State(state): State<AppState>, shopper: Shopper) -> Json<CartResponse> {
    add_breadcrumb("cart", "Cleared cart", None);
    let mut session = shopper.session.lock().await;
    let changed = session.clear_cart();
    tracing::info!(changed, "Cart cleared");
    Json(CartResponse::new(&session, &state, changed))
}

/// Hide the floating summary.
#[instrument(skip(state, shopper), fields(shopper_id = %shopper.id))]
pub async fn dismiss_summary(State(state): State<AppState>, shopper: Shopper) -> Json<CartResponse> {
    let mut session = shopper.session.lock().await;
    session.dismiss_summary();
    Json(CartResponse::new(&session, &state, false))
}
