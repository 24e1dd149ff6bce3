//! Seller chat route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use goodstock_core::{ProductId, Size};

use crate::chat::{ChatLink, cart_order, product_inquiry};
use crate::error::{AppError, Result};
use crate::middleware::Shopper;
use crate::state::AppState;

/// Query parameters for a product inquiry.
#[derive(Debug, Deserialize)]
pub struct InquiryQuery {
    pub size: Option<String>,
}

/// Chat link asking about one product.
#[instrument(skip(state))]
pub async fn product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(query): Query<InquiryQuery>,
) -> Result<Json<ChatLink>> {
    let product_id = ProductId::parse(&product_id)?;
    let size = query.size.as_deref().map(Size::parse).transpose()?;
    let product = state.products().fetch_product(&product_id).await?;

    if !product.accepts_size(size.as_ref()) {
        return Err(AppError::BadRequest(format!(
            "size {} is not available for {product_id}",
            size.as_ref().map_or("(none)", Size::as_str)
        )));
    }

    let config = state.config();
    let message = product_inquiry(&product, size.as_ref(), config.currency);
    Ok(Json(ChatLink::new(&config.seller_whatsapp, message)))
}

/// Chat link ordering the whole cart.
#[instrument(skip(state, shopper), fields(shopper_id = %shopper.id))]
pub async fn cart(State(state): State<AppState>, shopper: Shopper) -> Result<Json<ChatLink>> {
    let config = state.config();
    let session = shopper.session.lock().await;
    let message = cart_order(session.cart().lines(), config.currency)
        .ok_or_else(|| AppError::BadRequest("cart is empty".to_string()))?;
    tracing::info!(
        total_items = session.cart().total_items(),
        "Cart order link created"
    );
    Ok(Json(ChatLink::new(&config.seller_whatsapp, message)))
}
