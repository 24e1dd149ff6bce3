//! Product listing route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use goodstock_core::CategoryKey;

use crate::error::{AppError, Result};
use crate::middleware::Shopper;
use crate::selectors::ProductCard;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// Product cards, optionally limited to one category.
#[instrument(skip(state, shopper), fields(shopper_id = %shopper.id))]
pub async fn index(
    State(state): State<AppState>,
    shopper: Shopper,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductCard>>> {
    let category = query
        .category
        .as_deref()
        .map(CategoryKey::parse)
        .transpose()?;

    if let Some(key) = &category
        && state.catalog().get(key).is_none()
    {
        return Err(AppError::NotFound(format!("category {key}")));
    }

    let products = state.products().list_products(category.as_ref()).await?;
    tracing::debug!(count = products.len(), "Products listed");

    let currency = state.config().currency;
    let session = shopper.session.lock().await;
    let wishlist = session.wishlist().items();
    Ok(Json(
        products
            .iter()
            .map(|product| ProductCard::new(product, currency, wishlist))
            .collect(),
    ))
}
