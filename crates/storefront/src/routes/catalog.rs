//! Category catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use goodstock_core::CategoryKey;

use crate::catalog::CategoryEntry;
use crate::error::{AppError, Result};
use crate::selectors::{CategoryTile, NavView, category_grid, nav_view};
use crate::state::AppState;

/// Query parameters for the navigation.
#[derive(Debug, Deserialize)]
pub struct NavQuery {
    pub active: Option<String>,
}

/// Category grid.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<CategoryTile>> {
    Json(category_grid(state.catalog()))
}

/// One category with its subcategories.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<CategoryEntry>> {
    let key = CategoryKey::parse(&key)?;
    state
        .catalog()
        .get(&key)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("category {key}")))
}

/// Navigation entries.
///
/// An `active` key that is malformed or not in the catalog highlights nothing.
#[instrument(skip(state))]
pub async fn nav(State(state): State<AppState>, Query(query): Query<NavQuery>) -> Json<NavView> {
    let active = query
        .active
        .as_deref()
        .and_then(|key| CategoryKey::parse(key).ok());
    Json(nav_view(state.catalog(), active.as_ref()))
}
