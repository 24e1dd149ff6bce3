//! Product records from the hosted backend.
//!
//! # Architecture
//!
//! - The backend is the source of truth for products; the storefront never
//!   writes them.
//! - [`ProductSource`] is the seam: handlers ask it for products and never
//!   care where they come from.
//! - [`RestProductSource`] talks to the hosted PostgREST API and caches
//!   responses in memory via `moka` (5 minute TTL).
//! - [`StaticProductSource`] serves a fixed product list for local
//!   development and tests.

mod memory;
mod rest;

pub use memory::StaticProductSource;
pub use rest::{ProductRow, RestProductSource};

use async_trait::async_trait;
use thiserror::Error;

use goodstock_core::{CategoryKey, Product, ProductId};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No product with this id.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// A product row failed validation.
    #[error("invalid product row: {0}")]
    InvalidRow(String),

    /// Backend URL is malformed.
    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Seed file could not be read.
    #[error("failed to read products: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only access to product records.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetch one product.
    async fn fetch_product(&self, id: &ProductId) -> Result<Product, BackendError>;

    /// List products, optionally restricted to one category.
    async fn list_products(
        &self,
        category: Option<&CategoryKey>,
    ) -> Result<Vec<Product>, BackendError>;

    /// Check that the backend is reachable.
    async fn probe(&self) -> Result<(), BackendError>;
}
