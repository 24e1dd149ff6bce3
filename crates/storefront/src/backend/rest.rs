//! Hosted backend client (PostgREST `products` table).
//!
//! Uses the project's anonymous key for both the `apikey` header and the
//! bearer token, which is what the hosted service expects for public reads.
//! Products and listings are cached for 5 minutes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use goodstock_core::{CategoryKey, Price, Product, ProductId, Promotion, Size};

use super::{BackendError, ProductSource};
use crate::config::BackendConfig;

const PRODUCTS_PATH: &str = "rest/v1/products";

/// Cache key for backend responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Product(ProductId),
    Products(Option<CategoryKey>),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Arc<Vec<Product>>),
}

/// A row of the `products` table as the backend returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRow {
    /// Text or integer primary key.
    #[serde(deserialize_with = "row_key")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub price: i64,
    pub category: String,
    #[serde(default)]
    pub sizes: Option<Vec<String>>,
    #[serde(default)]
    pub promotion: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn row_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RowKey {
        Text(String),
        Integer(i64),
    }

    Ok(match RowKey::deserialize(deserializer)? {
        RowKey::Text(text) => text,
        RowKey::Integer(n) => n.to_string(),
    })
}

/// Decode and validate one row of a response.
fn parse_row(value: Value) -> Result<Product, BackendError> {
    let id = value
        .get("id")
        .map_or_else(|| "(no id)".to_string(), ToString::to_string);
    let row: ProductRow = serde_json::from_value(value)
        .map_err(|e| BackendError::InvalidRow(format!("{id}: {e}")))?;
    Product::try_from(row)
}

impl TryFrom<ProductRow> for Product {
    type Error = BackendError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let invalid = |field: &str, detail: String| {
            BackendError::InvalidRow(format!("{}: {field}: {detail}", row.id))
        };

        let id = ProductId::parse(&row.id).map_err(|e| invalid("id", e.to_string()))?;
        let category =
            CategoryKey::parse(&row.category).map_err(|e| invalid("category", e.to_string()))?;
        let price = u64::try_from(row.price)
            .map(Price::from_minor)
            .map_err(|_| invalid("price", format!("negative price {}", row.price)))?;
        if row.name.trim().is_empty() {
            return Err(invalid("name", "empty".to_string()));
        }
        let sizes = row
            .sizes
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|s| Size::parse(s))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| invalid("sizes", e.to_string()))?;
        // Unknown promotion flags are ignored rather than hiding the product
        let promotion = row
            .promotion
            .as_deref()
            .filter(|flag| !flag.is_empty())
            .and_then(|flag| flag.parse::<Promotion>().ok());

        Ok(Self {
            id,
            name: row.name.trim().to_owned(),
            brand: row.brand.unwrap_or_default(),
            price,
            category,
            sizes,
            promotion,
            image_url: row.image_url.unwrap_or_default(),
        })
    }
}

/// Client for the hosted backend's product table.
#[derive(Clone)]
pub struct RestProductSource {
    inner: Arc<RestProductSourceInner>,
}

struct RestProductSourceInner {
    client: reqwest::Client,
    endpoint: Url,
    anon_key: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for RestProductSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestProductSource")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("anon_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl RestProductSource {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend URL is malformed.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let endpoint = Url::parse(&format!(
            "{}/{PRODUCTS_PATH}",
            config.url.trim_end_matches('/')
        ))?;

        Ok(Self {
            inner: Arc::new(RestProductSourceInner {
                client: reqwest::Client::new(),
                endpoint,
                anon_key: config.anon_key.expose_secret().to_string(),
                cache,
            }),
        })
    }

    /// Run a query against the products endpoint and return the raw rows.
    ///
    /// Rows stay untyped here so each one can be validated on its own.
    async fn query(&self, params: &[(&str, &str)]) -> Result<Vec<Value>, BackendError> {
        let mut url = self.inner.endpoint.clone();
        url.query_pairs_mut().extend_pairs(params);

        let response = self
            .inner
            .client
            .get(url)
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(&self.inner.anon_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }
}

#[async_trait]
impl ProductSource for RestProductSource {
    #[instrument(skip(self, id), fields(product_id = %id))]
    async fn fetch_product(&self, id: &ProductId) -> Result<Product, BackendError> {
        let cache_key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let filter = format!("eq.{id}");
        let rows = self
            .query(&[("select", "*"), ("id", filter.as_str()), ("limit", "1")])
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(id.clone()))?;
        let product = parse_row(row)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    #[instrument(skip(self, category), fields(category = ?category.map(CategoryKey::as_str)))]
    async fn list_products(
        &self,
        category: Option<&CategoryKey>,
    ) -> Result<Vec<Product>, BackendError> {
        let cache_key = CacheKey::Products(category.cloned());
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product listing");
            return Ok(products.as_ref().clone());
        }

        let filter = category.map(|key| format!("eq.{key}"));
        let mut params = vec![("select", "*"), ("order", "name.asc")];
        if let Some(filter) = &filter {
            params.push(("category", filter.as_str()));
        }
        let rows = self.query(&params).await?;

        // One bad row should not take the whole listing down
        let products: Vec<Product> = rows
            .into_iter()
            .filter_map(|row| match parse_row(row) {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping invalid product row");
                    None
                }
            })
            .collect();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(Arc::new(products.clone())))
            .await;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn probe(&self) -> Result<(), BackendError> {
        self.query(&[("select", "id"), ("limit", "1")]).await?;
        Ok(())
    }
}
