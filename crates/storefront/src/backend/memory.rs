//! Fixed in-memory product list.

use std::path::Path;

use async_trait::async_trait;

use goodstock_core::{CategoryKey, Product, ProductId};

use super::{BackendError, ProductSource};

/// Serves a fixed list of products in the order given.
#[derive(Debug, Clone, Default)]
pub struct StaticProductSource {
    products: Vec<Product>,
}

impl StaticProductSource {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a product fails validation.
    pub fn from_json(raw: &str) -> Result<Self, BackendError> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    /// Load products from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, BackendError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

#[async_trait]
impl ProductSource for StaticProductSource {
    async fn fetch_product(&self, id: &ProductId) -> Result<Product, BackendError> {
        self.products
            .iter()
            .find(|product| product.id == *id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(id.clone()))
    }

    async fn list_products(
        &self,
        category: Option<&CategoryKey>,
    ) -> Result<Vec<Product>, BackendError> {
        Ok(self
            .products
            .iter()
            .filter(|product| category.is_none_or(|key| product.category == *key))
            .cloned()
            .collect())
    }

    async fn probe(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PRODUCTS: &str = r#"[
        {"id": "p1", "name": "Runner", "brand": "Goodstock", "price": 100000,
         "category": "sneakers", "sizes": ["42"], "image_url": "/p1.jpg"},
        {"id": "p2", "name": "Tote", "brand": "Goodstock", "price": 50000,
         "category": "bags", "promotion": "sale", "image_url": "/p2.jpg"}
    ]"#;

    #[tokio::test]
    async fn test_fetch_and_list() {
        let source = StaticProductSource::from_json(PRODUCTS).unwrap();
        let p1 = ProductId::parse("p1").unwrap();
        assert_eq!(source.fetch_product(&p1).await.unwrap().name, "Runner");

        let missing = ProductId::parse("nope").unwrap();
        assert!(matches!(
            source.fetch_product(&missing).await,
            Err(BackendError::NotFound(_))
        ));

        assert_eq!(source.list_products(None).await.unwrap().len(), 2);
        let bags = CategoryKey::parse("bags").unwrap();
        let listed = source.list_products(Some(&bags)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed.first().unwrap().id.as_str(), "p2");
    }

    #[test]
    fn test_rejects_invalid_products() {
        let raw = r#"[{"id": "", "name": "x", "brand": "x", "price": 1,
                       "category": "bags", "image_url": ""}]"#;
        assert!(matches!(
            StaticProductSource::from_json(raw),
            Err(BackendError::Parse(_))
        ));
    }
}
