//! Product records as fetched from the hosted backend.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::{CategoryKey, ProductId};
use super::price::Price;
use super::status::Promotion;

/// Errors that can occur when parsing a [`Size`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeError {
    /// The input is empty or whitespace only.
    #[error("size cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("size must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A product size label such as `42`, `XL` or `US 9.5`.
///
/// Sizes compare exactly after trimming surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Size(String);

impl Size {
    /// Maximum length of a size label.
    pub const MAX_LENGTH: usize = 16;

    /// Parse a size label.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed label is empty or longer than
    /// [`Size::MAX_LENGTH`].
    pub fn parse(s: &str) -> Result<Self, SizeError> {
        let value = s.trim();
        if value.is_empty() {
            return Err(SizeError::Empty);
        }
        if value.chars().count() > Self::MAX_LENGTH {
            return Err(SizeError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Returns the size label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Size {
    type Error = SizeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Size> for String {
    fn from(size: Size) -> Self {
        size.0
    }
}

/// A product listing.
///
/// Owned and mutated only by the back-office through the hosted backend.
/// The storefront treats a fetched product as an immutable snapshot: cart
/// lines keep the price that was current when the item was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    /// Unit price in minor units.
    pub price: Price,
    pub category: CategoryKey,
    /// Available sizes. Empty for one-size products.
    #[serde(default)]
    pub sizes: Vec<Size>,
    #[serde(default)]
    pub promotion: Option<Promotion>,
    pub image_url: String,
}

impl Product {
    /// Whether the product is sold in distinct sizes.
    #[must_use]
    pub fn has_sizes(&self) -> bool {
        !self.sizes.is_empty()
    }

    /// Whether `size` is a valid selection for this product.
    ///
    /// One-size products accept only `None`; sized products accept any of
    /// their listed sizes and also `None` (size chosen later in chat).
    #[must_use]
    pub fn accepts_size(&self, size: Option<&Size>) -> bool {
        match size {
            None => true,
            Some(size) => self.sizes.contains(size),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sneaker() -> Product {
        Product {
            id: ProductId::parse("sku-1").unwrap(),
            name: "Runner".to_string(),
            brand: "Goodstock".to_string(),
            price: Price::from_minor(100_000),
            category: CategoryKey::parse("sneakers").unwrap(),
            sizes: vec![Size::parse("42").unwrap(), Size::parse("43").unwrap()],
            promotion: Some(Promotion::New),
            image_url: "https://cdn.example.com/runner.jpg".to_string(),
        }
    }

    #[test]
    fn test_size_trims() {
        assert_eq!(Size::parse(" XL ").unwrap().as_str(), "XL");
    }

    #[test]
    fn test_size_rejects_empty_and_long() {
        assert_eq!(Size::parse(""), Err(SizeError::Empty));
        assert!(matches!(
            Size::parse(&"9".repeat(17)),
            Err(SizeError::TooLong { .. })
        ));
    }

    #[test]
    fn test_accepts_size() {
        let product = sneaker();
        assert!(product.accepts_size(None));
        assert!(product.accepts_size(Some(&Size::parse("42").unwrap())));
        assert!(!product.accepts_size(Some(&Size::parse("40").unwrap())));
    }

    #[test]
    fn test_one_size_product_rejects_sizes() {
        let mut product = sneaker();
        product.sizes.clear();
        assert!(!product.has_sizes());
        assert!(!product.accepts_size(Some(&Size::parse("42").unwrap())));
    }

    #[test]
    fn test_product_deserialize_defaults() {
        let json = r#"{
            "id": "cap-1",
            "name": "Cap",
            "brand": "Goodstock",
            "price": 75000,
            "category": "accessories",
            "image_url": "cap.jpg"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.sizes.is_empty());
        assert!(product.promotion.is_none());
        assert_eq!(product.price.minor_units(), 75_000);
    }

    #[test]
    fn test_product_deserialize_rejects_bad_id() {
        let json = r#"{
            "id": "",
            "name": "Cap",
            "brand": "Goodstock",
            "price": 75000,
            "category": "accessories",
            "image_url": "cap.jpg"
        }"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }
}
