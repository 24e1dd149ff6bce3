//! Category catalog.
//!
//! Static mapping from category key to display name, subcategories and a
//! representative image. Loaded once at startup, either from the built-in
//! Goodstock-X set or from a JSON file, and never mutated afterwards.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use goodstock_core::CategoryKey;

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no categories")]
    Empty,

    #[error("duplicate category key: {0}")]
    DuplicateKey(CategoryKey),

    #[error("category {0} has an empty display name")]
    EmptyName(CategoryKey),

    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

const BUILTIN: &[(&str, &str, &[&str])] = &[
    (
        "sneakers",
        "Sneakers",
        &["Running", "Basketball", "Lifestyle", "Skate"],
    ),
    ("apparel", "Apparel", &["T-Shirts", "Hoodies", "Jackets", "Pants"]),
    (
        "accessories",
        "Accessories",
        &["Caps", "Socks", "Watches", "Sunglasses"],
    ),
    ("bags", "Bags", &["Backpacks", "Sling Bags", "Tote Bags"]),
];

/// One category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub key: CategoryKey,
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
    pub image_url: String,
}

/// Ordered, read-only set of categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CategoryEntry>,
}

impl Catalog {
    /// Validate and wrap `entries`, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, a key repeats, or a name is blank.
    pub fn new(entries: Vec<CategoryEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(entry.key.clone()));
            }
            if !seen.insert(&entry.key) {
                return Err(CatalogError::DuplicateKey(entry.key.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// The Goodstock-X storefront categories.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .filter_map(|(key, name, subcategories)| {
                Some(CategoryEntry {
                    key: CategoryKey::parse(key).ok()?,
                    name: (*name).to_owned(),
                    subcategories: subcategories.iter().map(|s| (*s).to_owned()).collect(),
                    image_url: format!("/images/categories/{key}.jpg"),
                })
            })
            .collect();
        Self { entries }
    }

    /// Parse a catalog from a JSON array of entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CategoryEntry> = serde_json::from_str(raw)?;
        Self::new(entries)
    }

    /// Load a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Look up a category by key.
    #[must_use]
    pub fn get(&self, key: &CategoryKey) -> Option<&CategoryEntry> {
        self.entries.iter().find(|entry| entry.key == *key)
    }

    /// All categories in display order.
    #[must_use]
    pub fn list(&self) -> &[CategoryEntry] {
        &self.entries
    }

    /// Whether `key` has a subcategory called `name` (case-insensitive).
    #[must_use]
    pub fn contains_subcategory(&self, key: &CategoryKey, name: &str) -> bool {
        self.get(key).is_some_and(|entry| {
            entry
                .subcategories
                .iter()
                .any(|sub| sub.eq_ignore_ascii_case(name.trim()))
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
