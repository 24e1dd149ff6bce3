//! Wishlist state.
//!
//! [`WishlistItems`] is the pure set of saved products, keyed by product id
//! with a hash index for O(1) membership. [`WishlistStore`] persists it.

mod store;

pub use store::WishlistStore;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use goodstock_core::{Product, ProductId};

/// Saved products in the order they were added.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Product>", into = "Vec<Product>")]
pub struct WishlistItems {
    items: Vec<Product>,
    index: HashSet<ProductId>,
}

impl PartialEq for WishlistItems {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for WishlistItems {}

impl WishlistItems {
    /// An empty wishlist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a wishlist from products, keeping the first of any duplicates.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut wishlist = Self::new();
        for product in products {
            wishlist.add(product);
        }
        wishlist
    }

    /// Insert if absent. Returns `true` if inserted.
    pub fn add(&mut self, product: Product) -> bool {
        if !self.index.insert(product.id.clone()) {
            return false;
        }
        self.items.push(product);
        true
    }

    /// Delete if present. Returns `true` if removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        if !self.index.remove(product_id) {
            return false;
        }
        self.items.retain(|product| product.id != *product_id);
        true
    }

    /// Remove if present, add if absent. Returns the new membership.
    pub fn toggle(&mut self, product: Product) -> bool {
        if self.index.contains(&product.id) {
            self.remove(&product.id);
            false
        } else {
            self.add(product)
        }
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.index.contains(product_id)
    }

    /// Empty the wishlist. Returns `true` if anything was removed.
    pub fn clear(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        self.index.clear();
        changed
    }

    /// Saved products in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<Product>> for WishlistItems {
    fn from(products: Vec<Product>) -> Self {
        Self::from_products(products)
    }
}

impl From<WishlistItems> for Vec<Product> {
    fn from(wishlist: WishlistItems) -> Self {
        wishlist.items
    }
}
