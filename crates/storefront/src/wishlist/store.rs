//! Persisting wrapper around [`WishlistItems`].

use goodstock_core::{Product, ProductId};

use super::WishlistItems;
use crate::persist::{self, KeyValueStore, PersistTarget};

/// A shopper's wishlist.
#[derive(Debug, Default)]
pub struct WishlistStore {
    items: WishlistItems,
    persist: Option<PersistTarget>,
}

impl WishlistStore {
    /// A wishlist that is never persisted.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Restore a wishlist from `store`, starting empty if nothing usable is there.
    pub async fn restore(store: &dyn KeyValueStore, target: PersistTarget) -> Self {
        let items: WishlistItems = persist::restore(store, target.key()).await;
        Self {
            items,
            persist: Some(target),
        }
    }

    pub fn add_item(&mut self, product: Product) -> bool {
        let changed = self.items.add(product);
        self.persist_if(changed);
        changed
    }

    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let changed = self.items.remove(product_id);
        self.persist_if(changed);
        changed
    }

    /// Flip membership in one step. Returns `true` if the product is now saved.
    pub fn toggle_item(&mut self, product: Product) -> bool {
        let now_saved = self.items.toggle(product);
        self.persist_if(true);
        now_saved
    }

    #[must_use]
    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.items.contains(product_id)
    }

    pub fn clear_wishlist(&mut self) -> bool {
        let changed = self.items.clear();
        self.persist_if(changed);
        changed
    }

    /// Current items.
    #[must_use]
    pub const fn items(&self) -> &WishlistItems {
        &self.items
    }

    fn persist_if(&self, changed: bool) {
        if !changed {
            return;
        }
        if let Some(target) = &self.persist {
            target.save(&self.items);
        }
    }
}
