//! Persisting wrapper around [`CartLines`].

use goodstock_core::{Price, Product, ProductId, Size};

use super::{CartAction, CartLines};
use crate::persist::{self, KeyValueStore, PersistTarget};

/// A shopper's cart.
///
/// Every mutation is applied synchronously, then a snapshot is handed to the
/// persist queue if the cart changed. Persistence failures never undo the
/// mutation.
#[derive(Debug, Default)]
pub struct CartStore {
    lines: CartLines,
    persist: Option<PersistTarget>,
}

impl CartStore {
    /// A cart that is never persisted.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Restore a cart from `store`, starting empty if nothing usable is there.
    pub async fn restore(store: &dyn KeyValueStore, target: PersistTarget) -> Self {
        let lines: CartLines = persist::restore(store, target.key()).await;
        Self {
            lines,
            persist: Some(target),
        }
    }

    /// Apply a mutation. Returns `true` if the cart changed.
    pub fn dispatch(&mut self, action: CartAction) -> bool {
        let changed = self.lines.apply(action);
        if changed {
            if let Some(target) = &self.persist {
                target.save(&self.lines);
            }
        }
        changed
    }

    pub fn add_item(&mut self, product: Product, size: Option<Size>) -> bool {
        self.dispatch(CartAction::Add { product, size })
    }

    pub fn remove_item(&mut self, product_id: &ProductId, size: Option<&Size>) -> bool {
        self.dispatch(CartAction::Remove {
            product_id: product_id.clone(),
            size: size.cloned(),
        })
    }

    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        size: Option<&Size>,
        quantity: i64,
    ) -> bool {
        self.dispatch(CartAction::SetQuantity {
            product_id: product_id.clone(),
            size: size.cloned(),
            quantity,
        })
    }

    pub fn decrement_item(&mut self, product_id: &ProductId, size: Option<&Size>) -> bool {
        self.dispatch(CartAction::Decrement {
            product_id: product_id.clone(),
            size: size.cloned(),
        })
    }

    pub fn clear_cart(&mut self) -> bool {
        self.dispatch(CartAction::Clear)
    }

    /// Current lines.
    #[must_use]
    pub const fn lines(&self) -> &CartLines {
        &self.lines
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.total_items()
    }

    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines.total_price()
    }
}
