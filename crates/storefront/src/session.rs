//! Per-shopper state.
//!
//! A [`ShopperSession`] bundles one shopper's cart, wishlist and floating
//! summary. It is opened by restoring both blobs from the key-value store and
//! closed by flushing pending writes. Cart mutations go through the session
//! so the summary always sees the item count before and after.

use std::time::Duration;

use goodstock_core::{Product, ProductId, ShopperId, Size};

use crate::cart::CartStore;
use crate::persist::{
    BlobKind, KeyValueStore, PersistError, PersistQueue, PersistTarget, storage_key,
};
use crate::summary::FloatingSummary;
use crate::wishlist::WishlistStore;

/// One shopper's cart, wishlist and summary timer.
#[derive(Debug)]
pub struct ShopperSession {
    shopper: ShopperId,
    cart: CartStore,
    wishlist: WishlistStore,
    summary: FloatingSummary,
    queue: Option<PersistQueue>,
}

impl ShopperSession {
    /// Restore a shopper's state. Unreadable blobs start empty.
    pub async fn open(
        shopper: ShopperId,
        store: &dyn KeyValueStore,
        queue: &PersistQueue,
        summary_duration: Duration,
    ) -> Self {
        let cart_target = PersistTarget::new(storage_key(BlobKind::Cart, &shopper), queue.clone());
        let wishlist_target =
            PersistTarget::new(storage_key(BlobKind::Wishlist, &shopper), queue.clone());

        let cart = CartStore::restore(store, cart_target).await;
        let wishlist = WishlistStore::restore(store, wishlist_target).await;
        tracing::debug!(
            shopper_id = %shopper,
            cart_lines = cart.lines().len(),
            wishlist_items = wishlist.items().len(),
            "Opened shopper session"
        );

        Self {
            shopper,
            cart,
            wishlist,
            summary: FloatingSummary::new(summary_duration),
            queue: Some(queue.clone()),
        }
    }

    /// A session that is never persisted.
    #[must_use]
    pub fn in_memory(shopper: ShopperId, summary_duration: Duration) -> Self {
        Self {
            shopper,
            cart: CartStore::in_memory(),
            wishlist: WishlistStore::in_memory(),
            summary: FloatingSummary::new(summary_duration),
            queue: None,
        }
    }

    #[must_use]
    pub const fn shopper(&self) -> &ShopperId {
        &self.shopper
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    /// Wishlist mutations need no coordination with the summary.
    pub const fn wishlist_mut(&mut self) -> &mut WishlistStore {
        &mut self.wishlist
    }

    #[must_use]
    pub const fn summary(&self) -> &FloatingSummary {
        &self.summary
    }

    pub fn dismiss_summary(&mut self) {
        self.summary.dismiss();
    }

    pub fn add_to_cart(&mut self, product: Product, size: Option<Size>) -> bool {
        self.with_cart(|cart| cart.add_item(product, size))
    }

    pub fn remove_from_cart(&mut self, product_id: &ProductId, size: Option<&Size>) -> bool {
        self.with_cart(|cart| cart.remove_item(product_id, size))
    }

    pub fn update_cart_quantity(
        &mut self,
        product_id: &ProductId,
        size: Option<&Size>,
        quantity: i64,
    ) -> bool {
        self.with_cart(|cart| cart.update_quantity(product_id, size, quantity))
    }

    pub fn decrement_cart_item(&mut self, product_id: &ProductId, size: Option<&Size>) -> bool {
        self.with_cart(|cart| cart.decrement_item(product_id, size))
    }

    pub fn clear_cart(&mut self) -> bool {
        self.with_cart(CartStore::clear_cart)
    }

    fn with_cart(&mut self, mutate: impl FnOnce(&mut CartStore) -> bool) -> bool {
        let before = self.cart.total_items();
        let changed = mutate(&mut self.cart);
        if changed {
            self.summary.on_cart_change(before, self.cart.total_items());
        }
        changed
    }

    /// Cancel the summary timer and wait for pending writes.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::QueueClosed` if the writer task has stopped.
    pub async fn close(&mut self) -> Result<(), PersistError> {
        self.summary.dismiss();
        match &self.queue {
            Some(queue) => queue.flush().await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cart::tests::product;
    use crate::persist::MemoryStore;

    fn shopper() -> ShopperId {
        ShopperId::parse("9b2f6c1e-5d4a-4e8b-a0c3-1f2e3d4c5b6a").unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_cart_changes_drive_summary() {
        let mut session = ShopperSession::in_memory(shopper(), Duration::from_secs(4));
        let a = product("a", 100_000);

        session.add_to_cart(a.clone(), None);
        assert!(session.summary().is_visible());

        session.dismiss_summary();
        session.decrement_cart_item(&a.id, None);
        assert!(!session.summary().is_visible());

        session.add_to_cart(a.clone(), None);
        session.add_to_cart(a.clone(), None);
        assert!(session.summary().is_visible());

        // Lowering the quantity leaves the summary as it was
        session.update_cart_quantity(&a.id, None, 1);
        assert!(session.summary().is_visible());

        session.clear_cart();
        assert!(!session.summary().is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_noop_mutation_does_not_show_summary() {
        let mut session = ShopperSession::in_memory(shopper(), Duration::from_secs(4));
        assert!(!session.remove_from_cart(&ProductId::parse("x").unwrap(), None));
        assert!(!session.summary().is_visible());
    }

    #[tokio::test]
    async fn test_close_flushes_and_reopen_restores() {
        let store = Arc::new(MemoryStore::new());
        let (queue, _handle) = PersistQueue::spawn(store.clone());

        let mut session =
            ShopperSession::open(shopper(), store.as_ref(), &queue, Duration::from_secs(4)).await;
        let a = product("a", 100_000);
        let b = product("b", 250_000);
        session.add_to_cart(a.clone(), Some(Size::parse("42").unwrap()));
        session.wishlist_mut().toggle_item(b.clone());
        session.close().await.unwrap();
        assert!(!session.summary().is_visible());
        drop(session);

        let reopened =
            ShopperSession::open(shopper(), store.as_ref(), &queue, Duration::from_secs(4)).await;
        assert_eq!(reopened.cart().total_items(), 1);
        assert!(reopened.wishlist().is_in_wishlist(&b.id));
        assert!(!reopened.summary().is_visible());
    }

    #[tokio::test]
    async fn test_shoppers_are_isolated() {
        let store = Arc::new(MemoryStore::new());
        let (queue, _handle) = PersistQueue::spawn(store.clone());
        let other = ShopperId::parse("other-shopper").unwrap();

        let mut first =
            ShopperSession::open(shopper(), store.as_ref(), &queue, Duration::from_secs(4)).await;
        first.add_to_cart(product("a", 1), None);
        first.close().await.unwrap();

        let second =
            ShopperSession::open(other, store.as_ref(), &queue, Duration::from_secs(4)).await;
        assert_eq!(second.cart().total_items(), 0);
    }
}
