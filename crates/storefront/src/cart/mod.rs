//! Shopping cart state.
//!
//! [`CartLines`] holds the pure state transitions: line items in, line items
//! out, no I/O. [`CartStore`] wraps it and persists a snapshot after every
//! change.
//!
//! # Invariants
//!
//! - At most one line per `(product id, size)` pair.
//! - Every retained line has `quantity >= 1`.
//! - Totals are computed from the lines on demand; nothing is cached.

mod store;

pub use store::CartStore;

use serde::{Deserialize, Serialize};

use goodstock_core::{Price, Product, ProductId, Size};

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: Option<Size>,
}

/// One cart entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product snapshot taken when the line was created.
    pub product: Product,
    pub quantity: u32,
    #[serde(default)]
    pub size: Option<Size>,
}

impl CartLineItem {
    /// Whether this line is for `product_id` in `size`.
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, size: Option<&Size>) -> bool {
        self.product.id == *product_id && self.size.as_ref() == size
    }

    /// The line's identity.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product.id.clone(),
            size: self.size.clone(),
        }
    }

    /// Quantity times the captured unit price.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// A cart mutation.
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Add one unit, creating the line if needed.
    Add {
        product: Product,
        size: Option<Size>,
    },
    /// Delete a line.
    Remove {
        product_id: ProductId,
        size: Option<Size>,
    },
    /// Set a line's quantity; `<= 0` deletes it.
    SetQuantity {
        product_id: ProductId,
        size: Option<Size>,
        quantity: i64,
    },
    /// Remove one unit; the line is deleted when it reaches zero.
    Decrement {
        product_id: ProductId,
        size: Option<Size>,
    },
    /// Empty the cart.
    Clear,
}

/// Insertion-ordered cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct CartLines {
    items: Vec<CartLineItem>,
}

impl CartLines {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from arbitrary items, restoring the invariants.
    ///
    /// Zero-quantity items are dropped and duplicate keys are merged into the
    /// first occurrence (quantities summed, first snapshot kept).
    pub fn from_items(items: impl IntoIterator<Item = CartLineItem>) -> Self {
        let mut lines = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match lines.position(&item.product.id, item.size.as_ref()) {
                Some(idx) => {
                    if let Some(existing) = lines.items.get_mut(idx) {
                        existing.quantity = existing.quantity.saturating_add(item.quantity);
                    }
                }
                None => lines.items.push(item),
            }
        }
        lines
    }

    /// Apply a mutation. Returns `true` if the cart changed.
    pub fn apply(&mut self, action: CartAction) -> bool {
        match action {
            CartAction::Add { product, size } => self.add(product, size),
            CartAction::Remove { product_id, size } => self.remove(&product_id, size.as_ref()),
            CartAction::SetQuantity {
                product_id,
                size,
                quantity,
            } => self.set_quantity(&product_id, size.as_ref(), quantity),
            CartAction::Decrement { product_id, size } => {
                self.decrement(&product_id, size.as_ref())
            }
            CartAction::Clear => self.clear(),
        }
    }

    /// Add one unit of `product` in `size`.
    ///
    /// An existing line keeps its original product snapshot (and price); only
    /// its quantity grows. A line already at `u32::MAX` is left unchanged.
    pub fn add(&mut self, product: Product, size: Option<Size>) -> bool {
        match self.position(&product.id, size.as_ref()) {
            Some(idx) => self.items.get_mut(idx).is_some_and(|item| {
                let before = item.quantity;
                item.quantity = before.saturating_add(1);
                item.quantity != before
            }),
            None => {
                self.items.push(CartLineItem {
                    product,
                    quantity: 1,
                    size,
                });
                true
            }
        }
    }

    /// Delete the matching line. No-op if absent.
    pub fn remove(&mut self, product_id: &ProductId, size: Option<&Size>) -> bool {
        let before = self.items.len();
        self.items.retain(|item| !item.matches(product_id, size));
        self.items.len() != before
    }

    /// Set the quantity of the matching line.
    ///
    /// A quantity `<= 0` removes the line. Larger values are clamped to
    /// `u32::MAX`. No-op if the line is absent.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        size: Option<&Size>,
        quantity: i64,
    ) -> bool {
        if quantity <= 0 {
            return self.remove(product_id, size);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.matches(product_id, size))
        else {
            return false;
        };
        if item.quantity == quantity {
            return false;
        }
        item.quantity = quantity;
        true
    }

    /// Remove one unit from the matching line.
    pub fn decrement(&mut self, product_id: &ProductId, size: Option<&Size>) -> bool {
        let Some(current) = self.get(product_id, size).map(|item| item.quantity) else {
            return false;
        };
        self.set_quantity(product_id, size, i64::from(current) - 1)
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        changed
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// The matching line, if any.
    #[must_use]
    pub fn get(&self, product_id: &ProductId, size: Option<&Size>) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.matches(product_id, size))
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of quantity times captured unit price.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    fn position(&self, product_id: &ProductId, size: Option<&Size>) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.matches(product_id, size))
    }
}

impl From<Vec<CartLineItem>> for CartLines {
    fn from(items: Vec<CartLineItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<CartLines> for Vec<CartLineItem> {
    fn from(lines: CartLines) -> Self {
        lines.items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use goodstock_core::CategoryKey;

    use super::*;

    pub(crate) fn product(id: &str, price: u64) -> Product {
        Product {
            id: ProductId::parse(id).unwrap(),
            name: format!("Product {id}"),
            brand: "Goodstock".to_string(),
            price: Price::from_minor(price),
            category: CategoryKey::parse("sneakers").unwrap(),
            sizes: vec![Size::parse("42").unwrap(), Size::parse("43").unwrap()],
            promotion: None,
            image_url: format!("https://cdn.example.com/{id}.jpg"),
        }
    }

    fn size(s: &str) -> Size {
        Size::parse(s).unwrap()
    }

    #[test]
    fn test_repeated_add_increments_single_line() {
        let mut cart = CartLines::new();
        let a = product("a", 100_000);
        for _ in 0..7 {
            assert!(cart.add(a.clone(), Some(size("42"))));
        }
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&a.id, Some(&size("42"))).unwrap().quantity, 7);
    }

    #[test]
    fn test_sizes_are_distinct_lines() {
        let mut cart = CartLines::new();
        let a = product("a", 100_000);
        cart.add(a.clone(), Some(size("42")));
        cart.add(a.clone(), Some(size("43")));
        cart.add(a.clone(), None);
        assert_eq!(cart.len(), 3);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut cart = CartLines::new();
        cart.add(product("b", 1), None);
        cart.add(product("a", 1), None);
        cart.add(product("b", 1), None);
        let ids: Vec<_> = cart.items().iter().map(|i| i.product.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_concrete_scenario() {
        let mut cart = CartLines::new();
        let a = product("a", 100_000);

        cart.add(a.clone(), None);
        cart.add(a.clone(), None);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), Price::from_minor(200_000));

        cart.set_quantity(&a.id, None, 5);
        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), Price::from_minor(500_000));

        cart.remove(&a.id, None);
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Price::ZERO);
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let mut base = CartLines::new();
        let a = product("a", 10);
        let b = product("b", 20);
        base.add(a.clone(), Some(size("42")));
        base.add(b.clone(), None);
        base.add(a.clone(), Some(size("42")));

        let mut via_update = base.clone();
        let mut via_remove = base.clone();
        let mut via_negative = base;
        via_update.set_quantity(&a.id, Some(&size("42")), 0);
        via_remove.remove(&a.id, Some(&size("42")));
        via_negative.set_quantity(&a.id, Some(&size("42")), -3);

        assert_eq!(via_update, via_remove);
        assert_eq!(via_negative, via_remove);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = CartLines::new();
        cart.add(product("a", 10), None);
        let before = cart.clone();
        assert!(!cart.remove(&ProductId::parse("zzz").unwrap(), None));
        assert!(!cart.remove(&ProductId::parse("a").unwrap(), Some(&size("42"))));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_set_quantity_absent_is_noop() {
        let mut cart = CartLines::new();
        assert!(!cart.set_quantity(&ProductId::parse("a").unwrap(), None, 3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_clamps() {
        let mut cart = CartLines::new();
        let a = product("a", 1);
        cart.add(a.clone(), None);
        cart.set_quantity(&a.id, None, i64::MAX);
        assert_eq!(cart.get(&a.id, None).unwrap().quantity, u32::MAX);
        // Same value again reports no change
        assert!(!cart.set_quantity(&a.id, None, i64::from(u32::MAX) + 10));
    }

    #[test]
    fn test_add_at_max_quantity_reports_no_change() {
        let mut cart = CartLines::new();
        let a = product("a", 1);
        assert!(cart.add(a.clone(), None));
        cart.set_quantity(&a.id, None, i64::from(u32::MAX));

        assert!(!cart.add(a.clone(), None));
        assert_eq!(cart.get(&a.id, None).unwrap().quantity, u32::MAX);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_decrement_removes_at_zero() {
        let mut cart = CartLines::new();
        let a = product("a", 10);
        cart.add(a.clone(), None);
        cart.add(a.clone(), None);

        assert!(cart.decrement(&a.id, None));
        assert_eq!(cart.get(&a.id, None).unwrap().quantity, 1);
        assert!(cart.decrement(&a.id, None));
        assert!(cart.is_empty());
        assert!(!cart.decrement(&a.id, None));
    }

    #[test]
    fn test_price_captured_at_add_time() {
        let mut cart = CartLines::new();
        let mut a = product("a", 100);
        cart.add(a.clone(), None);

        a.price = Price::from_minor(999);
        cart.add(a, None);

        assert_eq!(cart.total_price(), Price::from_minor(200));
    }

    #[test]
    fn test_totals_match_lines() {
        let mut cart = CartLines::new();
        cart.add(product("a", 150), Some(size("42")));
        cart.add(product("b", 75), None);
        cart.set_quantity(&ProductId::parse("b").unwrap(), None, 4);

        let items: u64 = cart.items().iter().map(|i| u64::from(i.quantity)).sum();
        let price: u64 = cart
            .items()
            .iter()
            .map(|i| i.product.price.minor_units() * u64::from(i.quantity))
            .sum();
        assert_eq!(cart.total_items(), items);
        assert_eq!(cart.total_price().minor_units(), price);
        assert_eq!(price, 450);
    }

    #[test]
    fn test_clear() {
        let mut cart = CartLines::new();
        assert!(!cart.clear());
        cart.add(product("a", 10), None);
        assert!(cart.clear());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Price::ZERO);
    }

    #[test]
    fn test_apply_dispatches() {
        let mut cart = CartLines::new();
        let a = product("a", 10);
        assert!(cart.apply(CartAction::Add {
            product: a.clone(),
            size: None
        }));
        assert!(cart.apply(CartAction::SetQuantity {
            product_id: a.id.clone(),
            size: None,
            quantity: 3
        }));
        assert!(cart.apply(CartAction::Decrement {
            product_id: a.id.clone(),
            size: None
        }));
        assert_eq!(cart.total_items(), 2);
        assert!(cart.apply(CartAction::Remove {
            product_id: a.id,
            size: None
        }));
        assert!(!cart.apply(CartAction::Clear));
    }

    #[test]
    fn test_from_items_restores_invariants() {
        let a = product("a", 10);
        let items = vec![
            CartLineItem {
                product: a.clone(),
                quantity: 2,
                size: None,
            },
            CartLineItem {
                product: product("b", 5),
                quantity: 0,
                size: None,
            },
            CartLineItem {
                product: a,
                quantity: 3,
                size: None,
            },
        ];
        let cart = CartLines::from_items(items);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn test_deserialize_normalizes() {
        let a = product("a", 10);
        let raw = serde_json::to_string(&vec![
            CartLineItem {
                product: a.clone(),
                quantity: 1,
                size: None,
            },
            CartLineItem {
                product: a,
                quantity: 1,
                size: None,
            },
        ])
        .unwrap();
        let cart: CartLines = serde_json::from_str(&raw).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 2);
    }
}
