//! Derived views.
//!
//! Everything here is a pure function of store and catalog state. Nothing is
//! cached: badges and totals are recomputed on every call so they can never
//! drift from the store they describe.

use rust_decimal::Decimal;
use serde::Serialize;

use goodstock_core::{CategoryKey, CurrencyCode, Price, Product};

use crate::cart::{CartLineItem, CartLines};
use crate::catalog::{Catalog, CategoryEntry};
use crate::wishlist::WishlistItems;

/// Largest count a badge shows before switching to `99+`.
pub const BADGE_MAX: u64 = 99;

/// Badge shown on the cart or wishlist icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub count: u64,
    pub label: String,
    pub visible: bool,
}

impl Badge {
    #[must_use]
    pub fn new(count: u64) -> Self {
        let label = if count > BADGE_MAX {
            format!("{BADGE_MAX}+")
        } else {
            count.to_string()
        };
        Self {
            count,
            label,
            visible: count > 0,
        }
    }
}

/// Cart badge: total quantity across all lines.
#[must_use]
pub fn cart_badge(lines: &CartLines) -> Badge {
    Badge::new(lines.total_items())
}

/// Wishlist badge: number of saved products.
#[must_use]
pub fn wishlist_badge(wishlist: &WishlistItems) -> Badge {
    Badge::new(u64::try_from(wishlist.len()).unwrap_or(u64::MAX))
}

/// A price both as display text and as a major-unit decimal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceView {
    pub formatted: String,
    pub amount: Decimal,
    pub currency: &'static str,
}

impl PriceView {
    #[must_use]
    pub fn new(price: Price, currency: CurrencyCode) -> Self {
        Self {
            formatted: currency.format(price),
            amount: price.to_decimal(currency),
            currency: currency.code(),
        }
    }
}

/// One cart line for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub brand: String,
    pub image_url: String,
    pub size: Option<String>,
    pub quantity: u32,
    pub unit_price: PriceView,
    pub line_total: PriceView,
}

impl CartItemView {
    fn new(item: &CartLineItem, currency: CurrencyCode) -> Self {
        Self {
            product_id: item.product.id.to_string(),
            name: item.product.name.clone(),
            brand: item.product.brand.clone(),
            image_url: item.product.image_url.clone(),
            size: item.size.as_ref().map(ToString::to_string),
            quantity: item.quantity,
            unit_price: PriceView::new(item.product.price, currency),
            line_total: PriceView::new(item.line_total(), currency),
        }
    }
}

/// Cart contents for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub subtotal: PriceView,
    pub is_empty: bool,
}

#[must_use]
pub fn cart_view(lines: &CartLines, currency: CurrencyCode) -> CartView {
    CartView {
        items: lines
            .items()
            .iter()
            .map(|item| CartItemView::new(item, currency))
            .collect(),
        item_count: lines.total_items(),
        subtotal: PriceView::new(lines.total_price(), currency),
        is_empty: lines.is_empty(),
    }
}

/// A product card, as shown in listings and the wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    pub product_id: String,
    pub name: String,
    pub brand: String,
    pub image_url: String,
    pub price: PriceView,
    pub category: String,
    pub sizes: Vec<String>,
    pub promotion: Option<&'static str>,
    pub in_wishlist: bool,
}

impl ProductCard {
    #[must_use]
    pub fn new(product: &Product, currency: CurrencyCode, wishlist: &WishlistItems) -> Self {
        Self {
            product_id: product.id.to_string(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            image_url: product.image_url.clone(),
            price: PriceView::new(product.price, currency),
            category: product.category.to_string(),
            sizes: product.sizes.iter().map(ToString::to_string).collect(),
            promotion: product.promotion.map(|promotion| promotion.label()),
            in_wishlist: wishlist.contains(&product.id),
        }
    }
}

/// Wishlist contents for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WishlistView {
    pub items: Vec<ProductCard>,
    pub count: usize,
    pub is_empty: bool,
}

#[must_use]
pub fn wishlist_view(wishlist: &WishlistItems, currency: CurrencyCode) -> WishlistView {
    WishlistView {
        items: wishlist
            .items()
            .iter()
            .map(|product| ProductCard::new(product, currency, wishlist))
            .collect(),
        count: wishlist.len(),
        is_empty: wishlist.is_empty(),
    }
}

/// Storefront path for a category page.
#[must_use]
pub fn category_href(key: &CategoryKey) -> String {
    format!("/category/{key}")
}

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub key: String,
    pub name: String,
    pub href: String,
    pub active: bool,
}

/// Category navigation with the current category highlighted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavView {
    pub items: Vec<NavItem>,
    pub active: Option<String>,
}

/// Build navigation, highlighting `active` if it names a known category.
#[must_use]
pub fn nav_view(catalog: &Catalog, active: Option<&CategoryKey>) -> NavView {
    let items: Vec<NavItem> = catalog
        .list()
        .iter()
        .map(|entry| NavItem {
            key: entry.key.to_string(),
            name: entry.name.clone(),
            href: category_href(&entry.key),
            active: active == Some(&entry.key),
        })
        .collect();
    let active = items
        .iter()
        .find(|item| item.active)
        .map(|item| item.key.clone());
    NavView { items, active }
}

/// One tile of the category grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTile {
    pub key: String,
    pub name: String,
    pub image_url: String,
    pub href: String,
    pub subcategories: Vec<String>,
}

impl From<&CategoryEntry> for CategoryTile {
    fn from(entry: &CategoryEntry) -> Self {
        Self {
            key: entry.key.to_string(),
            name: entry.name.clone(),
            image_url: entry.image_url.clone(),
            href: category_href(&entry.key),
            subcategories: entry.subcategories.clone(),
        }
    }
}

/// Category grid in catalog order.
#[must_use]
pub fn category_grid(catalog: &Catalog) -> Vec<CategoryTile> {
    catalog.list().iter().map(CategoryTile::from).collect()
}
