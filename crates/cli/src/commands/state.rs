//! Persisted shopper state commands.

use std::path::Path;

use tracing::{info, warn};

use goodstock_core::{CurrencyCode, ShopperId, Size};
use goodstock_storefront::cart::CartLines;
use goodstock_storefront::persist::{
    self, BlobKind, FileStore, KEY_PREFIX, KeyValueStore, PersistError, parse_storage_key,
    storage_key,
};
use goodstock_storefront::wishlist::WishlistItems;

/// Outcome of a repair run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RepairReport {
    /// Cart and wishlist blobs examined.
    pub scanned: usize,
    /// Blobs removed because they could not be read.
    pub removed: usize,
}

/// Log a shopper's cart lines, totals and wishlist.
///
/// Unreadable blobs show up as empty, the same way the storefront sees them.
///
/// # Errors
///
/// Returns an error if the shopper id is invalid or the data directory
/// cannot be opened.
pub async fn inspect(data_dir: &Path, shopper: &str) -> Result<(), Box<dyn std::error::Error>> {
    let shopper = ShopperId::parse(shopper)?;
    let store = FileStore::open(data_dir).await?;
    let currency = currency_from_env();

    let cart: CartLines = persist::restore(&store, &storage_key(BlobKind::Cart, &shopper)).await;
    for item in cart.items() {
        info!(
            product_id = %item.product.id,
            name = %item.product.name,
            size = item.size.as_ref().map_or("-", Size::as_str),
            quantity = item.quantity,
            line_total = %currency.format(item.line_total()),
            "Cart line"
        );
    }
    info!(
        shopper_id = %shopper,
        total_items = cart.total_items(),
        total_price = %currency.format(cart.total_price()),
        "Cart"
    );

    let wishlist: WishlistItems =
        persist::restore(&store, &storage_key(BlobKind::Wishlist, &shopper)).await;
    for product in wishlist.items() {
        info!(product_id = %product.id, name = %product.name, "Wishlist item");
    }
    info!(shopper_id = %shopper, items = wishlist.len(), "Wishlist");
    Ok(())
}

/// Remove a shopper's cart and wishlist blobs.
///
/// # Errors
///
/// Returns an error if the shopper id is invalid or a blob cannot be removed.
pub async fn purge(data_dir: &Path, shopper: &str) -> Result<(), Box<dyn std::error::Error>> {
    let shopper = ShopperId::parse(shopper)?;
    let store = FileStore::open(data_dir).await?;

    for kind in [BlobKind::Cart, BlobKind::Wishlist] {
        store.remove(&storage_key(kind, &shopper)).await?;
    }
    info!(shopper_id = %shopper, "Shopper state purged");
    Ok(())
}

/// Remove every cart or wishlist blob the storefront would discard.
///
/// # Errors
///
/// Returns an error if the data directory cannot be read or a blob cannot
/// be removed.
pub async fn repair(data_dir: &Path) -> Result<RepairReport, PersistError> {
    let store = FileStore::open(data_dir).await?;
    let report = repair_store(&store).await?;
    info!(
        data_dir = %data_dir.display(),
        scanned = report.scanned,
        removed = report.removed,
        "Repair finished"
    );
    Ok(report)
}

async fn repair_store(store: &dyn KeyValueStore) -> Result<RepairReport, PersistError> {
    let mut report = RepairReport::default();

    for key in store.keys(KEY_PREFIX).await? {
        // Session records and foreign keys are left alone
        let Some((kind, shopper)) = parse_storage_key(&key) else {
            continue;
        };
        let Some(bytes) = store.get(&key).await? else {
            continue;
        };
        report.scanned += 1;

        let readable = match kind {
            BlobKind::Cart => persist::decode::<CartLines>(&bytes).map(|_| ()),
            BlobKind::Wishlist => persist::decode::<WishlistItems>(&bytes).map(|_| ()),
        };
        if let Err(e) = readable {
            warn!(shopper_id = %shopper, kind = kind.as_str(), error = %e, "Removing unreadable blob");
            store.remove(&key).await?;
            report.removed += 1;
        }
    }

    Ok(report)
}

fn currency_from_env() -> CurrencyCode {
    std::env::var("STOREFRONT_CURRENCY")
        .ok()
        .and_then(|code| code.parse().ok())
        .unwrap_or_default()
}
