//! Seller chat links.
//!
//! The storefront has no checkout: shoppers send the seller a prefilled
//! WhatsApp message, either asking about one product or listing their cart.

use serde::Serialize;

use goodstock_core::{CurrencyCode, PhoneNumber, Product, Size};

use crate::cart::CartLines;
use crate::format::render_template;

/// Base URL for WhatsApp click-to-chat links.
pub const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// Message sent when asking about a single product.
pub const PRODUCT_INQUIRY_TEMPLATE: &str = "Hi Goodstock-X! I'm interested in {name} by {brand}{size} ({price}). Is it still available?";

/// Message sent to order the whole cart.
pub const CART_ORDER_TEMPLATE: &str =
    "Hi Goodstock-X! I'd like to order:\n{lines}\nTotal: {total}";

const CART_LINE_TEMPLATE: &str = "- {quantity}x {name}{size} @ {unit_price} = {line_total}";

/// A prefilled chat link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatLink {
    pub url: String,
    pub message: String,
}

impl ChatLink {
    /// Link to `phone` with `message` prefilled.
    #[must_use]
    pub fn new(phone: &PhoneNumber, message: String) -> Self {
        let url = format!(
            "{WHATSAPP_BASE_URL}/{}?text={}",
            phone.digits(),
            urlencoding::encode(&message)
        );
        Self { url, message }
    }
}

fn size_note(size: Option<&Size>) -> String {
    size.map(|size| format!(" (size {size})")).unwrap_or_default()
}

/// Inquiry about one product, optionally in a chosen size.
#[must_use]
pub fn product_inquiry(product: &Product, size: Option<&Size>, currency: CurrencyCode) -> String {
    render_template(
        PRODUCT_INQUIRY_TEMPLATE,
        &[
            ("name", &product.name),
            ("brand", &product.brand),
            ("size", &size_note(size)),
            ("price", &currency.format(product.price)),
        ],
    )
}

/// Order message listing every cart line and the total.
///
/// Returns `None` for an empty cart.
#[must_use]
pub fn cart_order(lines: &CartLines, currency: CurrencyCode) -> Option<String> {
    if lines.is_empty() {
        return None;
    }

    let body = lines
        .items()
        .iter()
        .map(|item| {
            render_template(
                CART_LINE_TEMPLATE,
                &[
                    ("quantity", &item.quantity.to_string()),
                    ("name", &item.product.name),
                    ("size", &size_note(item.size.as_ref())),
                    ("unit_price", &currency.format(item.product.price)),
                    ("line_total", &currency.format(item.line_total())),
                ],
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Some(render_template(
        CART_ORDER_TEMPLATE,
        &[
            ("lines", &body),
            ("total", &currency.format(lines.total_price())),
        ],
    ))
}
