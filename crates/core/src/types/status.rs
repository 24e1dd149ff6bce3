//! Promotional flags attached to products by the back-office.

use serde::{Deserialize, Serialize};

/// Promotional flag shown as a badge on product cards.
///
/// Set by administrators through the hosted backend; the storefront only
/// reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Promotion {
    /// Recently listed product.
    New,
    /// Top selling product.
    BestSeller,
    /// Discounted product.
    Sale,
    /// Limited stock or limited edition.
    Limited,
}

impl Promotion {
    /// Badge label for product cards.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::BestSeller => "Best Seller",
            Self::Sale => "Sale",
            Self::Limited => "Limited",
        }
    }
}

impl std::fmt::Display for Promotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::BestSeller => write!(f, "best_seller"),
            Self::Sale => write!(f, "sale"),
            Self::Limited => write!(f, "limited"),
        }
    }
}

impl std::str::FromStr for Promotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "best_seller" => Ok(Self::BestSeller),
            "sale" => Ok(Self::Sale),
            "limited" => Ok(Self::Limited),
            _ => Err(format!("invalid promotion: {s}")),
        }
    }
}
