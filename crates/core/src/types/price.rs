//! Type-safe price representation in the smallest currency unit.
//!
//! Prices are stored as unsigned integers of minor units (sen for IDR is not
//! used in practice, so a rupiah price of `100000` is "Rp 100.000"). The
//! storefront runs in a single currency; [`CurrencyCode`] carries the
//! presentation rules for it.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing currency values.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The currency code is not supported by the storefront.
    #[error("unsupported currency code: {0}")]
    UnknownCurrency(String),
}

/// A price in the smallest currency unit.
///
/// Arithmetic saturates at `u64::MAX` instead of wrapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(0);

    /// Create a price from an amount of minor units.
    #[must_use]
    pub const fn from_minor(amount: u64) -> Self {
        Self(amount)
    }

    /// Amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> u64 {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    /// Amount in the currency's standard unit (e.g. dollars, not cents).
    #[must_use]
    pub fn to_decimal(self, currency: CurrencyCode) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.0), currency.minor_digits())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

/// ISO 4217 currency codes supported by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    IDR,
    USD,
    EUR,
    GBP,
    SGD,
}

impl CurrencyCode {
    /// Display symbol placed before the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::IDR => "Rp",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::SGD => "S$",
        }
    }

    /// ISO code as a string.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::IDR => "IDR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::SGD => "SGD",
        }
    }

    /// Number of minor-unit digits shown after the decimal separator.
    #[must_use]
    pub const fn minor_digits(self) -> u32 {
        match self {
            Self::IDR => 0,
            Self::USD | Self::EUR | Self::GBP | Self::SGD => 2,
        }
    }

    const fn separators(self) -> (char, char) {
        // (thousands, decimal)
        match self {
            Self::IDR | Self::EUR => ('.', ','),
            Self::USD | Self::GBP | Self::SGD => (',', '.'),
        }
    }

    /// Format a price for display, e.g. `Rp 100.000` or `$1,234.50`.
    #[must_use]
    pub fn format(self, price: Price) -> String {
        let (thousands, decimal) = self.separators();
        let scale = 10_u64.pow(self.minor_digits());
        let major = price.minor_units() / scale;
        let minor = price.minor_units() % scale;

        let mut out = String::from(self.symbol());
        if matches!(self, Self::IDR) {
            out.push(' ');
        }
        out.push_str(&group_digits(major, thousands));
        if self.minor_digits() > 0 {
            out.push(decimal);
            out.push_str(&format!(
                "{minor:0width$}",
                width = self.minor_digits() as usize
            ));
        }
        out
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IDR" => Ok(Self::IDR),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "SGD" => Ok(Self::SGD),
            _ => Err(PriceError::UnknownCurrency(s.to_owned())),
        }
    }
}

/// Insert a separator between every group of three digits.
fn group_digits(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rupiah() {
        assert_eq!(CurrencyCode::IDR.format(Price::from_minor(100_000)), "Rp 100.000");
        assert_eq!(CurrencyCode::IDR.format(Price::from_minor(0)), "Rp 0");
        assert_eq!(
            CurrencyCode::IDR.format(Price::from_minor(1_250_000)),
            "Rp 1.250.000"
        );
    }

    #[test]
    fn test_format_two_decimal_currencies() {
        assert_eq!(CurrencyCode::USD.format(Price::from_minor(123_450)), "$1,234.50");
        assert_eq!(CurrencyCode::USD.format(Price::from_minor(5)), "$0.05");
        assert_eq!(CurrencyCode::EUR.format(Price::from_minor(99_999)), "€999,99");
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(999, ','), "999");
        assert_eq!(group_digits(1000, ','), "1,000");
        assert_eq!(group_digits(12_345_678, '.'), "12.345.678");
    }

    #[test]
    fn test_times_and_sum() {
        let unit = Price::from_minor(100_000);
        assert_eq!(unit.times(5), Price::from_minor(500_000));
        let total: Price = [unit, unit.times(2)].into_iter().sum();
        assert_eq!(total.minor_units(), 300_000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Price::from_minor(u64::MAX);
        assert_eq!(max + Price::from_minor(1), max);
        assert_eq!(max.times(2), max);
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(
            Price::from_minor(123_450).to_decimal(CurrencyCode::USD).to_string(),
            "1234.50"
        );
        assert_eq!(
            Price::from_minor(100_000).to_decimal(CurrencyCode::IDR).to_string(),
            "100000"
        );
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("idr".parse::<CurrencyCode>().unwrap(), CurrencyCode::IDR);
        assert_eq!(" USD ".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert!(matches!(
            "XYZ".parse::<CurrencyCode>(),
            Err(PriceError::UnknownCurrency(_))
        ));
    }
}
