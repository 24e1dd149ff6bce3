//! Phone number type for seller chat links.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains something other than digits and separators.
    #[error("phone number contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// The number starts with a trunk prefix instead of a country code.
    #[error("phone number must start with a country code, not 0")]
    MissingCountryCode,
    /// The number has too few or too many digits.
    #[error("phone number must have between {min} and {max} digits")]
    InvalidLength {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
}

/// An international phone number, stored as bare E.164 digits.
///
/// Chat links (`wa.me/<digits>`) need the number without `+`, spaces or
/// dashes, so parsing normalizes those away.
///
/// ## Constraints
///
/// - 8-15 digits after normalization (E.164 limit)
/// - Only digits, spaces, `-`, `(`, `)` and one leading `+`
/// - Must begin with a country code (a leading `0` is rejected)
///
/// ## Examples
///
/// ```
/// use goodstock_core::PhoneNumber;
///
/// let phone = PhoneNumber::parse("+62 812-3456-7890").unwrap();
/// assert_eq!(phone.digits(), "6281234567890");
///
/// assert!(PhoneNumber::parse("").is_err());             // empty
/// assert!(PhoneNumber::parse("0812345678").is_err());   // trunk prefix
/// assert!(PhoneNumber::parse("62-abc-123").is_err());   // letters
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 8;
    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Contains letters or other symbols
    /// - Starts with `0`
    /// - Has fewer than 8 or more than 15 digits
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let mut digits = String::with_capacity(body.len());
        for ch in body.chars() {
            match ch {
                '0'..='9' => digits.push(ch),
                ' ' | '-' | '(' | ')' => {}
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        if digits.starts_with('0') {
            return Err(PhoneError::MissingCountryCode);
        }

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len()) {
            return Err(PhoneError::InvalidLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(digits))
    }

    /// Returns the normalized digits.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_numbers() {
        assert!(PhoneNumber::parse("6281234567890").is_ok());
        assert!(PhoneNumber::parse("+62 812 3456 7890").is_ok());
        assert!(PhoneNumber::parse("+1 (415) 555-0100").is_ok());
    }

    #[test]
    fn test_parse_normalizes_separators() {
        let phone = PhoneNumber::parse("+62 (812) 3456-7890").unwrap();
        assert_eq!(phone.digits(), "6281234567890");
        assert_eq!(phone.to_string(), "+6281234567890");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(PhoneNumber::parse("  "), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert_eq!(
            PhoneNumber::parse("62812x4567"),
            Err(PhoneError::InvalidCharacter('x'))
        );
        // A plus sign is only accepted in front
        assert!(PhoneNumber::parse("62+8123456789").is_err());
    }

    #[test]
    fn test_parse_trunk_prefix() {
        assert_eq!(
            PhoneNumber::parse("081234567890"),
            Err(PhoneError::MissingCountryCode)
        );
    }

    #[test]
    fn test_parse_length_limits() {
        assert!(matches!(
            PhoneNumber::parse("6281"),
            Err(PhoneError::InvalidLength { .. })
        ));
        assert!(matches!(
            PhoneNumber::parse("6281234567890123"),
            Err(PhoneError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = PhoneNumber::parse("+62 812 3456 7890").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"6281234567890\"");

        let parsed: PhoneNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, phone);
    }
}
