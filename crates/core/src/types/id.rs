//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. The hosted backend
//! hands out string identifiers, so every ID wraps a validated `String`.

/// Maximum length of any identifier.
pub const MAX_ID_LENGTH: usize = 128;

/// Errors that can occur when parsing an identifier.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input is empty or whitespace only.
    #[error("{kind} cannot be empty")]
    Empty {
        /// Human readable name of the identifier type.
        kind: &'static str,
    },
    /// The input is too long.
    #[error("{kind} must be at most {max} characters")]
    TooLong {
        /// Human readable name of the identifier type.
        kind: &'static str,
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[A-Za-z0-9._:-]`.
    #[error("{kind} contains invalid character {ch:?}")]
    InvalidCharacter {
        /// Human readable name of the identifier type.
        kind: &'static str,
        /// The offending character.
        ch: char,
    },
}

/// Validate a raw identifier and return the trimmed value.
///
/// # Errors
///
/// Returns an [`IdError`] if the trimmed input is empty, longer than
/// [`MAX_ID_LENGTH`], or contains characters other than ASCII alphanumerics,
/// `-`, `_`, `.` and `:`.
pub fn validate_id<'a>(kind: &'static str, raw: &'a str) -> Result<&'a str, IdError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(IdError::Empty { kind });
    }
    if value.len() > MAX_ID_LENGTH {
        return Err(IdError::TooLong {
            kind,
            max: MAX_ID_LENGTH,
        });
    }
    if let Some(ch) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')))
    {
        return Err(IdError::InvalidCharacter { kind, ch });
    }
    Ok(value)
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` that validate on the way in
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `parse()`, `as_str()`
/// - `FromStr`, `TryFrom<String>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use goodstock_core::define_id;
/// define_id!(OrderId, "order id");
/// define_id!(InvoiceId, "invoice id");
///
/// let order_id = OrderId::parse("ord-1").unwrap();
/// assert_eq!(order_id.as_str(), "ord-1");
/// assert!(OrderId::parse("   ").is_err());
///
/// // These are different types, so this won't compile:
/// // let _: InvoiceId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $kind:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse and validate an ID from a string.
            ///
            /// # Errors
            ///
            /// Returns an `IdError` if the value is not a valid identifier.
            pub fn parse(raw: &str) -> ::core::result::Result<Self, $crate::IdError> {
                $crate::types::id::validate_id($kind, raw).map(|value| Self(value.to_owned()))
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::core::convert::TryFrom<String> for $name {
            type Error = $crate::IdError;

            fn try_from(value: String) -> ::core::result::Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId, "product id");
define_id!(CategoryKey, "category key");
define_id!(ShopperId, "shopper id");
