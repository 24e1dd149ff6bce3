//! Core types for Goodstock-X.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod phone;
pub mod price;
pub mod product;
pub mod status;

pub use id::{CategoryKey, IdError, MAX_ID_LENGTH, ProductId, ShopperId};
pub use phone::{PhoneError, PhoneNumber};
pub use price::{CurrencyCode, Price, PriceError};
pub use product::{Product, Size, SizeError};
pub use status::Promotion;
