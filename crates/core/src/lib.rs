//! Goodstock-X Core - Shared types library.
//!
//! This crate provides common types used across all Goodstock-X components:
//! - `storefront` - Cart, wishlist, catalog and the public HTTP surface
//! - `cli` - Maintenance tools for persisted state and the product backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, sizes, phone numbers and products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
