//! tinycart core - shared domain types.
//!
//! This crate provides the types used across all tinycart components:
//! - `storefront` - Catalog client and the session/cart store
//! - `cli` - Command-line frontend over the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, and the product/cart/user records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
