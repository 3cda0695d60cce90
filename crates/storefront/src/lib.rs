//! tinycart storefront library.
//!
//! Client-side pieces of the shop:
//! - [`catalog`] - async client for the product catalog REST service
//! - [`store`] - the session (cart + logged-in user) mirrored to local storage
//! - [`config`] - environment-driven configuration for both
//!
//! The catalog client and the session store are independent; frontends call
//! the one to list products and the other to act on user input.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod store;

pub use catalog::{CatalogClient, CatalogError};
pub use config::{CatalogConfig, ConfigError, StorefrontConfig};
pub use store::{FileStorage, LocalStorage, MemoryStorage, SessionStore, StorageError};
