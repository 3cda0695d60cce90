//! Core types for tinycart.
//!
//! This module provides type-safe wrappers for common domain concepts and the
//! records exchanged with the catalog service.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod user;

pub use cart::CartItem;
pub use id::*;
pub use price::Price;
pub use product::Product;
pub use user::{SessionToken, User};
