//! Product catalog REST client.
//!
//! # Architecture
//!
//! - Read-only `GET` requests against a DummyJSON-compatible service
//! - The catalog service is the source of truth; nothing is cached locally
//! - Every call is independent and returns `Result<_, CatalogError>`; failures
//!   are logged before being handed back to the caller
//!
//! # Example
//!
//! ```rust,ignore
//! use tinycart_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//!
//! let products = client.fetch_products(20, 0).await?;
//! let phone = client.fetch_product_by_id(ProductId::new(121)).await?;
//! let categories = client.fetch_categories().await;
//! ```

mod client;
pub mod types;

pub use client::CatalogClient;
pub use types::{CategoryEntry, ProductPage};

use thiserror::Error;

/// Errors that can occur when talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A category listing entry had neither a slug nor a name.
    #[error("Unrecognized category entry: {0}")]
    UnrecognizedCategory(String),

    /// Endpoint URL could not be built from the configured base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl CatalogError {
    /// Whether the error means the resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
