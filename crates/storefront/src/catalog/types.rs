//! Response envelopes for the catalog REST API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tinycart_core::Product;

use super::CatalogError;

/// A page of products with the service's pagination metadata.
///
/// Listing, search, and category endpoints all answer with this envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products on this page.
    pub products: Vec<Product>,
    /// Total matching products across all pages.
    #[serde(default)]
    pub total: u64,
    /// Offset of the first product on this page.
    #[serde(default)]
    pub skip: u64,
    /// Requested page size.
    #[serde(default)]
    pub limit: u64,
}

impl ProductPage {
    /// Whether more products exist past this page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.skip.saturating_add(self.products.len() as u64) < self.total
    }
}

/// One element of a category listing.
///
/// The service has two listing endpoints: one answers with bare slugs, the
/// other with objects carrying `slug`, `name`, and `url`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CategoryEntry {
    /// A bare category identifier.
    Slug(String),
    /// A category object.
    Object(Map<String, Value>),
}

impl CategoryEntry {
    /// Reduce the entry to its identifier: the string itself, or an object's
    /// `slug`, falling back to its `name`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnrecognizedCategory` for an object with neither
    /// a non-empty `slug` nor a non-empty `name`.
    pub fn into_slug(self) -> Result<String, CatalogError> {
        match self {
            Self::Slug(slug) => Ok(slug),
            Self::Object(mut fields) => {
                for key in ["slug", "name"] {
                    if let Some(Value::String(value)) = fields.remove(key)
                        && !value.is_empty()
                    {
                        return Ok(value);
                    }
                }
                Err(CatalogError::UnrecognizedCategory(
                    Value::Object(fields).to_string(),
                ))
            }
        }
    }
}
