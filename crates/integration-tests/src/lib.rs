//! Integration tests for tinycart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tinycart-integration-tests
//! ```
//!
//! The tests run against an in-process `httpmock` server standing in for the
//! catalog service and a temporary directory standing in for local storage,
//! so they need no network access.
//!
//! This library holds the shared fixtures.

use httpmock::MockServer;
use serde_json::{Value, json};
use tinycart_storefront::{CatalogClient, CatalogConfig, FileStorage, SessionStore};

/// Catalog JSON for a product with the given id and price.
#[must_use]
pub fn product_json(id: i64, title: &str, price: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{title} description"),
        "category": "groceries",
        "price": price,
        "discountPercentage": 5.0,
        "rating": 4.2,
        "stock": 40,
        "tags": ["groceries"],
        "thumbnail": format!("https://cdn.dummyjson.com/products/{id}/thumbnail.png"),
        "images": [format!("https://cdn.dummyjson.com/products/{id}/1.png")]
    })
}

/// A catalog client pointed at `server`.
///
/// # Panics
///
/// Panics if the mock server URL is rejected, which would be a fixture bug.
#[must_use]
pub fn client_for(server: &MockServer) -> CatalogClient {
    let config = CatalogConfig::with_base_url(&server.base_url()).expect("mock server URL");
    CatalogClient::new(&config).expect("catalog client")
}

/// Open a file-backed session in `dir`.
///
/// # Panics
///
/// Panics if the directory cannot be created.
#[must_use]
pub fn session_in(dir: &std::path::Path) -> SessionStore<FileStorage> {
    SessionStore::hydrate(FileStorage::open(dir).expect("storage dir"))
}
