//! Catalog browsing commands.
//!
//! Each command makes a single request and prints the result as pretty JSON.

use tinycart_core::ProductId;
use tinycart_storefront::{CatalogClient, CatalogError, StorefrontConfig};
use tracing::error;

use super::print_json;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

fn client(config: &StorefrontConfig) -> Result<CatalogClient, CatalogError> {
    CatalogClient::new(&config.catalog)
}

/// Print the category list.
///
/// Failures are logged to stderr and otherwise ignored so the command always
/// exits successfully.
///
/// # Errors
///
/// Returns an error only if the result cannot be written to stdout.
pub async fn categories(config: &StorefrontConfig) -> CommandResult {
    let categories = match client(config) {
        Ok(client) => client.try_fetch_categories().await,
        Err(e) => Err(e),
    };

    match categories {
        Ok(categories) => print_json(&categories)?,
        Err(e) => error!("{e}"),
    }
    Ok(())
}

/// Print a page of products.
///
/// # Errors
///
/// Returns an error if the catalog request fails.
pub async fn products(config: &StorefrontConfig, limit: u32, skip: u32) -> CommandResult {
    let page = client(config)?.fetch_product_page(limit, skip).await?;
    print_json(&page)?;
    Ok(())
}

/// Print one product.
///
/// # Errors
///
/// Returns an error if the product does not exist or the request fails.
pub async fn product(config: &StorefrontConfig, id: ProductId) -> CommandResult {
    let product = client(config)?.fetch_product_by_id(id).await?;
    print_json(&product)?;
    Ok(())
}

/// Print products matching `query`.
///
/// # Errors
///
/// Returns an error if the catalog request fails.
pub async fn search(config: &StorefrontConfig, query: &str) -> CommandResult {
    let products = client(config)?.search_products(query).await?;
    print_json(&products)?;
    Ok(())
}

/// Print the products in `slug`.
///
/// # Errors
///
/// Returns an error if the catalog request fails.
pub async fn category(config: &StorefrontConfig, slug: &str) -> CommandResult {
    let products = client(config)?.fetch_products_by_category(slug).await?;
    print_json(&products)?;
    Ok(())
}
