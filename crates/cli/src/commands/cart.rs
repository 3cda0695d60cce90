//! Cart commands over the file-backed session.

use std::fmt::Write as _;

use tinycart_core::{CartItem, ProductId};
use tinycart_storefront::{CatalogClient, LocalStorage, SessionStore, StorefrontConfig};
use tracing::info;

use super::open_session;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Print cart lines and totals.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be opened.
#[allow(clippy::print_stdout)]
pub fn show(config: &StorefrontConfig) -> CommandResult {
    let session = open_session(config)?;
    print!("{}", render(&session));
    Ok(())
}

/// Fetch product `id` from the catalog and add one unit to the cart.
///
/// # Errors
///
/// Returns an error if the product cannot be fetched or storage cannot be
/// opened.
pub async fn add(config: &StorefrontConfig, id: ProductId) -> CommandResult {
    let mut session = open_session(config)?;
    let product = CatalogClient::new(&config.catalog)?
        .fetch_product_by_id(id)
        .await?;

    session.add_to_cart(&product);
    info!(
        product_id = %id,
        items = session.cart_count(),
        total = %session.cart_total(),
        "Added {} to cart",
        product.title
    );
    Ok(())
}

/// Remove product `id` from the cart.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be opened.
pub fn remove(config: &StorefrontConfig, id: ProductId) -> CommandResult {
    let mut session = open_session(config)?;
    if !session.contains(id) {
        info!(product_id = %id, "Product is not in the cart");
    }
    session.remove_from_cart(id);
    Ok(())
}

/// Set the quantity of product `id`.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be opened.
pub fn update(config: &StorefrontConfig, id: ProductId, quantity: i64) -> CommandResult {
    let mut session = open_session(config)?;
    if !session.contains(id) {
        info!(product_id = %id, "Product is not in the cart");
    }
    session.update_quantity(id, quantity);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be opened.
pub fn clear(config: &StorefrontConfig) -> CommandResult {
    open_session(config)?.clear_cart();
    Ok(())
}

/// Render the cart as a plain-text listing.
fn render<S: LocalStorage>(session: &SessionStore<S>) -> String {
    if session.cart().is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in session.cart() {
        let _ = writeln!(out, "{}", render_line(item));
    }
    let _ = writeln!(
        out,
        "{} item(s), total {}",
        session.cart_count(),
        session.cart_total()
    );
    out
}

fn render_line(item: &CartItem) -> String {
    format!(
        "#{:<5} {:>3} x {} @ {} = {}",
        item.id().as_i64(),
        item.quantity,
        item.product.title,
        item.product.price,
        item.line_total()
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;
    use tinycart_core::Product;
    use tinycart_storefront::MemoryStorage;

    use super::*;

    fn product(id: i64, price: f64) -> Product {
        serde_json::from_value(json!({"id": id, "title": format!("Item {id}"), "price": price}))
            .unwrap()
    }

    #[test]
    fn test_render_empty() {
        let session = SessionStore::hydrate(MemoryStorage::new());
        assert_eq!(render(&session), "Cart is empty\n");
    }

    #[test]
    fn test_render_lines_and_totals() {
        let mut session = SessionStore::hydrate(MemoryStorage::new());
        session.add_to_cart(&product(1, 10.0));
        session.add_to_cart(&product(1, 10.0));
        session.add_to_cart(&product(2, 2.5));

        let text = render(&session);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("2 x Item 1 @ $10.00 = $20.00"));
        assert!(lines[1].contains("1 x Item 2 @ $2.50 = $2.50"));
        assert_eq!(lines[2], "3 item(s), total $22.50");
    }
}
