//! Cart line type.

use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId};

/// A product in the cart together with how many units were selected.
///
/// Serializes as the product's own fields plus a `quantity` field, which is
/// the shape persisted under the `cart` storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product's fields as they were when it was added.
    #[serde(flatten)]
    pub product: Product,
    /// Units selected. Always at least 1 while the item is in a cart.
    pub quantity: u32,
}

impl CartItem {
    /// Create a line holding a single unit of `product`.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// The product ID, which is this line's identity within a cart.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}
