//! Catalog product record.
//!
//! A read-only projection of the catalog service's product JSON. Field names
//! follow the service's camelCase; fields the service adds over time are
//! ignored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as served by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Advertised discount (e.g., 12.5 for 12.5% off).
    #[serde(default)]
    pub discount_percentage: f64,
    /// Average review rating (0-5).
    #[serde(default)]
    pub rating: f64,
    /// Units in stock.
    #[serde(default)]
    pub stock: i64,
    /// Brand name, where the catalog has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Category slug (e.g., "smartphones").
    #[serde(default)]
    pub category: String,
    /// Thumbnail image URL.
    #[serde(default)]
    pub thumbnail: String,
    /// Gallery image URLs.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Price after the advertised discount, rounded to cents.
    #[must_use]
    pub fn discounted_price(&self) -> Price {
        let Ok(percent) = Decimal::try_from(self.discount_percentage) else {
            return self.price;
        };
        let factor = Decimal::ONE_HUNDRED - percent;
        Price::new((self.price.amount() * factor / Decimal::ONE_HUNDRED).round_dp(2))
    }
}
