//! Catalog view types returned by product and search endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use neo_commerce_core::{CategoryId, Price, ProductId};

/// Category reference embedded in product payloads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: CategoryId,
    pub slug: String,
    pub name: String,
}

/// Product listing / search result entry.
///
/// Carries the lowest active price; products with no active price
/// serialize a `null` price rather than being dropped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductHit {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub brand: Option<String>,
    pub tags: Vec<String>,
    pub hero_image_url: Option<String>,
    pub category: Option<CategorySummary>,
    pub price: Option<Price>,
    pub rating: Option<f64>,
}

/// A single customer review on a product detail page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub rating: i32,
    pub title: Option<String>,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Full product detail payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub id: ProductId,
    pub sku: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub brand: Option<String>,
    pub tags: Vec<String>,
    pub featured: bool,
    pub popularity: i32,
    pub hero_image_url: Option<String>,
    pub category: Option<CategorySummary>,
    pub price: Option<Price>,
    pub inventory_quantity: Option<i32>,
    pub reviews: Vec<ReviewView>,
    pub updated_at: DateTime<Utc>,
}

/// Line total for a quantity at a unit amount.
#[must_use]
pub fn line_total(unit_amount: Decimal, quantity: i32) -> Decimal {
    unit_amount * Decimal::from(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let total = line_total(Decimal::new(49_900, 2), 3);
        assert_eq!(total, Decimal::new(149_700, 2));
    }
}
