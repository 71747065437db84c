//! Cart domain model and API views.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use neo_commerce_core::{CartId, CartStatus, CurrencyCode, Email, Price, ProductId};

use super::product::line_total;

/// A persisted cart record.
///
/// The recovery token never leaves the repository layer; views expose only
/// the sent/redeemed timestamps.
#[derive(Debug, Clone)]
pub struct Cart {
    pub id: CartId,
    pub status: CartStatus,
    pub email: Option<Email>,
    pub currency: CurrencyCode,
    pub recovery_sent_at: Option<DateTime<Utc>>,
    pub recovery_redeemed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart line item joined with its product and current pricing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: ProductId,
    pub slug: String,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Option<Price>,
    pub line_total: Option<Decimal>,
}

impl CartItemView {
    /// Build an item view, deriving the line total from the unit price.
    #[must_use]
    pub fn new(
        product_id: ProductId,
        slug: String,
        name: String,
        quantity: i32,
        unit_price: Option<Price>,
    ) -> Self {
        let total = unit_price.map(|p| line_total(p.amount, quantity));
        Self {
            product_id,
            slug,
            name,
            quantity,
            unit_price,
            line_total: total,
        }
    }
}

/// Cart payload returned by every cart endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub id: CartId,
    pub status: CartStatus,
    pub email: Option<Email>,
    pub currency: CurrencyCode,
    pub items: Vec<CartItemView>,
    pub subtotal: Decimal,
    pub item_count: i64,
}

impl CartView {
    /// Assemble the view from a cart record and its priced items.
    #[must_use]
    pub fn assemble(cart: &Cart, items: Vec<CartItemView>) -> Self {
        let subtotal = items
            .iter()
            .filter_map(|item| item.line_total)
            .sum::<Decimal>();
        let item_count = items.iter().map(|item| i64::from(item.quantity)).sum();

        Self {
            id: cart.id,
            status: cart.status,
            email: cart.email.clone(),
            currency: cart.currency,
            items,
            subtotal,
            item_count,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cart() -> Cart {
        Cart {
            id: CartId::generate(),
            status: CartStatus::Active,
            email: None,
            currency: CurrencyCode::Usd,
            recovery_sent_at: None,
            recovery_redeemed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn item(amount: i64, quantity: i32) -> CartItemView {
        CartItemView::new(
            ProductId::generate(),
            "aurora-pulse".to_string(),
            "Aurora Pulse Headset".to_string(),
            quantity,
            Some(Price::new(Decimal::new(amount, 2), CurrencyCode::Usd)),
        )
    }

    #[test]
    fn test_line_total_derived() {
        let view = item(49_900, 2);
        assert_eq!(view.line_total, Some(Decimal::new(99_800, 2)));
    }

    #[test]
    fn test_assemble_sums_subtotal_and_count() {
        let view = CartView::assemble(&cart(), vec![item(49_900, 2), item(69_900, 1)]);
        assert_eq!(view.subtotal, Decimal::new(169_700, 2));
        assert_eq!(view.item_count, 3);
    }

    #[test]
    fn test_assemble_unpriced_items_excluded_from_subtotal() {
        let unpriced = CartItemView::new(
            ProductId::generate(),
            "flux-console".to_string(),
            "Flux Modular Console".to_string(),
            4,
            None,
        );
        let view = CartView::assemble(&cart(), vec![unpriced, item(10_000, 1)]);
        assert_eq!(view.subtotal, Decimal::new(10_000, 2));
        assert_eq!(view.item_count, 5);
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::assemble(&cart(), Vec::new());
        assert_eq!(view.subtotal, Decimal::ZERO);
        assert_eq!(view.item_count, 0);
        assert!(view.items.is_empty());
    }
}
