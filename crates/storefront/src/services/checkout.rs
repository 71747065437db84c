//! Checkout finalisation.
//!
//! No payment gateway is wired in; checkout finalises directly to a paid
//! order and flips the source cart to `recovered`.

use sqlx::PgPool;
use tracing::instrument;

use neo_commerce_core::{CartId, Email};

use crate::db::orders::OrderLine;
use crate::db::{CartRepository, OrderRepository, RepositoryError};
use crate::models::order::OrderReceipt;

/// Errors that can occur during checkout.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The cart identifier doesn't match a cart.
    #[error("cart not found")]
    CartNotFound,

    /// The cart has no items to order.
    #[error("cart is empty")]
    EmptyCart,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Finalise a cart into a paid order.
    ///
    /// Unit amounts are frozen from each item's current lowest active
    /// price; unpriced items contribute zero.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::CartNotFound` for an unknown cart,
    /// `CheckoutError::EmptyCart` when there is nothing to order, and
    /// `CheckoutError::Repository` for store failures.
    #[instrument(skip(self, email, shipping_address))]
    pub async fn finalise(
        &self,
        cart_id: CartId,
        email: &Email,
        shipping_address: Option<&str>,
    ) -> Result<OrderReceipt, CheckoutError> {
        let carts = CartRepository::new(self.pool);

        let view = carts
            .get_view(cart_id)
            .await?
            .ok_or(CheckoutError::CartNotFound)?;

        if view.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let lines: Vec<OrderLine> = view
            .items
            .iter()
            .map(|item| OrderLine {
                product_id: item.product_id,
                quantity: item.quantity,
                unit_amount: item
                    .unit_price
                    .map(|p| p.amount)
                    .unwrap_or_default(),
            })
            .collect();

        let order_id = OrderRepository::new(self.pool)
            .finalise(
                cart_id,
                email,
                view.currency,
                view.subtotal,
                &lines,
                shipping_address,
            )
            .await?;

        tracing::info!(%order_id, %cart_id, "order finalised");

        Ok(OrderReceipt {
            order_id,
            total: view.subtotal,
            currency: view.currency,
        })
    }
}
