//! Order repository for checkout finalisation.

use rust_decimal::Decimal;
use sqlx::PgPool;

use neo_commerce_core::{CartId, CurrencyCode, Email, OrderId, OrderStatus, ProductId};

use super::RepositoryError;

/// An order line captured at checkout time.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i32,
    /// Unit amount frozen at finalisation; later price changes don't
    /// rewrite history.
    pub unit_amount: Decimal,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Finalise a cart into a paid order.
    ///
    /// Runs in one transaction: insert the order, insert its items, and
    /// flip the source cart to `recovered` with the checkout email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction rolls back and nothing is recorded.
    pub async fn finalise(
        &self,
        cart_id: CartId,
        email: &Email,
        currency: CurrencyCode,
        total: Decimal,
        lines: &[OrderLine],
        shipping_address: Option<&str>,
    ) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_id = OrderId::generate();
        let shipping_info = shipping_address
            .map(|address| serde_json::json!({ "address": address }));

        sqlx::query(
            r#"
            INSERT INTO storefront."order"
                (id, email, status, currency, total_amount, shipping_info)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order_id)
        .bind(email.as_str())
        .bind(OrderStatus::Paid.as_str())
        .bind(currency.as_str())
        .bind(total)
        .bind(shipping_info)
        .execute(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                r"
                INSERT INTO storefront.order_item
                    (order_id, product_id, quantity, unit_amount)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_amount)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r"
            UPDATE storefront.cart
            SET status = 'recovered', recovery_redeemed_at = now(), email = $2
            WHERE id = $1
            ",
        )
        .bind(cart_id)
        .bind(email.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(order_id)
    }
}
