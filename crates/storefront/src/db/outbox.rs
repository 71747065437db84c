//! Recovery notification outbox.
//!
//! The recovery batch writes notification records here; an external
//! delivery worker drains them. Keeping delivery out of the batch keeps
//! the trigger endpoint fast and the batch safe to re-run.

use sqlx::PgPool;

use neo_commerce_core::CartId;

use super::RepositoryError;
use super::carts::CartLineSummary;

/// Repository for the recovery notification outbox.
pub struct OutboxRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OutboxRepository<'a> {
    /// Create a new outbox repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Enqueue a recovery notification for external delivery.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails, or
    /// `RepositoryError::DataCorruption` if the item summary cannot be
    /// serialized.
    pub async fn enqueue(
        &self,
        cart_id: CartId,
        email: &str,
        deep_link: &str,
        items: &[CartLineSummary],
    ) -> Result<(), RepositoryError> {
        let items_json = serde_json::to_value(items).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize item summary: {e}"))
        })?;

        sqlx::query(
            r"
            INSERT INTO storefront.recovery_outbox (cart_id, email, deep_link, items)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(cart_id)
        .bind(email)
        .bind(deep_link)
        .bind(items_json)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
