//! Cart repository for database operations.
//!
//! Carts are keyed by a client-held UUID. Concurrent mutations rely on
//! single-statement atomicity only: "add item" is one upsert with an
//! increment, and the recovery-token write is guarded so a cart is
//! tokenised at most once.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use neo_commerce_core::{CartId, CartStatus, CurrencyCode, Email, Price, ProductId};

use super::RepositoryError;
use crate::models::cart::{Cart, CartItemView, CartView};

/// Outcome of attempting to redeem a recovery token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemOutcome {
    /// The token was live and the cart is now `recovered`.
    Redeemed(CartId),
    /// The token was already redeemed; no effects were re-fired.
    AlreadyRedeemed(CartId),
    /// No cart holds this token.
    Unknown,
}

/// A cart eligible for abandoned-cart recovery.
#[derive(Debug, Clone, FromRow)]
pub struct AbandonedCart {
    pub id: CartId,
    pub email: Option<String>,
}

/// Line summary included in recovery notifications.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartLineSummary {
    pub name: String,
    pub quantity: i32,
}

#[derive(FromRow)]
struct CartRow {
    id: CartId,
    status: String,
    email: Option<String>,
    currency: String,
    recovery_sent_at: Option<DateTime<Utc>>,
    recovery_redeemed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CartRow {
    fn into_cart(self) -> Result<Cart, RepositoryError> {
        let status = CartStatus::parse(&self.status).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("invalid cart status: {}", self.status))
        })?;
        let email = match self.email {
            None => None,
            Some(raw) => Some(Email::parse(&raw).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?),
        };

        Ok(Cart {
            id: self.id,
            status,
            email,
            currency: CurrencyCode::parse_or_default(&self.currency),
            recovery_sent_at: self.recovery_sent_at,
            recovery_redeemed_at: self.recovery_redeemed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const CART_COLUMNS: &str = r"
    id, status, email, currency,
    recovery_sent_at, recovery_redeemed_at, created_at, updated_at
";

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a cart by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` for invalid stored values.
    pub async fn get(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let sql = format!("SELECT {CART_COLUMNS} FROM storefront.cart WHERE id = $1");
        let row = sqlx::query_as::<_, CartRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(CartRow::into_cart).transpose()
    }

    /// Create a new empty cart under the given client identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the identifier is already
    /// taken, `RepositoryError::Database` for other failures.
    pub async fn create(&self, id: CartId) -> Result<Cart, RepositoryError> {
        let sql =
            format!("INSERT INTO storefront.cart (id) VALUES ($1) RETURNING {CART_COLUMNS}");
        let row = sqlx::query_as::<_, CartRow>(&sql)
            .bind(id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("cart id already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        row.into_cart()
    }

    /// Get a cart with its line items and each item's current lowest
    /// active price, or `None` if the cart does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_view(&self, id: CartId) -> Result<Option<CartView>, RepositoryError> {
        let Some(cart) = self.get(id).await? else {
            return Ok(None);
        };

        #[derive(FromRow)]
        struct ItemRow {
            product_id: ProductId,
            slug: String,
            name: String,
            quantity: i32,
            price_amount: Option<Decimal>,
            price_currency: Option<String>,
        }

        let rows = sqlx::query_as::<_, ItemRow>(
            r"
            SELECT ci.product_id, p.slug, p.name, ci.quantity,
                   pr.amount AS price_amount, pr.currency AS price_currency
            FROM storefront.cart_item ci
            JOIN storefront.product p ON p.id = ci.product_id
            LEFT JOIN LATERAL (
                SELECT amount, currency
                FROM storefront.price
                WHERE product_id = p.id AND active
                ORDER BY amount ASC
                LIMIT 1
            ) pr ON TRUE
            WHERE ci.cart_id = $1
            ORDER BY ci.created_at ASC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(|row| {
                let unit_price = row.price_amount.map(|amount| {
                    Price::new(
                        amount,
                        CurrencyCode::parse_or_default(
                            row.price_currency.as_deref().unwrap_or("usd"),
                        ),
                    )
                });
                CartItemView::new(row.product_id, row.slug, row.name, row.quantity, unit_price)
            })
            .collect();

        Ok(Some(CartView::assemble(&cart, items)))
    }

    /// Add a quantity of a product to a cart.
    ///
    /// One atomic upsert: repeated adds for the same `(cart, product)`
    /// pair increment the existing row instead of duplicating it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart or product does
    /// not exist, `RepositoryError::Database` for other failures.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO storefront.cart_item (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = storefront.cart_item.quantity + EXCLUDED.quantity
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        self.touch(cart_id).await
    }

    /// Set a cart item's quantity. A quantity of zero or less deletes
    /// the row; the table never stores a non-positive quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn set_item_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        if quantity <= 0 {
            return self.remove_item(cart_id, product_id).await;
        }

        sqlx::query(
            r"
            UPDATE storefront.cart_item
            SET quantity = $3
            WHERE cart_id = $1 AND product_id = $2
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        self.touch(cart_id).await
    }

    /// Remove a product from a cart. Removing an absent item is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            DELETE FROM storefront.cart_item
            WHERE cart_id = $1 AND product_id = $2
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        self.touch(cart_id).await
    }

    /// Bump the cart's `updated_at` so idleness tracking sees activity.
    async fn touch(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE storefront.cart SET updated_at = now() WHERE id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Find carts eligible for recovery: `active`, untouched since
    /// `idle_cutoff`, not yet tokenised. Oldest first, bounded by `batch`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_abandoned(
        &self,
        idle_cutoff: DateTime<Utc>,
        batch: i64,
    ) -> Result<Vec<AbandonedCart>, RepositoryError> {
        let rows = sqlx::query_as::<_, AbandonedCart>(
            r"
            SELECT id, email
            FROM storefront.cart
            WHERE status = 'active'
              AND recovery_token IS NULL
              AND updated_at < $1
            ORDER BY updated_at ASC
            LIMIT $2
            ",
        )
        .bind(idle_cutoff)
        .bind(batch)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Summarise a cart's line items (product name and quantity) for a
    /// recovery notification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn item_summaries(
        &self,
        cart_id: CartId,
    ) -> Result<Vec<CartLineSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineSummary>(
            r"
            SELECT p.name, ci.quantity
            FROM storefront.cart_item ci
            JOIN storefront.product p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.created_at ASC
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Assign a recovery token to a cart.
    ///
    /// The write is guarded: it only lands if the cart is still `active`
    /// and tokenless, so a re-run of the batch (or a concurrent run)
    /// processes each cart at most once. Returns whether the token landed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn assign_recovery_token(
        &self,
        cart_id: CartId,
        token: &str,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE storefront.cart
            SET recovery_token = $2, recovery_sent_at = now()
            WHERE id = $1 AND status = 'active' AND recovery_token IS NULL
            ",
        )
        .bind(cart_id)
        .bind(token)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Redeem a recovery token.
    ///
    /// Idempotent: the first call transitions the cart to `recovered` and
    /// stamps the redemption time; later calls find the already-recovered
    /// cart and report it without touching anything.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn redeem_token(&self, token: &str) -> Result<RedeemOutcome, RepositoryError> {
        let redeemed = sqlx::query_scalar::<_, CartId>(
            r"
            UPDATE storefront.cart
            SET status = 'recovered', recovery_redeemed_at = now()
            WHERE recovery_token = $1 AND status = 'active'
            RETURNING id
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        if let Some(id) = redeemed {
            return Ok(RedeemOutcome::Redeemed(id));
        }

        let existing = sqlx::query_scalar::<_, CartId>(
            "SELECT id FROM storefront.cart WHERE recovery_token = $1",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(existing.map_or(RedeemOutcome::Unknown, RedeemOutcome::AlreadyRedeemed))
    }

    /// Mark a cart recovered after order finalisation, capturing the
    /// checkout email on the cart record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart doesn't exist.
    pub async fn mark_recovered(
        &self,
        cart_id: CartId,
        email: &Email,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE storefront.cart
            SET status = 'recovered', recovery_redeemed_at = now(), email = $2
            WHERE id = $1
            ",
        )
        .bind(cart_id)
        .bind(email.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
