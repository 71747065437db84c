//! Identifier-pure cart session resolution.
//!
//! The client holds an opaque cart identifier (a cookie at the HTTP
//! boundary). This service takes that identifier as an explicit input and
//! hands back the cart plus whether a fresh identifier was minted; it
//! never reads ambient request state itself.

use sqlx::PgPool;
use tracing::instrument;

use neo_commerce_core::CartId;

use crate::db::{CartRepository, RepositoryError};
use crate::models::cart::CartView;

/// Cart resolution service.
pub struct CartSessionService<'a> {
    pool: &'a PgPool,
}

impl<'a> CartSessionService<'a> {
    /// Create a new cart session service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve an existing cart or lazily create one.
    ///
    /// A missing or stale identifier (no matching cart row) yields a
    /// freshly created empty cart; the returned flag tells the caller to
    /// persist the new identifier back to the client.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a cart query or insert fails.
    #[instrument(skip(self))]
    pub async fn resolve_or_create(
        &self,
        id: Option<CartId>,
    ) -> Result<(CartView, bool), RepositoryError> {
        let carts = CartRepository::new(self.pool);

        if let Some(id) = id {
            if let Some(view) = carts.get_view(id).await? {
                return Ok((view, false));
            }
            tracing::debug!(cart_id = %id, "stale cart identifier, minting a fresh cart");
        }

        let fresh_id = CartId::generate();
        let cart = carts.create(fresh_id).await?;
        tracing::debug!(cart_id = %cart.id, "created cart");

        Ok((CartView::assemble(&cart, Vec::new()), true))
    }
}
