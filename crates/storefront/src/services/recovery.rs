//! Abandoned-cart recovery batch and token redemption.
//!
//! Invoked by an external scheduler via the authenticated trigger
//! endpoint. Each run scans for idle carts, mints one single-use token
//! per cart, and enqueues a notification record; delivery belongs to an
//! external collaborator draining the outbox. Re-running is safe:
//! tokenised carts fall out of the eligibility query and the token write
//! itself is guarded.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use neo_commerce_core::Email;

use crate::config::StorefrontConfig;
use crate::db::carts::{CartLineSummary, RedeemOutcome};
use crate::db::{CartRepository, OutboxRepository, RepositoryError};
use crate::models::cart::CartView;

/// Carts idle for longer than this are eligible for recovery.
pub const IDLE_THRESHOLD_MINUTES: i64 = 60;

/// Upper bound on carts processed per invocation.
pub const BATCH_SIZE: i64 = 25;

/// The eligibility cutoff for a given clock reading.
#[must_use]
pub fn idle_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::minutes(IDLE_THRESHOLD_MINUTES)
}

/// Whether a cart last touched at `updated_at` is idle at `now`.
#[must_use]
pub fn is_idle(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    updated_at < idle_cutoff(now)
}

/// Notification record emitted for each recovered-cart candidate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryNotification {
    pub email: String,
    pub deep_link: String,
    pub items: Vec<CartLineSummary>,
}

/// Summary of one recovery batch run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RecoveryRunSummary {
    pub processed: usize,
}

/// Abandoned-cart recovery service.
pub struct RecoveryService<'a> {
    pool: &'a PgPool,
    config: &'a StorefrontConfig,
}

impl<'a> RecoveryService<'a> {
    /// Create a new recovery service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, config: &'a StorefrontConfig) -> Self {
        Self { pool, config }
    }

    /// Run one recovery batch.
    ///
    /// Carts without a usable email are skipped but still consume batch
    /// slots; having no token, they stay eligible for later runs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the eligibility scan fails. Failures
    /// on an individual cart are logged and skipped so one bad record
    /// cannot stall the batch.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<RecoveryRunSummary, RepositoryError> {
        let carts = CartRepository::new(self.pool);
        let outbox = OutboxRepository::new(self.pool);

        let eligible = carts.find_abandoned(idle_cutoff(Utc::now()), BATCH_SIZE).await?;
        tracing::info!(candidates = eligible.len(), "recovery scan complete");

        let mut processed = 0;
        for cart in eligible {
            let Some(raw_email) = cart.email else {
                tracing::debug!(cart_id = %cart.id, "skipping cart without email");
                continue;
            };
            let email = match Email::parse(&raw_email) {
                Ok(email) => email,
                Err(e) => {
                    tracing::warn!(cart_id = %cart.id, "skipping cart with invalid email: {e}");
                    continue;
                }
            };

            let token = Uuid::new_v4().to_string();
            let assigned = match carts.assign_recovery_token(cart.id, &token).await {
                Ok(assigned) => assigned,
                Err(e) => {
                    tracing::error!(cart_id = %cart.id, "failed to assign recovery token: {e}");
                    continue;
                }
            };
            if !assigned {
                // Lost the race to a concurrent run; that run owns the cart.
                tracing::debug!(cart_id = %cart.id, "cart already tokenised");
                continue;
            }

            let items = match carts.item_summaries(cart.id).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::error!(cart_id = %cart.id, "failed to summarise cart items: {e}");
                    Vec::new()
                }
            };

            let notification = RecoveryNotification {
                email: email.into_inner(),
                deep_link: self.config.recovery_deep_link(&token),
                items,
            };

            if let Err(e) = outbox
                .enqueue(
                    cart.id,
                    &notification.email,
                    &notification.deep_link,
                    &notification.items,
                )
                .await
            {
                tracing::error!(cart_id = %cart.id, "failed to enqueue notification: {e}");
                continue;
            }

            tracing::info!(cart_id = %cart.id, "recovery notification enqueued");
            processed += 1;
        }

        Ok(RecoveryRunSummary { processed })
    }

    /// Redeem a recovery token, returning the recovered cart.
    ///
    /// Idempotent: an already-redeemed token returns its cart without
    /// re-firing effects. Unknown tokens return `None`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a query fails.
    #[instrument(skip(self, token))]
    pub async fn redeem(&self, token: &str) -> Result<Option<CartView>, RepositoryError> {
        let carts = CartRepository::new(self.pool);

        let cart_id = match carts.redeem_token(token).await? {
            RedeemOutcome::Redeemed(id) => {
                tracing::info!(cart_id = %id, "recovery token redeemed");
                id
            }
            RedeemOutcome::AlreadyRedeemed(id) => id,
            RedeemOutcome::Unknown => return Ok(None),
        };

        carts.get_view(cart_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_idle_61_minutes_is_eligible() {
        let now = Utc::now();
        assert!(is_idle(now - Duration::minutes(61), now));
    }

    #[test]
    fn test_cart_idle_59_minutes_is_not_eligible() {
        let now = Utc::now();
        assert!(!is_idle(now - Duration::minutes(59), now));
    }

    #[test]
    fn test_idle_cutoff_is_one_hour() {
        let now = Utc::now();
        assert_eq!(now - idle_cutoff(now), Duration::minutes(60));
    }

    #[test]
    fn test_notification_serializes_camel_case() {
        let notification = RecoveryNotification {
            email: "shopper@example.com".to_string(),
            deep_link: "http://localhost:3000/recover/abc".to_string(),
            items: vec![CartLineSummary {
                name: "Aurora Pulse Headset".to_string(),
                quantity: 2,
            }],
        };

        let json = serde_json::to_value(&notification).expect("serializable");
        assert_eq!(json["deepLink"], "http://localhost:3000/recover/abc");
        assert_eq!(json["items"][0]["name"], "Aurora Pulse Headset");
        assert_eq!(json["items"][0]["quantity"], 2);
    }
}
