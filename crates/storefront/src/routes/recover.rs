//! Cart recovery routes: the authenticated batch trigger and the deep
//! link redemption endpoint.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireRecoveryAuth;
use crate::models::cart::CartView;
use crate::services::RecoveryService;
use crate::services::recovery::RecoveryRunSummary;
use crate::state::AppState;

/// Run one abandoned-cart recovery batch.
///
/// Driven by an external scheduler; authentication is enforced by the
/// extractor before any data access.
#[instrument(skip(state))]
pub async fn trigger(
    _auth: RequireRecoveryAuth,
    State(state): State<AppState>,
) -> Result<Json<RecoveryRunSummary>> {
    let summary = RecoveryService::new(state.pool(), state.config())
        .run()
        .await?;

    Ok(Json(summary))
}

/// Redeem a recovery deep link, returning the recovered cart.
///
/// Redemption is idempotent; an unknown token is a 404.
#[instrument(skip(state, token))]
pub async fn redeem(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<CartView>> {
    let view = RecoveryService::new(state.pool(), state.config())
        .redeem(&token)
        .await?
        .ok_or_else(|| AppError::NotFound("recovery token".to_string()))?;

    Ok(Json(view))
}
