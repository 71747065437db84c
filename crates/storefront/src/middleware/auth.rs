//! Authentication extractor for the recovery trigger.
//!
//! The cart-recovery batch is driven by an external scheduler that
//! authenticates with a shared bearer secret. Rejection happens in the
//! extractor, before the handler touches any data.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires the recovery-trigger bearer secret.
///
/// A missing or malformed `Authorization` header is rejected with 401;
/// a well-formed header carrying the wrong secret with 403.
///
/// # Example
///
/// ```rust,ignore
/// async fn trigger(
///     _auth: RequireRecoveryAuth,
///     State(state): State<AppState>,
/// ) -> impl IntoResponse {
///     // only reached with a valid secret
/// }
/// ```
#[derive(Debug)]
pub struct RequireRecoveryAuth;

impl FromRequestParts<AppState> for RequireRecoveryAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized("missing authorization header".to_string())
            })?;

        let presented = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("expected bearer authorization".to_string())
        })?;

        if !state.config().recovery_secret_matches(presented) {
            return Err(AppError::Forbidden("invalid recovery secret".to_string()));
        }

        Ok(Self)
    }
}
