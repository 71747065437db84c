//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use neo_commerce_core::{CartId, Email};

use crate::error::{AppError, Result};
use crate::models::order::OrderReceipt;
use crate::services::CheckoutService;
use crate::state::AppState;

/// Checkout request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub cart_id: Option<CartId>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Finalise a cart into a paid order.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderReceipt>)> {
    let (Some(cart_id), Some(raw_email)) = (body.cart_id, body.email) else {
        return Err(AppError::BadRequest("Missing cartId or email".to_string()));
    };

    let email = Email::parse(&raw_email)
        .map_err(|e| AppError::BadRequest(format!("Invalid email: {e}")))?;

    let receipt = CheckoutService::new(state.pool())
        .finalise(cart_id, &email, body.address.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}
