//! Assistant widget route handler.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::AssistantService;
use crate::state::AppState;

/// Assistant query request body.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub message: String,
    pub mode: Option<String>,
}

/// Answer a user message via the inference service, degrading to the
/// knowledge-base fallback. Always succeeds once the message validates.
#[instrument(skip(state, body))]
pub async fn query(
    State(state): State<AppState>,
    Json(body): Json<QueryRequest>,
) -> Result<Json<serde_json::Value>> {
    let message = body.message.trim().to_string();
    if message.is_empty() {
        return Err(AppError::BadRequest(
            "Please include a message for the assistant.".to_string(),
        ));
    }

    let mode = body.mode.unwrap_or_else(|| "faq".to_string());

    let reply = AssistantService::new(state.pool(), state.assistant())
        .respond(&message, &mode)
        .await;

    Ok(Json(reply))
}
