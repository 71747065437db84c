//! Catalog search route handler.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::models::product::ProductHit;
use crate::search::SearchService;
use crate::state::AppState;

/// Search request body.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    /// Optional query embedding; anything but the expected dimension
    /// silently disables the vector leg.
    pub embedding: Option<Vec<f32>>,
}

/// Search response body.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<ProductHit>,
}

/// Hybrid product search.
#[instrument(skip(state, body), fields(has_embedding = body.embedding.is_some()))]
pub async fn search(
    State(state): State<AppState>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    let query = body.query.trim().to_string();

    let results = SearchService::new(state.pool())
        .search(&query, body.embedding.as_deref())
        .await?;

    Ok(Json(SearchResponse { query, results }))
}
