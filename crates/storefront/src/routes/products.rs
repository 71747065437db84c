//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::product::{ProductDetail, ProductHit};
use crate::state::AppState;

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Filter to a category slug.
    pub category: Option<String>,
    /// "1" restricts the listing to featured products.
    pub featured: Option<String>,
}

/// Product listing, optionally filtered by category or featured flag.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductHit>>> {
    let featured_only = query.featured.as_deref() == Some("1");
    let products = ProductRepository::new(state.pool())
        .list(query.category.as_deref(), featured_only)
        .await?;

    Ok(Json(products))
}

/// Product detail by slug.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetail>> {
    let product = ProductRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    Ok(Json(product))
}
