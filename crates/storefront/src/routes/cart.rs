//! Cart route handlers.
//!
//! The cart identifier lives in the `neo_cart_id` cookie. Cookie parsing
//! and setting happen here at the boundary; the session service itself is
//! identifier-pure. Every mutation re-fetches the cart so the caller
//! observes the new state.

use axum::{
    Json,
    extract::State,
    http::{
        HeaderMap, StatusCode,
        header::{COOKIE, SET_COOKIE},
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use neo_commerce_core::{CartId, ProductId};

use crate::db::CartRepository;
use crate::error::{AppError, Result};
use crate::services::CartSessionService;
use crate::state::AppState;

/// Cookie carrying the client-held cart identifier.
pub const CART_COOKIE: &str = "neo_cart_id";

/// Cookie lifetime: 30 days.
const CART_COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 30;

/// Extract the cart ID from the request's cookie header(s).
pub fn cart_id_from_headers(headers: &HeaderMap) -> Option<CartId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == CART_COOKIE).then_some(value)
        })
        .find_map(|value| CartId::parse(value).ok())
}

/// Build the `Set-Cookie` value persisting a cart identifier.
fn cart_cookie(id: CartId) -> String {
    format!(
        "{CART_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={CART_COOKIE_MAX_AGE_SECS}"
    )
}

/// Attach a `Set-Cookie` header when a fresh cart identifier was minted.
fn persist_cart_id(response: &mut Response, id: CartId) -> Result<()> {
    let value = cart_cookie(id)
        .parse()
        .map_err(|_| AppError::Internal("invalid cart cookie".to_string()))?;
    response.headers_mut().append(SET_COOKIE, value);
    Ok(())
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: Option<ProductId>,
    pub quantity: Option<i32>,
}

/// Update cart item request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub product_id: Option<ProductId>,
    pub quantity: Option<i32>,
}

/// Remove cart item request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemRequest {
    pub product_id: Option<ProductId>,
}

/// Return the cart, lazily creating one for first-time visitors.
#[instrument(skip(state, headers))]
pub async fn show(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let existing = cart_id_from_headers(&headers);
    let (view, created) = CartSessionService::new(state.pool())
        .resolve_or_create(existing)
        .await?;

    let id = view.id;
    let mut response = Json(view).into_response();
    if created {
        persist_cart_id(&mut response, id)?;
    }

    Ok(response)
}

/// Add an item to the cart, creating the cart if needed.
///
/// Repeated adds for the same product increment the existing line.
#[instrument(skip(state, headers, body))]
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AddItemRequest>,
) -> Result<Response> {
    let product_id = body
        .product_id
        .ok_or_else(|| AppError::BadRequest("Missing productId".to_string()))?;
    let quantity = body.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::BadRequest("Invalid quantity".to_string()));
    }

    let existing = cart_id_from_headers(&headers);
    let session = CartSessionService::new(state.pool());
    let (view, created) = session.resolve_or_create(existing).await?;
    let cart_id = view.id;

    let carts = CartRepository::new(state.pool());
    carts.add_item(cart_id, product_id, quantity).await?;

    let view = carts
        .get_view(cart_id)
        .await?
        .ok_or_else(|| AppError::Internal("cart vanished during add".to_string()))?;

    let mut response = (StatusCode::CREATED, Json(view)).into_response();
    if created {
        persist_cart_id(&mut response, cart_id)?;
    }

    Ok(response)
}

/// Set an item's quantity; zero or less removes the item entirely.
#[instrument(skip(state, headers, body))]
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Response> {
    let cart_id = cart_id_from_headers(&headers)
        .ok_or_else(|| AppError::BadRequest("Cart not initialised".to_string()))?;
    let (Some(product_id), Some(quantity)) = (body.product_id, body.quantity) else {
        return Err(AppError::BadRequest("Invalid payload".to_string()));
    };

    let carts = CartRepository::new(state.pool());
    carts.set_item_quantity(cart_id, product_id, quantity).await?;

    let view = carts
        .get_view(cart_id)
        .await?
        .ok_or_else(|| AppError::NotFound("cart".to_string()))?;

    Ok(Json(view).into_response())
}

/// Remove an item from the cart.
#[instrument(skip(state, headers, body))]
pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RemoveItemRequest>,
) -> Result<Response> {
    let cart_id = cart_id_from_headers(&headers)
        .ok_or_else(|| AppError::BadRequest("Cart not initialised".to_string()))?;
    let product_id = body
        .product_id
        .ok_or_else(|| AppError::BadRequest("Missing productId".to_string()))?;

    let carts = CartRepository::new(state.pool());
    carts.remove_item(cart_id, product_id).await?;

    let view = carts
        .get_view(cart_id)
        .await?
        .ok_or_else(|| AppError::NotFound("cart".to_string()))?;

    Ok(Json(view).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_cart_id_from_single_cookie() {
        let id = CartId::generate();
        let headers = headers_with_cookie(&format!("neo_cart_id={id}"));
        assert_eq!(cart_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn test_cart_id_among_other_cookies() {
        let id = CartId::generate();
        let headers =
            headers_with_cookie(&format!("theme=dark; neo_cart_id={id}; locale=en-GB"));
        assert_eq!(cart_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn test_cart_id_missing() {
        let headers = headers_with_cookie("theme=dark");
        assert_eq!(cart_id_from_headers(&headers), None);
        assert_eq!(cart_id_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn test_cart_id_invalid_uuid_ignored() {
        let headers = headers_with_cookie("neo_cart_id=not-a-uuid");
        assert_eq!(cart_id_from_headers(&headers), None);
    }

    #[test]
    fn test_cart_cookie_attributes() {
        let id = CartId::generate();
        let cookie = cart_cookie(id);
        assert!(cookie.starts_with(&format!("neo_cart_id={id};")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=2592000"));
    }
}
