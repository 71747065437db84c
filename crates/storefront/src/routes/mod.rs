//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database connectivity)
//!
//! # Catalog
//! GET  /api/products           - Product listing (?category=, ?featured=1)
//! GET  /api/products/{slug}    - Product detail
//! POST /api/search             - Hybrid search ({query, embedding?})
//!
//! # Cart (identifier in neo_cart_id cookie)
//! GET    /api/cart             - Read cart, lazily creating one
//! POST   /api/cart             - Add item ({productId, quantity?})
//! PATCH  /api/cart             - Set item quantity (<= 0 removes)
//! DELETE /api/cart             - Remove item ({productId})
//!
//! # Checkout
//! POST /api/checkout           - Finalise cart into a paid order
//!
//! # Recovery
//! POST /api/recover            - Run recovery batch (bearer secret)
//! GET  /recover/{token}        - Redeem a recovery deep link
//!
//! # Assistant
//! POST /api/assistant/query    - Forward to inference service (with fallback)
//! ```

pub mod assistant;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod recover;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(cart::show)
            .post(cart::add)
            .patch(cart::update)
            .delete(cart::remove),
    )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .nest("/api/products", product_routes())
        .route("/api/search", post(search::search))
        // Cart
        .nest("/api/cart", cart_routes())
        // Checkout
        .route("/api/checkout", post(checkout::create))
        // Recovery
        .route("/api/recover", post(recover::trigger))
        .route("/recover/{token}", get(recover::redeem))
        // Assistant
        .route("/api/assistant/query", post(assistant::query))
}
