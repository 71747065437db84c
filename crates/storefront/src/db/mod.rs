//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `neo_storefront`
//!
//! ## Tables (schema `storefront`)
//!
//! - `product`, `category`, `price`, `inventory`, `review` - Catalog
//! - `cart`, `cart_item` - Client-held carts and their line items
//! - `order`, `order_item` - Finalised orders
//! - `kb_article` - Knowledge base (assistant fallback source)
//! - `search_event` - Search relevance telemetry
//! - `recovery_outbox` - Pending abandoned-cart notifications
//!
//! All queries are bound at runtime (no compile-time verification) because
//! the `vector` column type used for product embeddings is not covered by
//! `SQLx`'s macro support.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p neo-cli -- migrate
//! ```

pub mod carts;
pub mod knowledge;
pub mod orders;
pub mod outbox;
pub mod products;
pub mod search_events;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::CartRepository;
pub use knowledge::KnowledgeRepository;
pub use orders::OrderRepository;
pub use outbox::OutboxRepository;
pub use products::ProductRepository;
pub use search_events::SearchEventRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
