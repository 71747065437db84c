//! Product repository for catalog queries.
//!
//! Covers the product listing/detail endpoints and both legs of hybrid
//! search. The embedding column uses pgvector, which `SQLx` has no
//! built-in support for, so vector ordering is done with a runtime query
//! binding the textual vector literal.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use neo_commerce_core::{CategoryId, CurrencyCode, Price, ProductId};

use super::RepositoryError;
use crate::models::product::{CategorySummary, ProductDetail, ProductHit, ReviewView};

/// Columns shared by every product-hit query.
const HIT_COLUMNS: &str = r"
    p.id, p.slug, p.name, p.description, p.brand, p.tags, p.hero_image_url,
    c.id AS category_id, c.slug AS category_slug, c.name AS category_name,
    pr.amount AS price_amount, pr.currency AS price_currency,
    (SELECT AVG(rating)::float8 FROM storefront.review r WHERE r.product_id = p.id) AS rating
";

/// Joins shared by every product-hit query (cheapest active price wins).
const HIT_JOINS: &str = r"
    LEFT JOIN storefront.category c ON c.id = p.category_id
    LEFT JOIN LATERAL (
        SELECT amount, currency
        FROM storefront.price
        WHERE product_id = p.id AND active
        ORDER BY amount ASC
        LIMIT 1
    ) pr ON TRUE
";

#[derive(FromRow)]
struct ProductHitRow {
    id: ProductId,
    slug: String,
    name: String,
    description: String,
    brand: Option<String>,
    tags: Vec<String>,
    hero_image_url: Option<String>,
    category_id: Option<CategoryId>,
    category_slug: Option<String>,
    category_name: Option<String>,
    price_amount: Option<Decimal>,
    price_currency: Option<String>,
    rating: Option<f64>,
}

impl From<ProductHitRow> for ProductHit {
    fn from(row: ProductHitRow) -> Self {
        let category = match (row.category_id, row.category_slug, row.category_name) {
            (Some(id), Some(slug), Some(name)) => Some(CategorySummary { id, slug, name }),
            _ => None,
        };
        let price = row.price_amount.map(|amount| {
            Price::new(
                amount,
                CurrencyCode::parse_or_default(row.price_currency.as_deref().unwrap_or("usd")),
            )
        });

        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            description: row.description,
            brand: row.brand,
            tags: row.tags,
            hero_image_url: row.hero_image_url,
            category,
            price,
            rating: row.rating,
        }
    }
}

#[derive(FromRow)]
struct ReviewRow {
    rating: i32,
    title: Option<String>,
    body: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

/// Format an embedding as a pgvector literal (e.g. `[0.1,0.2,...]`).
pub(crate) fn format_embedding(embedding: &[f32]) -> String {
    let values: Vec<String> = embedding.iter().map(|v| format!("{v:.6}")).collect();
    format!("[{}]", values.join(","))
}

/// Repository for product catalog queries.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Case-insensitive keyword search over name, description, and tags.
    ///
    /// Tags match when any whitespace-split query term equals a tag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn keyword_search(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<ProductHit>, RepositoryError> {
        let terms: Vec<String> = query.split_whitespace().map(str::to_owned).collect();

        let sql = format!(
            r"
            SELECT {HIT_COLUMNS}
            FROM storefront.product p
            {HIT_JOINS}
            WHERE p.name ILIKE '%' || $1 || '%'
               OR p.description ILIKE '%' || $1 || '%'
               OR p.tags && $2
            ORDER BY p.popularity DESC
            LIMIT $3
            "
        );

        let rows = sqlx::query_as::<_, ProductHitRow>(&sql)
            .bind(query)
            .bind(&terms)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(ProductHit::from).collect())
    }

    /// Nearest-neighbour search over the precomputed embedding column.
    ///
    /// Results come back in similarity order (pgvector `<->` distance).
    /// Products without an embedding are excluded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn vector_search(
        &self,
        embedding: &[f32],
        limit: i64,
    ) -> Result<Vec<ProductHit>, RepositoryError> {
        let vector = format_embedding(embedding);

        let sql = format!(
            r"
            SELECT {HIT_COLUMNS}
            FROM storefront.product p
            {HIT_JOINS}
            WHERE p.embedding IS NOT NULL
            ORDER BY p.embedding <-> $1::vector
            LIMIT $2
            "
        );

        let rows = sqlx::query_as::<_, ProductHitRow>(&sql)
            .bind(&vector)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(ProductHit::from).collect())
    }

    /// Product listing, optionally filtered by category slug or featured flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        category: Option<&str>,
        featured_only: bool,
    ) -> Result<Vec<ProductHit>, RepositoryError> {
        let limit: i64 = if featured_only { 8 } else { 48 };

        let sql = format!(
            r"
            SELECT {HIT_COLUMNS}
            FROM storefront.product p
            {HIT_JOINS}
            WHERE ($1::text IS NULL OR c.slug = $1)
              AND (NOT $2 OR p.featured)
            ORDER BY p.updated_at DESC
            LIMIT $3
            "
        );

        let rows = sqlx::query_as::<_, ProductHitRow>(&sql)
            .bind(category)
            .bind(featured_only)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(ProductHit::from).collect())
    }

    /// Full product detail by slug, or `None` if the slug is unknown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        #[derive(FromRow)]
        struct DetailRow {
            id: ProductId,
            sku: String,
            slug: String,
            name: String,
            description: String,
            brand: Option<String>,
            tags: Vec<String>,
            featured: bool,
            popularity: i32,
            hero_image_url: Option<String>,
            category_id: Option<CategoryId>,
            category_slug: Option<String>,
            category_name: Option<String>,
            price_amount: Option<Decimal>,
            price_currency: Option<String>,
            inventory_quantity: Option<i32>,
            updated_at: chrono::DateTime<chrono::Utc>,
        }

        let row = sqlx::query_as::<_, DetailRow>(
            r"
            SELECT p.id, p.sku, p.slug, p.name, p.description, p.brand, p.tags,
                   p.featured, p.popularity, p.hero_image_url,
                   c.id AS category_id, c.slug AS category_slug, c.name AS category_name,
                   pr.amount AS price_amount, pr.currency AS price_currency,
                   i.quantity AS inventory_quantity,
                   p.updated_at
            FROM storefront.product p
            LEFT JOIN storefront.category c ON c.id = p.category_id
            LEFT JOIN LATERAL (
                SELECT amount, currency
                FROM storefront.price
                WHERE product_id = p.id AND active
                ORDER BY amount ASC
                LIMIT 1
            ) pr ON TRUE
            LEFT JOIN storefront.inventory i ON i.product_id = p.id
            WHERE p.slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let reviews = sqlx::query_as::<_, ReviewRow>(
            r"
            SELECT rating, title, body, created_at
            FROM storefront.review
            WHERE product_id = $1
            ORDER BY created_at DESC
            LIMIT 12
            ",
        )
        .bind(row.id.as_uuid())
        .fetch_all(self.pool)
        .await?;

        let category = match (row.category_id, row.category_slug, row.category_name) {
            (Some(id), Some(slug), Some(name)) => Some(CategorySummary { id, slug, name }),
            _ => None,
        };
        let price = row.price_amount.map(|amount| {
            Price::new(
                amount,
                CurrencyCode::parse_or_default(row.price_currency.as_deref().unwrap_or("usd")),
            )
        });

        Ok(Some(ProductDetail {
            id: row.id,
            sku: row.sku,
            slug: row.slug,
            name: row.name,
            description: row.description,
            brand: row.brand,
            tags: row.tags,
            featured: row.featured,
            popularity: row.popularity,
            hero_image_url: row.hero_image_url,
            category,
            price,
            inventory_quantity: row.inventory_quantity,
            reviews: reviews
                .into_iter()
                .map(|r| ReviewView {
                    rating: r.rating,
                    title: r.title,
                    body: r.body,
                    created_at: r.created_at,
                })
                .collect(),
            updated_at: row.updated_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_embedding() {
        let formatted = format_embedding(&[0.5, -1.0, 0.125]);
        assert_eq!(formatted, "[0.500000,-1.000000,0.125000]");
    }

    #[test]
    fn test_format_embedding_empty() {
        assert_eq!(format_embedding(&[]), "[]");
    }
}
