//! Knowledge base repository (assistant fallback source).

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use neo_commerce_core::ArticleId;

use super::RepositoryError;
use crate::models::knowledge::KnowledgeArticle;

#[derive(FromRow)]
struct ArticleRow {
    id: ArticleId,
    slug: String,
    title: String,
    body: String,
    category: String,
    updated_at: DateTime<Utc>,
}

impl From<ArticleRow> for KnowledgeArticle {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            body: row.body,
            category: row.category,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for knowledge base articles.
pub struct KnowledgeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> KnowledgeRepository<'a> {
    /// Create a new knowledge repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Case-insensitive substring search across title, body, and
    /// category, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<KnowledgeArticle>, RepositoryError> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            r"
            SELECT id, slug, title, body, category, updated_at
            FROM storefront.kb_article
            WHERE title ILIKE '%' || $1 || '%'
               OR body ILIKE '%' || $1 || '%'
               OR category ILIKE '%' || $1 || '%'
            ORDER BY updated_at DESC
            LIMIT $2
            ",
        )
        .bind(query)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(KnowledgeArticle::from).collect())
    }

    /// The most recently updated articles.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent(&self, limit: i64) -> Result<Vec<KnowledgeArticle>, RepositoryError> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            r"
            SELECT id, slug, title, body, category, updated_at
            FROM storefront.kb_article
            ORDER BY updated_at DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(KnowledgeArticle::from).collect())
    }
}
