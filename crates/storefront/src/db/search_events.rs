//! Search event telemetry.
//!
//! Every executed catalog search is recorded with its mode and whether
//! it came back empty; the zero-result rate feeds relevance tuning.

use sqlx::PgPool;

use super::RepositoryError;
use crate::search::SearchMode;

/// Repository for search telemetry events.
pub struct SearchEventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SearchEventRepository<'a> {
    /// Create a new search event repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a search execution.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record(
        &self,
        query: &str,
        mode: SearchMode,
        zero_results: bool,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO storefront.search_event (query, mode, zero_results)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(query)
        .bind(mode.as_str())
        .bind(zero_results)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
