//! Hybrid catalog search.
//!
//! Every search runs the keyword leg; a supplied embedding of the right
//! dimension adds a nearest-neighbour leg. Keyword hits always come
//! first and are never displaced by vector hits.

use sqlx::PgPool;
use tracing::instrument;

use crate::db::{ProductRepository, RepositoryError, SearchEventRepository};
use crate::models::product::ProductHit;

/// Dimension of the product embedding column.
pub const VECTOR_DIMENSION: usize = 768;

/// Cap applied to each leg and to the merged result set.
pub const MAX_RESULTS: usize = 12;

/// How a search was executed, recorded with each search event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Keyword,
    Hybrid,
}

impl SearchMode {
    /// The lowercase mode as stored in search events.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Hybrid => "hybrid",
        }
    }
}

/// Merge keyword and vector hits.
///
/// Keyword hits keep their order and always survive; vector hits are
/// appended only when their ID is not already present. The merged list
/// is truncated to `cap`.
#[must_use]
pub fn merge_hits(
    keyword: Vec<ProductHit>,
    vector: Vec<ProductHit>,
    cap: usize,
) -> Vec<ProductHit> {
    let mut merged = keyword;
    for hit in vector {
        if !merged.iter().any(|existing| existing.id == hit.id) {
            merged.push(hit);
        }
    }
    merged.truncate(cap);
    merged
}

/// Whether an embedding enables the vector leg.
///
/// Anything but an exact-dimension vector silently disables the leg
/// rather than failing the request.
#[must_use]
pub fn vector_leg_enabled(embedding: Option<&[f32]>) -> bool {
    embedding.is_some_and(|e| e.len() == VECTOR_DIMENSION)
}

/// Hybrid search service.
pub struct SearchService<'a> {
    pool: &'a PgPool,
}

impl<'a> SearchService<'a> {
    /// Create a new search service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Execute a search.
    ///
    /// An empty (or whitespace) query short-circuits to an empty result
    /// set without touching the store and without logging an event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a product query fails.
    /// Event logging is best-effort and never fails the search.
    #[instrument(skip(self, embedding), fields(query_len = query.len()))]
    pub async fn search(
        &self,
        query: &str,
        embedding: Option<&[f32]>,
    ) -> Result<Vec<ProductHit>, RepositoryError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let products = ProductRepository::new(self.pool);

        #[allow(clippy::cast_possible_wrap)]
        let cap = MAX_RESULTS as i64;
        let keyword = products.keyword_search(query, cap).await?;

        let (vector, mode) = match embedding.filter(|e| vector_leg_enabled(Some(*e))) {
            Some(embedding) => (
                products.vector_search(embedding, cap).await?,
                SearchMode::Hybrid,
            ),
            None => (Vec::new(), SearchMode::Keyword),
        };

        let results = merge_hits(keyword, vector, MAX_RESULTS);

        let zero_results = results.is_empty();
        if zero_results {
            tracing::info!(%query, mode = mode.as_str(), "search returned no results");
        }

        if let Err(e) = SearchEventRepository::new(self.pool)
            .record(query, mode, zero_results)
            .await
        {
            tracing::warn!("failed to record search event: {e}");
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_commerce_core::ProductId;

    fn hit(name: &str) -> ProductHit {
        ProductHit {
            id: ProductId::generate(),
            slug: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            description: String::new(),
            brand: None,
            tags: Vec::new(),
            hero_image_url: None,
            category: None,
            price: None,
            rating: None,
        }
    }

    #[test]
    fn test_merge_keyword_first_in_order() {
        let a = hit("Aurora Pulse Headset");
        let b = hit("Nebula Smart Lens");
        let c = hit("Flux Modular Console");

        let merged = merge_hits(vec![a.clone(), b.clone()], vec![c.clone()], MAX_RESULTS);
        let ids: Vec<_> = merged.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn test_merge_deduplicates_by_id() {
        let a = hit("Aurora Pulse Headset");
        let b = hit("Nebula Smart Lens");

        let merged = merge_hits(vec![a.clone()], vec![a.clone(), b.clone()], MAX_RESULTS);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, a.id);
        assert_eq!(merged[1].id, b.id);
    }

    #[test]
    fn test_merge_truncates_to_cap() {
        let keyword: Vec<_> = (0..10).map(|i| hit(&format!("kw {i}"))).collect();
        let vector: Vec<_> = (0..10).map(|i| hit(&format!("vec {i}"))).collect();
        let keyword_ids: Vec<_> = keyword.iter().map(|h| h.id).collect();

        let merged = merge_hits(keyword, vector, MAX_RESULTS);
        assert_eq!(merged.len(), MAX_RESULTS);
        // Keyword hits are never dropped in favour of vector hits.
        for (hit, expected) in merged.iter().zip(&keyword_ids) {
            assert_eq!(hit.id, *expected);
        }
    }

    #[test]
    fn test_merge_empty_legs() {
        assert!(merge_hits(Vec::new(), Vec::new(), MAX_RESULTS).is_empty());
    }

    #[test]
    fn test_vector_leg_requires_exact_dimension() {
        assert!(!vector_leg_enabled(None));
        assert!(!vector_leg_enabled(Some(&[0.0; 3])));
        assert!(!vector_leg_enabled(Some(&vec![0.0; VECTOR_DIMENSION - 1])));
        assert!(!vector_leg_enabled(Some(&vec![0.0; VECTOR_DIMENSION + 1])));
        assert!(vector_leg_enabled(Some(&vec![0.0; VECTOR_DIMENSION])));
    }

    #[test]
    fn test_mode_strings() {
        assert_eq!(SearchMode::Keyword.as_str(), "keyword");
        assert_eq!(SearchMode::Hybrid.as_str(), "hybrid");
    }
}
