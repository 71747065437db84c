//! Knowledge base article types (assistant fallback source).

use chrono::{DateTime, Utc};
use serde::Serialize;

use neo_commerce_core::ArticleId;

/// A knowledge base article.
#[derive(Debug, Clone)]
pub struct KnowledgeArticle {
    pub id: ArticleId,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub category: String,
    pub updated_at: DateTime<Utc>,
}

/// Article reference included in a fallback assistant reply.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleHit {
    pub slug: String,
    pub title: String,
    pub category: String,
}

impl From<&KnowledgeArticle> for ArticleHit {
    fn from(article: &KnowledgeArticle) -> Self {
        Self {
            slug: article.slug.clone(),
            title: article.title.clone(),
            category: article.category.clone(),
        }
    }
}
