//! Assistant gateway: forward to the inference service, degrade locally.
//!
//! The inference service is treated as unreliable. Its reply passes
//! through verbatim on success; on any failure (non-2xx, network error,
//! timeout, bad JSON) the gateway synthesizes a reply from knowledge base
//! articles and never surfaces an error to the caller.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;

use crate::config::AiServiceConfig;
use crate::db::KnowledgeRepository;
use crate::models::knowledge::{ArticleHit, KnowledgeArticle};

/// Fixed reply used when the knowledge base has nothing to offer.
pub const WARMING_UP_REPLY: &str =
    "Our assistant is warming up. Here are top FAQs while we reconnect.";

/// Articles included in a fallback reply.
const FALLBACK_ARTICLE_LIMIT: i64 = 3;

/// Errors from the inference service call. These never escape the
/// gateway; they only select the fallback path.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// Request failed (connect error, timeout, or invalid response body).
    #[error("inference request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("inference service returned {0}")]
    Status(StatusCode),
}

#[derive(Debug, Serialize)]
struct AnswerRequest<'a> {
    query: &'a str,
    mode: &'a str,
}

/// Client for the external inference service.
#[derive(Clone)]
pub struct AssistantClient {
    inner: Arc<AssistantClientInner>,
}

struct AssistantClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AssistantClient {
    /// Create a new assistant client with the configured hard timeout.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be constructed.
    #[must_use]
    pub fn new(config: &AiServiceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(AssistantClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        }
    }

    /// Forward a query to `POST {base_url}/answer` and return the JSON
    /// response verbatim.
    ///
    /// # Errors
    ///
    /// Returns `AssistantError` on any transport failure, timeout,
    /// non-success status, or unparseable body.
    #[instrument(skip(self, query), fields(query_len = query.len(), mode = mode))]
    pub async fn answer(
        &self,
        query: &str,
        mode: &str,
    ) -> Result<serde_json::Value, AssistantError> {
        let url = format!("{}/answer", self.inner.base_url);
        let response = self
            .inner
            .client
            .post(&url)
            .json(&AnswerRequest { query, mode })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Status(status));
        }

        Ok(response.json().await?)
    }
}

/// Synthesize a fallback reply from matched articles.
///
/// One sentence listing the matched titles; the fixed warming-up reply
/// when nothing matched.
#[must_use]
pub fn synthesize_fallback(articles: &[KnowledgeArticle]) -> (String, Vec<ArticleHit>) {
    if articles.is_empty() {
        return (WARMING_UP_REPLY.to_string(), Vec::new());
    }

    let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
    let reply = format!(
        "While our assistant reconnects, these articles may help: {}.",
        titles.join(", ")
    );
    let hits = articles.iter().map(ArticleHit::from).collect();

    (reply, hits)
}

/// Assistant gateway service.
pub struct AssistantService<'a> {
    pool: &'a PgPool,
    client: &'a AssistantClient,
}

impl<'a> AssistantService<'a> {
    /// Create a new assistant service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, client: &'a AssistantClient) -> Self {
        Self { pool, client }
    }

    /// Answer a user message, falling back to the knowledge base.
    ///
    /// This is infallible by design: a failed forward is logged and
    /// masked by the local fallback, and a store error during the
    /// fallback degrades to the warming-up reply.
    #[instrument(skip(self, message), fields(mode = mode))]
    pub async fn respond(&self, message: &str, mode: &str) -> serde_json::Value {
        match self.client.answer(message, mode).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("inference service unavailable, using fallback: {e}");
                self.fallback(message).await
            }
        }
    }

    /// Build the local fallback reply.
    async fn fallback(&self, message: &str) -> serde_json::Value {
        let knowledge = KnowledgeRepository::new(self.pool);
        let query = message.trim();

        let articles = if query.is_empty() {
            knowledge.recent(FALLBACK_ARTICLE_LIMIT).await
        } else {
            knowledge.search(query, FALLBACK_ARTICLE_LIMIT).await
        };

        let articles = match articles {
            Ok(articles) => articles,
            Err(e) => {
                tracing::error!("knowledge base lookup failed during fallback: {e}");
                Vec::new()
            }
        };

        let (reply, hits) = synthesize_fallback(&articles);
        serde_json::json!({
            "reply": reply,
            "fallback": true,
            "hits": hits,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use neo_commerce_core::ArticleId;

    fn article(title: &str) -> KnowledgeArticle {
        KnowledgeArticle {
            id: ArticleId::generate(),
            slug: title.to_lowercase().replace(' ', "-"),
            title: title.to_string(),
            body: "Orders ship within 48 hours.".to_string(),
            category: "logistics".to_string(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_synthesize_fallback_empty_kb() {
        let (reply, hits) = synthesize_fallback(&[]);
        assert_eq!(reply, WARMING_UP_REPLY);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_synthesize_fallback_lists_titles() {
        let articles = vec![article("Shipping & fulfilment"), article("Returns policy")];
        let (reply, hits) = synthesize_fallback(&articles);

        assert!(reply.contains("Shipping & fulfilment"));
        assert!(reply.contains("Returns policy"));
        assert!(reply.ends_with('.'));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].slug, "shipping-&-fulfilment");
        assert_eq!(hits[0].category, "logistics");
    }

    #[test]
    fn test_synthesize_fallback_single_sentence() {
        let articles = vec![article("Shipping & fulfilment")];
        let (reply, _) = synthesize_fallback(&articles);
        assert_eq!(
            reply,
            "While our assistant reconnects, these articles may help: Shipping & fulfilment."
        );
    }
}
