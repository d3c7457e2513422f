//! Semantic Scholar citation-count backend.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::apis::{lookup, CitationApi, DecodeError, IdCapabilities};
use crate::models::{IdType, Identifier};

const SEMANTIC_API_BASE: &str = "https://api.semanticscholar.org/graph/v1";

/// Delay applied after every decoded response.
pub const DEFAULT_THROTTLE: Duration = Duration::from_secs(3);

/// Semantic Scholar backend
///
/// The public graph API is tightly rate limited for unauthenticated clients, so
/// every decode waits a fixed delay before handing back the count. The delay is
/// per call, not a shared limiter.
#[derive(Debug, Clone)]
pub struct SemanticScholarApi {
    base_url: String,
    throttle: Duration,
}

impl SemanticScholarApi {
    pub fn new() -> Self {
        Self::with_base_url(SEMANTIC_API_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            throttle: DEFAULT_THROTTLE,
        }
    }

    /// Override the per-call delay
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn throttle(&self) -> Duration {
        self.throttle
    }
}

impl Default for SemanticScholarApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CitationApi for SemanticScholarApi {
    fn key(&self) -> &str {
        "semanticscholar"
    }

    fn name(&self) -> &str {
        "Semantic Scholar"
    }

    fn capabilities(&self) -> IdCapabilities {
        IdCapabilities::DOI | IdCapabilities::ARXIV
    }

    fn build_url(&self, id: &Identifier) -> String {
        let prefix = match id.id_type() {
            IdType::Doi => "",
            IdType::Arxiv => "arXiv:",
        };
        format!(
            "{}/paper/{}{}?fields=citationCount",
            self.base_url,
            prefix,
            id.value()
        )
    }

    async fn decode(&self, response: Value) -> Result<Value, DecodeError> {
        let count = lookup(&response, "/citationCount");

        if !self.throttle.is_zero() {
            tracing::debug!("Throttling Semantic Scholar for {:?}", self.throttle);
            tokio::time::sleep(self.throttle).await;
        }

        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_url() {
        let api = SemanticScholarApi::new();
        assert_eq!(
            api.build_url(&Identifier::doi("10.1/xyz")),
            "https://api.semanticscholar.org/graph/v1/paper/10.1%2Fxyz?fields=citationCount"
        );
        assert_eq!(
            api.build_url(&Identifier::arxiv("1234.5678")),
            "https://api.semanticscholar.org/graph/v1/paper/arXiv:1234.5678?fields=citationCount"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_decode_waits_before_returning() {
        let api = SemanticScholarApi::new();
        let start = tokio::time::Instant::now();

        let count = api
            .decode(json!({"paperId": "abc", "citationCount": 5}))
            .await
            .unwrap();

        assert_eq!(count, json!(5));
        assert!(start.elapsed() >= DEFAULT_THROTTLE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_decode_waits_even_on_missing_count() {
        let api = SemanticScholarApi::new();
        let start = tokio::time::Instant::now();

        assert!(api.decode(json!({"error": "Paper not found"})).await.is_err());
        assert!(start.elapsed() >= DEFAULT_THROTTLE);
    }

    #[tokio::test]
    async fn test_zero_throttle() {
        let api = SemanticScholarApi::new().with_throttle(Duration::ZERO);
        assert_eq!(api.throttle(), Duration::ZERO);
        assert_eq!(api.decode(json!({"citationCount": 0})).await.unwrap(), json!(0));
    }
}
