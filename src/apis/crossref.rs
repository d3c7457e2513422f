//! Crossref citation-count backend.

use async_trait::async_trait;
use serde_json::Value;

use crate::apis::{lookup, CitationApi, DecodeError, IdCapabilities};
use crate::models::Identifier;

const CROSSREF_API_BASE: &str = "https://api.crossref.org";

/// Crossref backend
///
/// Uses the CSL-JSON transform of the works endpoint, which carries
/// `is-referenced-by-count`. Only DOIs are supported.
#[derive(Debug, Clone)]
pub struct CrossrefApi {
    base_url: String,
}

impl CrossrefApi {
    pub fn new() -> Self {
        Self::with_base_url(CROSSREF_API_BASE)
    }

    /// Point the backend at a different API root (mirrors, test servers)
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for CrossrefApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CitationApi for CrossrefApi {
    fn key(&self) -> &str {
        "crossref"
    }

    fn name(&self) -> &str {
        "Crossref"
    }

    fn capabilities(&self) -> IdCapabilities {
        IdCapabilities::DOI
    }

    fn build_url(&self, id: &Identifier) -> String {
        format!(
            "{}/works/{}/transform/application/vnd.citationstyles.csl+json",
            self.base_url,
            id.value()
        )
    }

    async fn decode(&self, response: Value) -> Result<Value, DecodeError> {
        lookup(&response, "/is-referenced-by-count")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_url() {
        let api = CrossrefApi::new();
        assert_eq!(
            api.build_url(&Identifier::doi("10.1/xyz")),
            "https://api.crossref.org/works/10.1%2Fxyz/transform/application/vnd.citationstyles.csl+json"
        );
    }

    #[test]
    fn test_doi_only() {
        let api = CrossrefApi::new();
        assert!(api.uses_doi());
        assert!(!api.uses_arxiv());
    }

    #[tokio::test]
    async fn test_decode() {
        let api = CrossrefApi::new();
        let count = api
            .decode(json!({"DOI": "10.1/xyz", "is-referenced-by-count": 42}))
            .await
            .unwrap();
        assert_eq!(count, json!(42));

        assert!(api.decode(json!({"DOI": "10.1/xyz"})).await.is_err());
    }
}
