//! INSPIRE-HEP citation-count backend.

use async_trait::async_trait;
use serde_json::Value;

use crate::apis::{lookup, CitationApi, DecodeError, IdCapabilities};
use crate::models::Identifier;

const INSPIRE_API_BASE: &str = "https://inspirehep.net/api";

/// INSPIRE-HEP backend
///
/// The literature API resolves both DOIs and arXiv identifiers directly:
/// `/api/doi/{id}` and `/api/arxiv/{id}`.
#[derive(Debug, Clone)]
pub struct InspireApi {
    base_url: String,
}

impl InspireApi {
    pub fn new() -> Self {
        Self::with_base_url(INSPIRE_API_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for InspireApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CitationApi for InspireApi {
    fn key(&self) -> &str {
        "inspire"
    }

    fn name(&self) -> &str {
        "INSPIRE-HEP"
    }

    fn capabilities(&self) -> IdCapabilities {
        IdCapabilities::DOI | IdCapabilities::ARXIV
    }

    fn build_url(&self, id: &Identifier) -> String {
        format!("{}/{}/{}", self.base_url, id.id_type().as_str(), id.value())
    }

    async fn decode(&self, response: Value) -> Result<Value, DecodeError> {
        lookup(&response, "/metadata/citation_count")
    }
}
