//! Citation-count API backends with an extensible trait-based architecture.
//!
//! This module defines the [`CitationApi`] trait that every backend implements.
//! A backend only declares which identifier types it accepts, how to build a
//! request URL for an identifier, and how to pull the citation count out of the
//! decoded JSON response. Fetching, validation and the DOI/arXiv fallback are
//! handled by [`crate::retrieval`] and never depend on a concrete backend.
//!
//! # Built-in backends
//!
//! | key               | DOI | arXiv |
//! |-------------------|-----|-------|
//! | `crossref`        | yes | no    |
//! | `inspire`         | yes | yes   |
//! | `semanticscholar` | yes | yes   |
//!
//! # Adding a backend
//!
//! 1. Create a struct implementing [`CitationApi`]
//! 2. Return its accepted identifier types from `capabilities`
//! 3. Register it with [`ApiRegistry::register`] (or in `ApiRegistry::new()`)

mod crossref;
mod inspire;
pub mod mock;
mod registry;
mod semantic;

pub use crossref::CrossrefApi;
pub use inspire::InspireApi;
pub use mock::MockApi;
pub use registry::{ApiRegistry, IdCapabilities};
pub use semantic::SemanticScholarApi;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::Identifier;

/// A citation-count API backend.
#[async_trait]
pub trait CitationApi: Send + Sync + std::fmt::Debug {
    /// Unique key of this backend (used for preferences and CLI flags)
    fn key(&self) -> &str;

    /// Human-readable name, also used as the prefix of source labels
    fn name(&self) -> &str;

    /// Identifier types this backend can be queried with
    fn capabilities(&self) -> IdCapabilities;

    /// Whether this backend accepts DOIs
    fn uses_doi(&self) -> bool {
        self.capabilities().contains(IdCapabilities::DOI)
    }

    /// Whether this backend accepts arXiv identifiers
    fn uses_arxiv(&self) -> bool {
        self.capabilities().contains(IdCapabilities::ARXIV)
    }

    /// Build the request URL for an already percent-encoded identifier
    fn build_url(&self, id: &Identifier) -> String;

    /// Extract the raw citation count from a decoded JSON response.
    ///
    /// The returned value is validated by the fetcher, so backends hand back
    /// whatever the API put in the field.
    async fn decode(&self, response: Value) -> Result<Value, DecodeError>;
}

/// Errors raised by a backend decoder
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The expected field is not present in the response
    #[error("missing field '{0}' in API response")]
    MissingField(String),
}

/// Look up a field by JSON pointer, failing with [`DecodeError::MissingField`]
pub(crate) fn lookup(response: &Value, pointer: &str) -> Result<Value, DecodeError> {
    response
        .pointer(pointer)
        .cloned()
        .ok_or_else(|| DecodeError::MissingField(pointer.trim_start_matches('/').replace('/', ".")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested() {
        let response = json!({"metadata": {"citation_count": 12}});
        assert_eq!(lookup(&response, "/metadata/citation_count").unwrap(), json!(12));
    }

    #[test]
    fn test_lookup_missing_names_the_field() {
        let err = lookup(&json!({"metadata": {}}), "/metadata/citation_count").unwrap_err();
        assert_eq!(err.to_string(), "missing field 'metadata.citation_count' in API response");
    }

    #[test]
    fn test_capabilities_flags() {
        let caps = IdCapabilities::DOI | IdCapabilities::ARXIV;
        assert!(caps.contains(IdCapabilities::DOI));
        assert!(caps.contains(IdCapabilities::ARXIV));
        assert!(!IdCapabilities::DOI.contains(IdCapabilities::ARXIV));
    }
}
