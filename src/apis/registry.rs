//! Registry for the available citation-count backends.

use std::sync::Arc;
use std::time::Duration;

use super::{CitationApi, CrossrefApi, InspireApi, SemanticScholarApi};
use crate::retrieval::RetrievalError;

bitflags::bitflags! {
    /// Identifier types a backend accepts
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IdCapabilities: u32 {
        const DOI = 1 << 0;
        const ARXIV = 1 << 1;
    }
}

/// Registry for all available backends
///
/// Backends keep their registration order, which is the order they are
/// offered in menus and listings.
#[derive(Debug, Clone)]
pub struct ApiRegistry {
    apis: Vec<Arc<dyn CitationApi>>,
}

impl ApiRegistry {
    /// Create a new registry with the built-in backends
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register(Arc::new(CrossrefApi::new()));
        registry.register(Arc::new(InspireApi::new()));
        registry.register(Arc::new(SemanticScholarApi::new()));

        registry
    }

    /// Create the built-in registry with a custom Semantic Scholar delay
    pub fn with_semantic_throttle(throttle: Duration) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SemanticScholarApi::new().with_throttle(throttle)));
        registry
    }

    /// Create a registry without any backends
    pub fn empty() -> Self {
        Self { apis: Vec::new() }
    }

    /// Register a backend, replacing any backend with the same key in place
    pub fn register(&mut self, api: Arc<dyn CitationApi>) {
        match self.apis.iter().position(|a| a.key() == api.key()) {
            Some(idx) => self.apis[idx] = api,
            None => self.apis.push(api),
        }
    }

    /// Get a backend by key
    pub fn get(&self, key: &str) -> Option<&Arc<dyn CitationApi>> {
        self.apis.iter().find(|a| a.key() == key)
    }

    /// Get a backend by key, returning an error if not found
    pub fn get_required(&self, key: &str) -> Result<&Arc<dyn CitationApi>, RetrievalError> {
        self.get(key)
            .ok_or_else(|| RetrievalError::UnknownApi(key.to_string()))
    }

    /// All registered backends in registration order
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn CitationApi>> {
        self.apis.iter()
    }

    /// All backend keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.apis.iter().map(|a| a.key())
    }

    pub fn len(&self) -> usize {
        self.apis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apis.is_empty()
    }
}

impl Default for ApiRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::MockApi;

    #[test]
    fn test_registry_basic() {
        let registry = ApiRegistry::new();

        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
        assert_eq!(
            registry.keys().collect::<Vec<_>>(),
            vec!["crossref", "inspire", "semanticscholar"]
        );
    }

    #[test]
    fn test_get_api() {
        let registry = ApiRegistry::new();

        let inspire = registry.get("inspire");
        assert!(inspire.is_some());
        assert_eq!(inspire.unwrap().name(), "INSPIRE-HEP");

        assert!(registry.get("nonexistent").is_none());
        assert!(matches!(
            registry.get_required("nonexistent"),
            Err(RetrievalError::UnknownApi(_))
        ));
    }

    #[test]
    fn test_capabilities() {
        let registry = ApiRegistry::new();

        let crossref = registry.get("crossref").unwrap();
        assert!(crossref.uses_doi());
        assert!(!crossref.uses_arxiv());

        for key in ["inspire", "semanticscholar"] {
            let api = registry.get(key).unwrap();
            assert!(api.uses_doi() && api.uses_arxiv(), "{} should accept both", key);
        }
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut registry = ApiRegistry::new();
        registry.register(Arc::new(MockApi::new("inspire", "Mock INSPIRE")));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.keys().nth(1), Some("inspire"));
        assert_eq!(registry.get("inspire").unwrap().name(), "Mock INSPIRE");
    }

    #[test]
    fn test_semantic_throttle_override_keeps_order() {
        let registry = ApiRegistry::with_semantic_throttle(Duration::ZERO);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.keys().last(), Some("semanticscholar"));
    }
}
