//! DOI / arXiv fallback for a single item.

use super::{extract_arxiv, extract_doi, fetch_count, RetrievalError};
use crate::apis::CitationApi;
use crate::models::{IdType, Item};
use crate::utils::Transport;

/// A successfully retrieved citation count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retrieved {
    pub count: u64,

    /// Backend and identifier type that produced the count, e.g. `Crossref/DOI`
    pub source: String,
}

impl Retrieved {
    fn new(count: u64, api: &dyn CitationApi, id_type: IdType) -> Self {
        Self {
            count,
            source: format!("{}/{}", api.name(), id_type.label()),
        }
    }
}

/// Why one identifier path failed
struct PathFailure {
    /// The identifier was present, so the request or decode is what failed
    identifier_found: bool,
    error: RetrievalError,
}

async fn try_path(
    item: &Item,
    api: &dyn CitationApi,
    transport: &dyn Transport,
    id_type: IdType,
) -> Result<u64, PathFailure> {
    let extracted = match id_type {
        IdType::Doi => extract_doi(item),
        IdType::Arxiv => extract_arxiv(item),
    };
    let id = extracted.map_err(|error| PathFailure {
        identifier_found: false,
        error,
    })?;

    let url = api.build_url(&id);
    tracing::debug!("Fetching {} citation count for {} via {}", api.name(), item.key, id);

    fetch_count(transport, &url, api)
        .await
        .map_err(|error| PathFailure {
            identifier_found: true,
            error,
        })
}

/// Retrieve the citation count of `item` from `api`.
///
/// The DOI is tried first when the backend accepts one and wins whenever it
/// resolves. Otherwise the arXiv identifier is tried. When both paths fail the
/// error reported is, in order of preference:
///
/// 1. [`RetrievalError::NoDoiOrArxiv`] if the item carries neither identifier
/// 2. the DOI path's error if a DOI was present but its lookup failed
/// 3. the arXiv path's error
pub async fn retrieve(
    item: &Item,
    api: &dyn CitationApi,
    transport: &dyn Transport,
) -> Result<Retrieved, RetrievalError> {
    let mut doi_failure = None;

    if api.uses_doi() {
        match try_path(item, api, transport, IdType::Doi).await {
            Ok(count) => return Ok(Retrieved::new(count, api, IdType::Doi)),
            Err(failure) if !api.uses_arxiv() => return Err(failure.error),
            Err(failure) => doi_failure = Some(failure),
        }
    }

    if api.uses_arxiv() {
        let arxiv_failure = match try_path(item, api, transport, IdType::Arxiv).await {
            Ok(count) => return Ok(Retrieved::new(count, api, IdType::Arxiv)),
            Err(failure) => failure,
        };

        return Err(match doi_failure {
            Some(doi) if !doi.identifier_found && !arxiv_failure.identifier_found => {
                RetrievalError::NoDoiOrArxiv
            }
            Some(doi) if doi.identifier_found => doi.error,
            _ => arxiv_failure.error,
        });
    }

    Err(RetrievalError::Internal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::mock::MockTransport;
    use crate::apis::{IdCapabilities, MockApi};
    use crate::models::Identifier;
    use serde_json::json;

    const ARXIV_URL: &str = "https://arxiv.org/abs/1234.5678";

    fn both() -> MockApi {
        MockApi::new("mock", "Mock")
    }

    fn doi_url(api: &MockApi) -> String {
        api.url_for(&Identifier::doi("10.1/xyz"))
    }

    fn arxiv_url(api: &MockApi) -> String {
        api.url_for(&Identifier::arxiv("1234.5678"))
    }

    #[tokio::test]
    async fn test_doi_wins_without_touching_arxiv() {
        let api = both();
        let transport = MockTransport::new();
        transport.respond_json(doi_url(&api), json!({"count": 42}));
        transport.respond_json(arxiv_url(&api), json!({"count": 1}));

        let item = Item::new("K", "T").with_doi("10.1/xyz").with_url(ARXIV_URL);
        let result = retrieve(&item, &api, &transport).await.unwrap();

        assert_eq!(result.count, 42);
        assert_eq!(result.source, "Mock/DOI");
        assert_eq!(transport.requests(), vec![doi_url(&api)]);
    }

    #[tokio::test]
    async fn test_arxiv_used_without_doi() {
        let api = both();
        let transport = MockTransport::new();
        transport.respond_json(arxiv_url(&api), json!({"count": 7}));

        let item = Item::new("K", "T").with_url(ARXIV_URL);
        let result = retrieve(&item, &api, &transport).await.unwrap();

        assert_eq!(result, Retrieved { count: 7, source: "Mock/arXiv".into() });
    }

    #[tokio::test]
    async fn test_arxiv_used_when_doi_lookup_fails() {
        let api = both();
        let transport = MockTransport::new();
        transport.respond_json(doi_url(&api), json!({"message": "not found"}));
        transport.respond_json(arxiv_url(&api), json!({"count": 3}));

        let item = Item::new("K", "T").with_doi("10.1/xyz").with_url(ARXIV_URL);
        let result = retrieve(&item, &api, &transport).await.unwrap();

        assert_eq!(result.source, "Mock/arXiv");
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_neither_identifier() {
        let api = both();
        let transport = MockTransport::new();

        let item = Item::new("K", "T").with_url("https://example.org/paper");
        let err = retrieve(&item, &api, &transport).await.unwrap_err();

        assert_eq!(err, RetrievalError::NoDoiOrArxiv);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_doi_only_backend_propagates_doi_error() {
        let api = both().with_capabilities(IdCapabilities::DOI);
        let transport = MockTransport::new();
        transport.respond_not_json(doi_url(&api));

        let item = Item::new("K", "T").with_doi("10.1/xyz").with_url(ARXIV_URL);
        assert_eq!(
            retrieve(&item, &api, &transport).await,
            Err(RetrievalError::BadApiResponse)
        );

        let item = Item::new("K", "T").with_url(ARXIV_URL);
        assert_eq!(retrieve(&item, &api, &transport).await, Err(RetrievalError::NoDoi));
    }

    #[tokio::test]
    async fn test_arxiv_only_backend() {
        let api = both().with_capabilities(IdCapabilities::ARXIV);
        let transport = MockTransport::new();

        let item = Item::new("K", "T").with_doi("10.1/xyz");
        assert_eq!(retrieve(&item, &api, &transport).await, Err(RetrievalError::NoArxiv));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_doi_lookup_error_beats_missing_arxiv() {
        let api = both();
        let transport = MockTransport::new();
        transport.respond_not_json(doi_url(&api));

        let item = Item::new("K", "T").with_doi("10.1/xyz");
        assert_eq!(
            retrieve(&item, &api, &transport).await,
            Err(RetrievalError::BadApiResponse)
        );
    }

    #[tokio::test]
    async fn test_doi_lookup_error_beats_arxiv_lookup_error() {
        let api = both();
        let transport = MockTransport::new();
        transport.respond_json(doi_url(&api), json!({"count": "n/a"}));
        transport.respond_not_json(arxiv_url(&api));

        let item = Item::new("K", "T").with_doi("10.1/xyz").with_url(ARXIV_URL);
        assert_eq!(
            retrieve(&item, &api, &transport).await,
            Err(RetrievalError::NoCitationCount)
        );
    }

    #[tokio::test]
    async fn test_arxiv_lookup_error_when_no_doi() {
        let api = both();
        let transport = MockTransport::new();
        transport.respond_json(arxiv_url(&api), json!({"count": null}));

        let item = Item::new("K", "T").with_url(ARXIV_URL);
        assert_eq!(
            retrieve(&item, &api, &transport).await,
            Err(RetrievalError::NoCitationCount)
        );
    }

    #[tokio::test]
    async fn test_backend_without_capabilities() {
        let api = both().with_capabilities(IdCapabilities::empty());
        let transport = MockTransport::new();

        let item = Item::new("K", "T").with_doi("10.1/xyz");
        assert_eq!(retrieve(&item, &api, &transport).await, Err(RetrievalError::Internal));
    }
}
