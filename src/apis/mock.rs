//! Mock backend and transport for testing purposes.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::apis::{lookup, CitationApi, DecodeError, IdCapabilities};
use crate::models::Identifier;
use crate::utils::{Transport, TransportError};

/// A mock backend with configurable key, name and capabilities.
///
/// URLs have the form `mock://{key}/{doi|arxiv}/{id}` and the count is read from
/// the `count` field of the response.
#[derive(Debug, Clone)]
pub struct MockApi {
    key: String,
    name: String,
    capabilities: IdCapabilities,
}

impl MockApi {
    /// Create a mock backend accepting both DOIs and arXiv identifiers
    pub fn new(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            capabilities: IdCapabilities::DOI | IdCapabilities::ARXIV,
        }
    }

    pub fn with_capabilities(mut self, capabilities: IdCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// URL this backend builds for an identifier
    pub fn url_for(&self, id: &Identifier) -> String {
        format!("mock://{}/{}/{}", self.key, id.id_type(), id.value())
    }
}

#[async_trait]
impl CitationApi for MockApi {
    fn key(&self) -> &str {
        &self.key
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> IdCapabilities {
        self.capabilities
    }

    fn build_url(&self, id: &Identifier) -> String {
        self.url_for(id)
    }

    async fn decode(&self, response: Value) -> Result<Value, DecodeError> {
        lookup(&response, "/count")
    }
}

/// Canned response served by [`MockTransport`]
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A parsed JSON body
    Json(Value),
    /// A body that is not valid JSON
    NotJson,
}

/// A transport that serves canned responses by URL and records every request.
///
/// Requests for unknown URLs fail as network errors.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, MockResponse>>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`
    pub fn respond_json(&self, url: impl Into<String>, body: Value) -> &Self {
        self.insert(url.into(), MockResponse::Json(body))
    }

    /// Serve a non-JSON body for `url`
    pub fn respond_not_json(&self, url: impl Into<String>) -> &Self {
        self.insert(url.into(), MockResponse::NotJson)
    }

    fn insert(&self, url: String, response: MockResponse) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(url, response);
        self
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(url.to_string());

        let response = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(url)
            .cloned();

        match response {
            Some(MockResponse::Json(body)) => Ok(body),
            Some(MockResponse::NotJson) => Err(TransportError::InvalidJson(
                "expected value at line 1 column 1".to_string(),
            )),
            None => Err(TransportError::Network(format!("no route to {}", url))),
        }
    }
}
