//! HTTP client utilities.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Errors raised while fetching a JSON document
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, TLS or protocol failure
    #[error("Network error: {0}")]
    Network(String),

    /// The response body is not valid JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
}

/// Something that can GET a URL and decode the body as JSON.
///
/// One call is exactly one request; implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn get_json(&self, url: &str) -> Result<Value, TransportError>;
}

/// Shared HTTP client
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, TransportError> {
        Self::with_user_agent(default_user_agent(), None)
    }

    /// Create a new HTTP client with a custom user agent.
    ///
    /// Without a `timeout` a request waits as long as the server keeps the
    /// connection open.
    pub fn with_user_agent(
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, TransportError> {
        let mut builder = Client::builder()
            .user_agent(user_agent)
            .pool_idle_timeout(Duration::from_secs(90));

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }
}

/// `citation-counts/<version>`
pub fn default_user_agent() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
}

#[async_trait]
impl Transport for HttpClient {
    async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        tracing::debug!("{} -> {}", url, response.status());

        // Error statuses still carry a body worth decoding; a JSON error
        // document is left for the backend decoder to reject.
        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::InvalidJson(e.to_string()))
    }
}
