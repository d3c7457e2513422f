//! Entry points for triggering citation retrieval.
//!
//! [`CitationService`] bundles the backends, the HTTP transport and the message
//! catalogue. Batches run either on request for a chosen backend
//! ([`CitationService::update_items`]) or automatically for newly added items
//! according to the auto-retrieve preference
//! ([`CitationService::on_items_added`]).

use std::sync::Arc;
use std::time::Duration;

use crate::apis::ApiRegistry;
use crate::config::{Config, Preferences};
use crate::library::ItemStore;
use crate::models::Item;
use crate::retrieval::{self, BatchJob, BatchReport, RetrievalError, Retrieved};
use crate::ui::{Localization, ProgressWindow};
use crate::utils::{HttpClient, Transport, TransportError};

pub struct CitationService {
    registry: ApiRegistry,
    transport: Arc<dyn Transport>,
    l10n: Localization,
    close_delay: Duration,
}

impl CitationService {
    pub fn new(registry: ApiRegistry, transport: Arc<dyn Transport>) -> Self {
        Self {
            registry,
            transport,
            l10n: Localization::new(),
            close_delay: retrieval::DEFAULT_CLOSE_DELAY,
        }
    }

    /// Build the service with the built-in backends and an HTTP client
    /// configured from `config`
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let client = HttpClient::with_user_agent(&config.http.user_agent, config.http.timeout())?;
        let registry = ApiRegistry::with_semantic_throttle(config.semantic_scholar.throttle());

        Ok(Self::new(registry, Arc::new(client)).with_close_delay(config.progress.close_delay()))
    }

    pub fn with_localization(mut self, l10n: Localization) -> Self {
        self.l10n = l10n;
        self
    }

    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
        self
    }

    pub fn registry(&self) -> &ApiRegistry {
        &self.registry
    }

    pub fn localization(&self) -> &Localization {
        &self.l10n
    }

    /// Retrieve citation counts for `items` from the backend `api_key`
    pub async fn update_items(
        &self,
        items: Vec<Item>,
        api_key: &str,
        store: &mut dyn ItemStore,
        progress: &mut dyn ProgressWindow,
    ) -> Result<BatchReport, RetrievalError> {
        let api = Arc::clone(self.registry.get_required(api_key)?);

        let mut job = BatchJob::new(items, api, Arc::clone(&self.transport))
            .with_localization(self.l10n.clone())
            .with_close_delay(self.close_delay);

        Ok(job.run(store, progress).await)
    }

    /// Handle newly added items.
    ///
    /// Runs a batch from the preferred backend, or returns `None` when
    /// auto-retrieval is disabled.
    pub async fn on_items_added(
        &self,
        items: Vec<Item>,
        prefs: &Preferences,
        store: &mut dyn ItemStore,
        progress: &mut dyn ProgressWindow,
    ) -> Option<BatchReport> {
        let api = prefs.autoretrieve_api(&self.registry)?;
        tracing::debug!("Auto-retrieving citation counts from {}", api.name());

        let mut job = BatchJob::new(items, Arc::clone(api), Arc::clone(&self.transport))
            .with_localization(self.l10n.clone())
            .with_close_delay(self.close_delay);

        Some(job.run(store, progress).await)
    }

    /// Retrieve a single item's count without storing it
    pub async fn retrieve(&self, item: &Item, api_key: &str) -> Result<Retrieved, RetrievalError> {
        let api = self.registry.get_required(api_key)?;
        retrieval::retrieve(item, api.as_ref(), self.transport.as_ref()).await
    }
}
