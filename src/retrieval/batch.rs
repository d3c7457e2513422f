//! Sequential batch processing with per-item failure isolation.

use std::sync::Arc;
use std::time::Duration;

use super::{retrieve, set_citation_count, RetrievalError};
use crate::apis::CitationApi;
use crate::library::{ItemStore, StoreError};
use crate::models::Item;
use crate::ui::{Icon, ItemId, Localization, ProgressWindow};
use crate::utils::Transport;

/// Delay before the finished progress window is dismissed
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_secs(5);

/// Where a batch is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    /// `cursor` is the index of the next item to process
    Running { cursor: usize },
    Finished,
}

/// Why a single item of a batch failed
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("could not save item: {0}")]
    Store(#[from] StoreError),
}

impl ItemError {
    /// User-facing message, with the backend name substituted where needed
    pub fn localized(&self, l10n: &Localization, api_name: &str) -> String {
        let id = match self {
            ItemError::Retrieval(e) => e.message_id(),
            ItemError::Store(_) => "citationcounts-progresswindow-error-save",
        };
        l10n.format_value(id, Some(api_name))
    }
}

/// Result for one item
#[derive(Debug)]
pub enum ItemOutcome {
    Succeeded { count: u64, source: String },
    Failed { error: ItemError, message: String },
}

#[derive(Debug)]
pub struct ItemReport {
    pub key: String,
    pub title: String,
    pub outcome: ItemOutcome,
}

/// Per-item outcomes of a finished batch, in input order
#[derive(Debug)]
pub struct BatchReport {
    /// Display name of the backend
    pub api: String,
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.items
            .iter()
            .filter(|r| matches!(r.outcome, ItemOutcome::Succeeded { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    pub fn get(&self, key: &str) -> Option<&ItemReport> {
        self.items.iter().find(|r| r.key == key)
    }
}

/// One run of citation retrieval over a list of items.
///
/// Items are processed strictly one after another. Each is fully resolved,
/// including the store write, before the next request is sent, and a failure
/// is only ever recorded against the item that caused it.
pub struct BatchJob {
    items: Vec<Item>,
    api: Arc<dyn CitationApi>,
    transport: Arc<dyn Transport>,
    l10n: Localization,
    close_delay: Duration,
    state: BatchState,
    indicators: Vec<ItemId>,
    reports: Vec<ItemReport>,
}

impl BatchJob {
    /// Create a batch. Feed items are dropped here and never processed.
    pub fn new(items: Vec<Item>, api: Arc<dyn CitationApi>, transport: Arc<dyn Transport>) -> Self {
        let items: Vec<Item> = items.into_iter().filter(|i| !i.is_feed_item()).collect();

        Self {
            items,
            api,
            transport,
            l10n: Localization::new(),
            close_delay: DEFAULT_CLOSE_DELAY,
            state: BatchState::Idle,
            indicators: Vec::new(),
            reports: Vec::new(),
        }
    }

    pub fn with_localization(mut self, l10n: Localization) -> Self {
        self.l10n = l10n;
        self
    }

    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
        self
    }

    /// Whether there is nothing to process
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// The batch's items, with `extra` rewritten for those the store accepted
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Open the progress window with a pending line per item.
    ///
    /// An empty batch finishes immediately without touching `progress`.
    pub fn start(&mut self, progress: &mut dyn ProgressWindow) {
        if self.state != BatchState::Idle {
            return;
        }

        if self.items.is_empty() {
            self.state = BatchState::Finished;
            return;
        }

        let headline = self
            .l10n
            .format_value("citationcounts-progresswindow-headline", Some(self.api.name()));
        progress.change_headline(&headline, Some(Icon::Search));

        self.indicators = self
            .items
            .iter()
            .map(|item| progress.add_item(Icon::Spinner, &item.title))
            .collect();
        progress.show();

        tracing::info!(
            "Retrieving citation counts for {} items from {}",
            self.items.len(),
            self.api.name()
        );
        self.state = BatchState::Running { cursor: 0 };
    }

    /// Process the item under the cursor. Returns whether items remain.
    pub async fn step(
        &mut self,
        store: &mut dyn ItemStore,
        progress: &mut dyn ProgressWindow,
    ) -> bool {
        let BatchState::Running { cursor } = self.state else {
            return false;
        };

        let api = Arc::clone(&self.api);
        let transport = Arc::clone(&self.transport);
        let indicator = self.indicators[cursor];
        let item = &self.items[cursor];

        // The batch copy only changes once the store has taken the write
        let result = match retrieve(item, api.as_ref(), transport.as_ref()).await {
            Ok(found) => {
                let mut updated = item.clone();
                match set_citation_count(&mut updated, store, &found.source, found.count) {
                    Ok(()) => Ok((found, updated)),
                    Err(e) => Err(ItemError::from(e)),
                }
            }
            Err(e) => Err(ItemError::from(e)),
        };

        let item = &mut self.items[cursor];

        let outcome = match result {
            Ok((found, updated)) => {
                *item = updated;
                progress.set_icon(indicator, Icon::Tick);
                progress.set_progress(indicator, 100);
                tracing::debug!("{}: {} citations ({})", item.key, found.count, found.source);

                ItemOutcome::Succeeded {
                    count: found.count,
                    source: found.source,
                }
            }
            Err(error) => {
                let message = error.localized(&self.l10n, api.name());
                progress.set_error(indicator);
                progress.add_sub_item(indicator, Icon::Warning, &message);
                tracing::warn!("{}: {} ({})", item.key, message, error);

                ItemOutcome::Failed { error, message }
            }
        };

        self.reports.push(ItemReport {
            key: item.key.clone(),
            title: item.title.clone(),
            outcome,
        });

        let next = cursor + 1;
        if next < self.items.len() {
            self.state = BatchState::Running { cursor: next };
            true
        } else {
            self.finish(progress);
            false
        }
    }

    fn finish(&mut self, progress: &mut dyn ProgressWindow) {
        let headline = self.l10n.format_value(
            "citationcounts-progresswindow-finished-headline",
            Some(self.api.name()),
        );
        progress.change_headline(&headline, None);
        progress.start_close_timer(self.close_delay);

        tracing::info!(
            "Finished {} items from {}: {} failed",
            self.reports.len(),
            self.api.name(),
            self.reports
                .iter()
                .filter(|r| matches!(r.outcome, ItemOutcome::Failed { .. }))
                .count()
        );
        self.state = BatchState::Finished;
    }

    /// Drive the batch to completion
    pub async fn run(
        &mut self,
        store: &mut dyn ItemStore,
        progress: &mut dyn ProgressWindow,
    ) -> BatchReport {
        self.start(progress);
        while self.step(store, progress).await {}
        self.report()
    }

    /// Take the outcomes recorded so far
    pub fn report(&mut self) -> BatchReport {
        BatchReport {
            api: self.api.name().to_string(),
            items: std::mem::take(&mut self.reports),
        }
    }
}
