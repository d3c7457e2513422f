//! Citation-count retrieval.
//!
//! The pieces, leaves first:
//!
//! - [`extract_doi`] / [`extract_arxiv`]: pull an encoded identifier out of an item
//! - [`fetch_count`]: one GET, JSON decode, backend decode, count validation
//! - [`retrieve`]: DOI-then-arXiv fallback with error precedence
//! - [`merge_citation_count`] / [`set_citation_count`]: idempotent rewrite of `extra`
//! - [`BatchJob`]: sequential per-item driver reporting to a progress surface
//!
//! Every failure is scoped to one item. A batch never aborts because a single
//! item could not be resolved.

mod batch;
mod extract;
mod extra_field;
mod fetch;
mod orchestrator;

pub use batch::{
    BatchJob, BatchReport, BatchState, ItemError, ItemOutcome, ItemReport, DEFAULT_CLOSE_DELAY,
};
pub use extract::{extract_arxiv, extract_doi};
pub use extra_field::{
    citation_count_column, citation_line, merge_citation_count, set_citation_count,
};
pub use fetch::{coerce_count, fetch_count};
pub use orchestrator::{retrieve, Retrieved};

/// Reasons a citation count could not be retrieved for an item
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RetrievalError {
    /// The item has no usable DOI
    #[error("No DOI field exists on the item")]
    NoDoi,

    /// The item's URL holds no recognizable arXiv identifier
    #[error("No arXiv id found on the item")]
    NoArxiv,

    /// Neither identifier is present
    #[error("No DOI / arXiv id found on the item")]
    NoDoiOrArxiv,

    /// Transport failure or a body that is not JSON
    #[error("Bad API response")]
    BadApiResponse,

    /// JSON parsed but no valid non-negative count was found
    #[error("No citation count found")]
    NoCitationCount,

    /// The backend accepts neither DOIs nor arXiv identifiers
    #[error("Internal error")]
    Internal,

    /// No backend is registered under the requested key
    #[error("Unknown citation API: {0}")]
    UnknownApi(String),
}

impl RetrievalError {
    /// Message id used to look up the user-facing text
    pub fn message_id(&self) -> &'static str {
        match self {
            RetrievalError::NoDoi => "citationcounts-progresswindow-error-no-doi",
            RetrievalError::NoArxiv => "citationcounts-progresswindow-error-no-arxiv",
            RetrievalError::NoDoiOrArxiv => "citationcounts-progresswindow-error-no-doi-or-arxiv",
            RetrievalError::BadApiResponse => "citationcounts-progresswindow-error-bad-api-response",
            RetrievalError::NoCitationCount => {
                "citationcounts-progresswindow-error-no-citation-count"
            }
            RetrievalError::Internal => "citationcounts-internal-error",
            RetrievalError::UnknownApi(_) => "citationcounts-error-unknown-api",
        }
    }
}
