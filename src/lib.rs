//! # Citation Counts
//!
//! Retrieve citation counts for bibliographic items from Crossref, INSPIRE-HEP
//! or Semantic Scholar, using each item's DOI or arXiv identifier, and record
//! them in the item's `extra` field.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Item, Identifier)
//! - [`apis`]: Citation API backends with an extensible trait-based architecture
//! - [`retrieval`]: Identifier extraction, fetching, DOI/arXiv fallback, batches
//! - [`library`]: Item storage
//! - [`service`]: Manual and automatic retrieval triggers
//! - [`ui`]: Progress windows, messages and terminal output
//! - [`utils`]: HTTP client
//! - [`config`]: Configuration and preferences

pub mod apis;
pub mod config;
pub mod library;
pub mod models;
pub mod retrieval;
pub mod service;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use apis::{ApiRegistry, CitationApi};
pub use library::{ItemStore, Library};
pub use models::Item;
pub use retrieval::{BatchJob, BatchReport, RetrievalError};
pub use service::CitationService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
