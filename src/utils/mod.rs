//! Utility modules supporting citation retrieval.
//!
//! - [`HttpClient`]: shared reqwest client implementing [`Transport`]
//! - [`Transport`]: single-request JSON GET, the seam the fetcher depends on
//!
//! # Fetching JSON
//!
//! ```rust,no_run
//! use citation_counts::utils::{HttpClient, Transport};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let body = client.get_json("https://inspirehep.net/api/arxiv/1207.7214").await?;
//! println!("{}", body["metadata"]["citation_count"]);
//! # Ok(())
//! # }
//! ```

mod http;

pub use http::{default_user_agent, HttpClient, Transport, TransportError};
