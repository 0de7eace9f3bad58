mod duckduckgo;
mod parser;
mod types;

pub use duckduckgo::{
    DuckDuckGoSearch, DEFAULT_MAX_RESULTS, DEFAULT_REGION, DEFAULT_SEARCH_URL, NO_RESULT_TEXT,
};
pub use parser::{format_listing, parse_results};
pub use types::{SearchResult, SearchResults};

use crate::error::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Web search backend
///
/// Engines answer in two shapes: a textual result listing
/// (`[snippet: .., title: .., link: ..], ...`) that `parse_results` turns into
/// records, and a plain-text digest of the top snippets used to enrich a
/// single result.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Run the query and return the textual result listing
    async fn results_text(&self, query: &str) -> Result<String>;

    /// Run the query and return its top snippets as one block of text
    async fn run(&self, query: &str) -> Result<String>;

    /// Engine name for logging
    fn name(&self) -> &'static str;
}
