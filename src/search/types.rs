use crate::error::{Result, WebWaddleError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// A single search hit: snippet text, title, and the page it came from
///
/// Invariant: `snippet` and `title` are trimmed and non-empty, `link` is an
/// absolute http(s) URL. [`SearchResult::new`] enforces it, and
/// deserialization goes through the same checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSearchResult")]
pub struct SearchResult {
    pub snippet: String,
    pub title: String,
    pub link: Url,
}

impl SearchResult {
    /// Build a result from raw strings, validating every field
    ///
    /// # Errors
    /// - `InvalidResult` if snippet or title is blank, or the link is not http(s)
    /// - `UrlError` if the link does not parse at all
    pub fn new(snippet: &str, title: &str, link: &str) -> Result<Self> {
        let snippet = snippet.trim();
        let title = title.trim();

        if snippet.is_empty() {
            return Err(WebWaddleError::InvalidResult("empty snippet".to_string()));
        }
        if title.is_empty() {
            return Err(WebWaddleError::InvalidResult("empty title".to_string()));
        }

        let link = Url::parse(link.trim())?;
        if !matches!(link.scheme(), "http" | "https") {
            return Err(WebWaddleError::InvalidResult(format!(
                "unsupported link scheme '{}'",
                link.scheme()
            )));
        }

        Ok(Self {
            snippet: snippet.to_string(),
            title: title.to_string(),
            link,
        })
    }

    /// Replace the snippet, keeping the old one if the new text is blank
    pub fn with_snippet(mut self, snippet: &str) -> Self {
        let snippet = snippet.trim();
        if !snippet.is_empty() {
            self.snippet = snippet.to_string();
        }
        self
    }
}

/// Unvalidated wire form of a SearchResult
#[derive(Deserialize)]
struct RawSearchResult {
    snippet: String,
    title: String,
    link: String,
}

impl TryFrom<RawSearchResult> for SearchResult {
    type Error = WebWaddleError;

    fn try_from(raw: RawSearchResult) -> Result<Self> {
        SearchResult::new(&raw.snippet, &raw.title, &raw.link)
    }
}

/// Ordered list of search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub results: Vec<SearchResult>,
}

impl SearchResults {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.results.iter()
    }

    pub fn links(&self) -> Vec<&Url> {
        self.results.iter().map(|r| &r.link).collect()
    }

    /// Append another result set, skipping links we already hold
    ///
    /// The first occurrence of a link wins, so merge order is significant.
    pub fn merge(&mut self, other: SearchResults) {
        let mut seen: HashSet<Url> = self.links().into_iter().cloned().collect();
        for result in other.results {
            if seen.insert(result.link.clone()) {
                self.results.push(result);
            }
        }
    }
}

impl IntoIterator for SearchResults {
    type Item = SearchResult;
    type IntoIter = std::vec::IntoIter<SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl FromIterator<SearchResult> for SearchResults {
    fn from_iter<I: IntoIterator<Item = SearchResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}
