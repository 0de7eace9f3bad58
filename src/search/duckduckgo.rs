// DuckDuckGo search backend
//
// Scrapes the no-JavaScript HTML endpoint (no API key required) and renders
// the hits in the textual listing format the parser consumes.

use super::parser::{collapse_whitespace, format_listing};
use super::SearchEngine;
use crate::error::{Result, WebWaddleError};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use url::Url;

pub const DEFAULT_SEARCH_URL: &str = "https://html.duckduckgo.com/html/";
pub const DEFAULT_REGION: &str = "wt-wt";
pub const DEFAULT_MAX_RESULTS: usize = 4;

/// Returned by [`SearchEngine::run`] when the page has no usable hits
pub const NO_RESULT_TEXT: &str = "No good DuckDuckGo Search Result was found";

// The HTML endpoint serves an empty page to unknown agents
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko)";

/// A scraped hit before validation into a SearchResult
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Hit {
    pub snippet: String,
    pub title: String,
    pub link: String,
}

pub struct DuckDuckGoSearch {
    client: Client,
    base_url: String,
    region: String,
    max_results: usize,
}

impl DuckDuckGoSearch {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent(BROWSER_USER_AGENT)
                .build()
                .unwrap_or_default(),
            base_url: DEFAULT_SEARCH_URL.to_string(),
            region: DEFAULT_REGION.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Point at a different endpoint (self-hosted proxy, test server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// DuckDuckGo region code, e.g. "us-en" or "wt-wt" for no region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    async fn fetch_hits(&self, query: &str) -> Result<Vec<Hit>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WebWaddleError::SearchError(
                "search query must not be empty".to_string(),
            ));
        }

        tracing::debug!("Searching DuckDuckGo: {}", query);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("kl", self.region.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WebWaddleError::SearchError(format!(
                "DuckDuckGo returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let html = response.text().await?;
        let hits = parse_html(&html, self.max_results);

        tracing::info!("DuckDuckGo returned {} hits for '{}'", hits.len(), query);
        Ok(hits)
    }
}

impl Default for DuckDuckGoSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchEngine for DuckDuckGoSearch {
    async fn results_text(&self, query: &str) -> Result<String> {
        let hits = self.fetch_hits(query).await?;
        Ok(format_listing(
            hits.iter()
                .map(|h| (h.snippet.as_str(), h.title.as_str(), h.link.as_str())),
        ))
    }

    async fn run(&self, query: &str) -> Result<String> {
        let hits = self.fetch_hits(query).await?;
        if hits.is_empty() {
            return Ok(NO_RESULT_TEXT.to_string());
        }

        Ok(hits
            .iter()
            .map(|h| h.snippet.as_str())
            .collect::<Vec<_>>()
            .join(" "))
    }

    fn name(&self) -> &'static str {
        "DuckDuckGo"
    }
}

fn hit_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| {
        Selector::parse("a.result__a, .result__snippet").expect("hit selector is valid")
    })
}

/// Pull up to `max_results` hits out of a DuckDuckGo HTML results page
///
/// Title anchors and snippets are walked in document order. Each
/// `result__a` anchor takes the first `result__snippet` that follows it
/// before the next anchor. Hits without a snippet, sponsored links, and links
/// that cannot be resolved are dropped.
pub(crate) fn parse_html(html: &str, max_results: usize) -> Vec<Hit> {
    let document = Html::parse_document(html);
    let mut hits = Vec::new();
    let mut pending: Option<PendingHit> = None;

    for element in document.select(hit_selector()) {
        if hits.len() >= max_results {
            return hits;
        }

        if element.value().classes().any(|c| c == "result__a") {
            if let Some(hit) = pending.take().and_then(PendingHit::finish) {
                hits.push(hit);
            }

            let href = element.value().attr("href").unwrap_or_default();
            let link = resolve_link(href);
            if link.is_none() {
                tracing::debug!("Dropping unresolvable or sponsored link: {}", href);
            }

            pending = Some(PendingHit {
                title: element_text(element),
                link,
                snippet: None,
            });
        } else if let Some(hit) = pending.as_mut() {
            if hit.snippet.is_none() {
                hit.snippet = Some(element_text(element));
            }
        }
    }

    if hits.len() < max_results {
        if let Some(hit) = pending.and_then(PendingHit::finish) {
            hits.push(hit);
        }
    }

    hits
}

/// An anchor seen on the page, waiting for its snippet
struct PendingHit {
    title: String,
    link: Option<String>,
    snippet: Option<String>,
}

impl PendingHit {
    fn finish(self) -> Option<Hit> {
        let link = self.link?;
        let snippet = self.snippet.filter(|s| !s.is_empty())?;
        if self.title.is_empty() {
            return None;
        }

        Some(Hit {
            snippet,
            title: self.title,
            link,
        })
    }
}

/// Visible text of an element with whitespace collapsed
fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Turn a result href into the destination URL
///
/// Redirect links carry the target in the `uddg` parameter; ad links go
/// through `y.js` and are rejected.
fn resolve_link(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    let url = Url::parse(&absolute).ok()?;
    let is_ddg = url
        .host_str()
        .map(|h| h == "duckduckgo.com" || h.ends_with(".duckduckgo.com"))
        .unwrap_or(false);

    if !is_ddg {
        return Some(url.to_string());
    }

    if url.path().starts_with("/y.js") {
        return None;
    }

    url.query_pairs()
        .find(|(k, _)| k == "uddg")
        .map(|(_, v)| v.into_owned())
        .filter(|target| Url::parse(target).is_ok())
}
