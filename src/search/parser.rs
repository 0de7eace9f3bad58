// Parser for the engine's textual result listing
//
// Engines hand back a single line of the form
//   [snippet: ..., title: ..., link: ...], [snippet: ..., title: ..., link: ...]
// which is turned into structured SearchResults here.

use super::types::{SearchResult, SearchResults};
use regex::Regex;
use std::sync::OnceLock;

fn listing_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)snippet: (.*?), title: (.*?), link: (.*?)\]?(?:, \[|$)")
            .expect("listing pattern is valid")
    })
}

/// Extract every (snippet, title, link) triple from a textual listing
///
/// Triples that do not form a valid [`SearchResult`] are skipped with a
/// warning; this never fails.
pub fn parse_results(raw: &str) -> SearchResults {
    let raw = raw.trim();
    let mut results = Vec::new();

    for caps in listing_pattern().captures_iter(raw) {
        let snippet = &caps[1];
        let title = &caps[2];
        let link = &caps[3];

        match SearchResult::new(snippet, title, link) {
            Ok(result) => results.push(result),
            Err(e) => {
                tracing::warn!("Skipping search result '{}': {}", title.trim(), e);
            }
        }
    }

    tracing::debug!("Parsed {} search results from listing", results.len());
    SearchResults::new(results)
}

/// Render hits in the textual listing format that [`parse_results`] reads
///
/// Whitespace inside each field is collapsed so the listing stays on one line.
pub fn format_listing<'a, I>(hits: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
{
    hits.into_iter()
        .map(|(snippet, title, link)| {
            format!(
                "[snippet: {}, title: {}, link: {}]",
                collapse_whitespace(snippet),
                collapse_whitespace(title),
                link.trim()
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
