// WebWaddle: search the web, then summarize what came back
//
// Flow: engine listing -> parse_results -> (optional) snippet enrichment ->
// summary prompt -> one chat completion. `research` adds a fixed query
// expansion step in front and merges the result sets.

use crate::error::{Result, WebWaddleError};
use crate::llm::{LlmAdapter, LlmRequest, Message};
use crate::prompts::{parse_query_list, PromptTemplate};
use crate::search::{parse_results, SearchEngine, SearchResult, SearchResults, NO_RESULT_TEXT};
use crate::tool_executor::ToolExecutor;
use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const TOOL_NAME: &str = "webwaddle_search";
pub const TOOL_DESCRIPTION: &str =
    "useful for when you need to answer questions about current events, or verify critical information";

/// Returned by [`WebWaddle::run`] when any stage fails
pub const SUMMARY_ERROR_TEXT: &str = "Error in generating summary.";

/// Separator placed between results in the summary context
pub const RESULT_SEPARATOR: &str = " | Next Result | ";

/// Tunables for the search-and-summarize chain
#[derive(Debug, Clone)]
pub struct WaddleOptions {
    /// Model override; None uses the adapter's default
    pub model: Option<String>,

    pub temperature: f32,

    /// Replace each snippet with a fuller search on the result's title
    pub enrich_snippets: bool,

    pub summary_prompt: PromptTemplate,

    pub query_prompt: PromptTemplate,
}

impl Default for WaddleOptions {
    fn default() -> Self {
        Self {
            model: None,
            temperature: 0.0,
            enrich_snippets: true,
            summary_prompt: PromptTemplate::summary(),
            query_prompt: PromptTemplate::query_expansion(),
        }
    }
}

pub struct WebWaddle {
    search: Arc<dyn SearchEngine>,
    llm_adapter: Arc<dyn LlmAdapter>,
    options: WaddleOptions,
}

impl WebWaddle {
    pub fn new(
        search: Arc<dyn SearchEngine>,
        llm_adapter: Arc<dyn LlmAdapter>,
        options: WaddleOptions,
    ) -> Self {
        Self {
            search,
            llm_adapter,
            options,
        }
    }

    pub fn options(&self) -> &WaddleOptions {
        &self.options
    }

    /// Search and parse the engine's listing into results
    ///
    /// With enrichment on, every result's snippet is replaced by the engine's
    /// digest for the result title. Lookups run concurrently and keep order;
    /// a failed or empty lookup keeps the original snippet.
    pub async fn run_search(&self, query: &str) -> Result<SearchResults> {
        let raw = self.search.results_text(query).await?;
        let results = parse_results(&raw);

        tracing::info!("Found {} results for '{}'", results.len(), query);

        if !self.options.enrich_snippets || results.is_empty() {
            return Ok(results);
        }

        let enriched = join_all(results.into_iter().map(|r| self.enrich(r))).await;
        Ok(SearchResults::new(enriched))
    }

    async fn enrich(&self, result: SearchResult) -> SearchResult {
        match self.search.run(&result.title).await {
            Ok(text) if text.trim() == NO_RESULT_TEXT => {
                tracing::debug!("No page text for '{}', keeping snippet", result.title);
                result
            }
            Ok(text) => result.with_snippet(&text),
            Err(e) => {
                tracing::warn!("Could not enrich '{}': {}", result.title, e);
                result
            }
        }
    }

    /// Build the summary prompt for a result set
    ///
    /// # Errors
    /// - `NoResults` if there is nothing to summarize
    /// - `TemplateError` if a custom summary prompt lacks a variable value
    pub fn build_summary_prompt(&self, results: &SearchResults, question: &str) -> Result<String> {
        if results.is_empty() {
            return Err(WebWaddleError::NoResults(question.to_string()));
        }

        let context = results
            .iter()
            .map(|r| format!("{} (source: {})", r.snippet, r.link))
            .collect::<Vec<_>>()
            .join(RESULT_SEPARATOR);

        self.options
            .summary_prompt
            .format(&[("context", context.as_str()), ("question", question)])
    }

    fn summary_request(&self, prompt: String) -> LlmRequest {
        LlmRequest::new(vec![Message::user(prompt)])
            .with_model(self.options.model.clone())
            .with_temperature(self.options.temperature)
    }

    /// Send the summary chain and return the model's text untouched
    pub async fn summarize_results(&self, results: &SearchResults, question: &str) -> Result<String> {
        let prompt = self.build_summary_prompt(results, question)?;
        let response = self
            .llm_adapter
            .complete_chat(self.summary_request(prompt))
            .await?;
        Ok(response.content)
    }

    /// Same chain as [`summarize_results`](Self::summarize_results), streamed into `tx`
    pub async fn stream_summary(
        &self,
        results: &SearchResults,
        question: &str,
        tx: mpsc::UnboundedSender<String>,
    ) -> Result<()> {
        let prompt = self.build_summary_prompt(results, question)?;
        self.llm_adapter
            .stream_chat(self.summary_request(prompt), tx)
            .await?;
        Ok(())
    }

    /// Search for the question and summarize the results
    pub async fn answer(&self, question: &str) -> Result<String> {
        let results = self.run_search(question).await?;
        self.summarize_results(&results, question).await
    }

    /// Ask the model for a few diverse search queries for the question
    pub async fn expand_queries(&self, question: &str) -> Result<Vec<String>> {
        let prompt = self.options.query_prompt.format(&[("question", question)])?;
        let response = self
            .llm_adapter
            .complete_chat(self.summary_request(prompt))
            .await?;
        parse_query_list(&response.content)
    }

    /// Multi-query mode: expand, search each query, merge, summarize once
    ///
    /// Falls back to the question itself when expansion fails. A query whose
    /// search fails is skipped so long as another one produced results.
    pub async fn research(&self, question: &str) -> Result<String> {
        let queries = match self.expand_queries(question).await {
            Ok(queries) => queries,
            Err(e) => {
                tracing::warn!("Query expansion failed, searching the question directly: {}", e);
                vec![question.to_string()]
            }
        };

        tracing::info!("Researching with {} queries: {:?}", queries.len(), queries);

        let mut merged = SearchResults::default();
        let mut last_error = None;
        for query in &queries {
            match self.run_search(query).await {
                Ok(results) => merged.merge(results),
                Err(e) => {
                    tracing::warn!("Search for '{}' failed: {}", query, e);
                    last_error = Some(e);
                }
            }
        }

        if merged.is_empty() {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        self.summarize_results(&merged, question).await
    }

    /// Tool-facing entry point: the summary, or a fixed error sentence
    pub async fn run(&self, query: &str) -> String {
        match self.answer(query).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!("Error generating summary: {}", e);
                SUMMARY_ERROR_TEXT.to_string()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ToolArguments {
    query: String,
}

/// Accept `{"query": "..."}` or a bare string as tool arguments
fn query_from_arguments(arguments: &str) -> Result<String> {
    let trimmed = arguments.trim();
    let query = if trimmed.starts_with('{') {
        serde_json::from_str::<ToolArguments>(trimmed)
            .map_err(|e| WebWaddleError::ToolError(format!("invalid arguments: {}", e)))?
            .query
    } else {
        serde_json::from_str::<String>(trimmed).unwrap_or_else(|_| trimmed.to_string())
    };

    let query = query.trim().to_string();
    if query.is_empty() {
        return Err(WebWaddleError::ToolError("empty search query".to_string()));
    }
    Ok(query)
}

#[async_trait]
impl ToolExecutor for WebWaddle {
    async fn execute_tool(&self, tool_name: &str, arguments: &str) -> Result<String> {
        if tool_name != TOOL_NAME {
            return Err(WebWaddleError::ToolError(format!("unknown tool '{}'", tool_name)));
        }

        let query = query_from_arguments(arguments)?;
        tracing::info!("Tool call {}({})", TOOL_NAME, query);
        Ok(self.run(&query).await)
    }
}
