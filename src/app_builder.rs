// AppBuilder pattern for dependency construction and injection
//
// Builds the search engine, LLM adapter, WebWaddle tool, and search agent
// from a ConfigService plus optional command-line overrides. Any piece can
// be swapped for a mock in tests.
//
// Usage Example:
//     // Production
//     let deps = AppBuilder::new()
//         .with_model(Some("gpt-4o-mini".to_string()))
//         .build()?;
//     let summary = deps.waddle.answer("What's new in Rust?").await?;
//
//     // Testing
//     let deps = AppBuilder::new()
//         .with_config(Arc::new(create_mock_config()))
//         .with_search_engine(Arc::new(mock_search))
//         .with_llm_adapter(Arc::new(mock_llm))
//         .build()?;

use crate::agent::{AgentConfig, SearchAgent, ToolDefinition};
use crate::error::Result;
use crate::llm::{create_adapter, LlmAdapter};
use crate::search::{DuckDuckGoSearch, SearchEngine};
use crate::services::{validate_max_results, ConfigService, EnvConfigService};
use crate::webwaddle::{WaddleOptions, WebWaddle, TOOL_DESCRIPTION, TOOL_NAME};
use std::sync::Arc;

/// Builder for the WebWaddle dependency graph
#[derive(Default)]
pub struct AppBuilder {
    // Optional overrides (for testing)
    config: Option<Arc<dyn ConfigService>>,
    search: Option<Arc<dyn SearchEngine>>,
    llm_adapter: Option<Arc<dyn LlmAdapter>>,

    // Command-line overrides
    model: Option<String>,
    max_results: Option<usize>,
    enrich_snippets: Option<bool>,

    // Search-only commands run without an API key
    allow_missing_key: bool,
}

/// Container for the wired services
pub struct AppDependencies {
    pub config: Arc<dyn ConfigService>,
    pub search: Arc<dyn SearchEngine>,
    pub llm_adapter: Arc<dyn LlmAdapter>,
    pub waddle: Arc<WebWaddle>,
}

impl AppDependencies {
    /// The zero-shot agent with WebWaddle as its only tool
    pub fn search_agent(&self) -> SearchAgent {
        let mut config = AgentConfig::default_researcher();
        config.model = Some(self.config.get_model());
        config.temperature = self.config.get_temperature();

        SearchAgent::new(
            config,
            Arc::clone(&self.llm_adapter),
            self.waddle.clone(),
            ToolDefinition::for_search_tool(TOOL_NAME, TOOL_DESCRIPTION),
        )
    }
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: Arc<dyn ConfigService>) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_search_engine(mut self, search: Arc<dyn SearchEngine>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_llm_adapter(mut self, adapter: Arc<dyn LlmAdapter>) -> Self {
        self.llm_adapter = Some(adapter);
        self
    }

    /// Override the configured model
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    /// Override the configured result count
    pub fn with_max_results(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }

    /// Override the configured enrichment setting
    pub fn with_enrich_snippets(mut self, enrich: Option<bool>) -> Self {
        self.enrich_snippets = enrich;
        self
    }

    /// Build even when the provider's API key is missing
    ///
    /// For commands that only search; any LLM call will then fail at the API.
    pub fn allow_missing_key(mut self, allow: bool) -> Self {
        self.allow_missing_key = allow;
        self
    }

    /// Wire everything together
    ///
    /// # Errors
    /// - Configuration errors from `EnvConfigService::load` when no config was given
    /// - `EnvError` when the provider's API key is missing (unless allowed)
    /// - `ConfigError` for an out-of-range max results override
    pub fn build(self) -> Result<AppDependencies> {
        let config: Arc<dyn ConfigService> = match self.config {
            Some(config) => config,
            None => Arc::new(EnvConfigService::load()?),
        };

        let model = self.model.unwrap_or_else(|| config.get_model());

        let search: Arc<dyn SearchEngine> = match self.search {
            Some(search) => search,
            None => {
                let max_results = self.max_results.unwrap_or_else(|| config.get_max_results());
                validate_max_results(max_results)?;

                Arc::new(
                    DuckDuckGoSearch::new()
                        .with_base_url(config.get_search_url())
                        .with_region(config.get_region())
                        .with_max_results(max_results),
                )
            }
        };

        let llm_adapter: Arc<dyn LlmAdapter> = match self.llm_adapter {
            Some(adapter) => adapter,
            None => {
                let api_key = match config.get_api_key() {
                    Ok(key) => key,
                    Err(e) if self.allow_missing_key => {
                        tracing::debug!("Continuing without API key: {}", e);
                        String::new()
                    }
                    Err(e) => return Err(e),
                };

                Arc::from(create_adapter(
                    config.get_provider(),
                    api_key,
                    Some(config.get_api_base()),
                ))
            }
        };

        tracing::info!(
            "Using {} search with {} ({})",
            search.name(),
            llm_adapter.name(),
            model
        );

        let options = WaddleOptions {
            model: Some(model),
            temperature: config.get_temperature(),
            enrich_snippets: self
                .enrich_snippets
                .unwrap_or_else(|| config.enrich_snippets()),
            ..WaddleOptions::default()
        };

        let waddle = Arc::new(WebWaddle::new(
            Arc::clone(&search),
            Arc::clone(&llm_adapter),
            options,
        ));

        Ok(AppDependencies {
            config,
            search,
            llm_adapter,
            waddle,
        })
    }
}
