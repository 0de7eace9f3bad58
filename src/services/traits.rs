// Core trait definitions for service layer dependency injection
//
// All traits are marked Send + Sync so services can be shared across tokio tasks.

use crate::error::Result;
use crate::llm::LlmProvider;
#[cfg(test)]
use mockall::automock;

/// Configuration service for application settings
///
/// Centralized access to configuration from environment variables and `.env`.
/// Handles validation and provides type-safe accessors.
///
/// Design: Configuration is loaded once at startup and cached in memory.
///
/// Usage:
///     let config: Arc<dyn ConfigService> = Arc::new(EnvConfigService::load()?);
///     let api_key = config.get_api_key()?;
///     let model = config.get_model();
#[cfg_attr(test, automock)]
pub trait ConfigService: Send + Sync {
    /// Which chat-completion provider to talk to
    fn get_provider(&self) -> LlmProvider;

    /// Get API key for the provider
    ///
    /// Empty for providers that need no key.
    ///
    /// # Errors
    /// - API key required by the provider but not configured
    fn get_api_key(&self) -> Result<String>;

    /// Base URL of the chat-completions API
    fn get_api_base(&self) -> String;

    /// Get default model identifier
    fn get_model(&self) -> String;

    /// Sampling temperature for every completion
    fn get_temperature(&self) -> f32;

    /// Maximum results taken from a search
    fn get_max_results(&self) -> usize;

    /// Whether snippets get replaced by a fuller search on the title
    fn enrich_snippets(&self) -> bool;

    /// DuckDuckGo HTML endpoint
    fn get_search_url(&self) -> String;

    /// DuckDuckGo region code
    fn get_region(&self) -> String;
}
