mod chat_completions;
mod types;

pub use chat_completions::ChatCompletionsAdapter;
pub use types::*;

use anyhow::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc;

/// Unified LLM interface that all adapters must implement
/// Supports streaming, complete responses, and tool calls
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LlmAdapter: Send + Sync {
    /// Stream a chat completion response
    /// Sends chunks of text through the provided channel as they arrive
    async fn stream_chat(
        &self,
        request: LlmRequest,
        tx: mpsc::UnboundedSender<String>,
    ) -> Result<()>;

    /// Get a complete chat response (non-streaming)
    async fn complete_chat(&self, request: LlmRequest) -> Result<LlmResponse>;

    /// Get the adapter name for logging/debugging
    fn name(&self) -> &'static str;
}

/// Factory function to create the adapter for a provider
///
/// `api_base` overrides the provider's default endpoint (proxies, self-hosted gateways).
pub fn create_adapter(
    provider: LlmProvider,
    api_key: String,
    api_base: Option<String>,
) -> Box<dyn LlmAdapter> {
    Box::new(ChatCompletionsAdapter::new(provider, api_key, api_base))
}
