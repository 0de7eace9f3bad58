use super::types::*;
use super::LlmAdapter;
use crate::agent::ToolDefinition;
use anyhow::{Context, Result};
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::pin::pin;
use tokio::sync::mpsc;

/// Adapter for any OpenAI-compatible `/chat/completions` endpoint
pub struct ChatCompletionsAdapter {
    client: Client,
    api_key: String,
    api_base: String,
    default_model: String,
    label: &'static str,
}

impl ChatCompletionsAdapter {
    pub fn new(provider: LlmProvider, api_key: String, api_base: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent(crate::version::user_agent())
                .build()
                .unwrap_or_default(),
            api_key,
            api_base: api_base.unwrap_or_else(|| provider.default_api_base().to_string()),
            default_model: provider.default_model().to_string(),
            label: match provider {
                LlmProvider::OpenAI => "OpenAI",
                LlmProvider::OpenRouter => "OpenRouter",
                LlmProvider::Ollama => "Ollama",
            },
        }
    }

    /// Override the model used when a request does not name one
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    fn build_request(&self, request: LlmRequest, stream: bool) -> ApiRequest {
        ApiRequest {
            model: request.model.unwrap_or_else(|| self.default_model.clone()),
            messages: request.messages,
            stream,
            temperature: request.temperature,
            tools: request.tools,
            tool_choice: request.tool_choice,
        }
    }

    async fn send_request(&self, request: &ApiRequest) -> Result<reqwest::Response> {
        let mut builder = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json");

        // Local servers run without a key
        if !self.api_key.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = builder
            .json(request)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.label))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("{} API error {}: {}", self.label, status, error_text);
        }

        Ok(response)
    }
}

#[async_trait]
impl LlmAdapter for ChatCompletionsAdapter {
    async fn stream_chat(
        &self,
        request: LlmRequest,
        tx: mpsc::UnboundedSender<String>,
    ) -> Result<()> {
        let api_request = self.build_request(request, true);
        tracing::debug!("Streaming completion from {} ({})", self.label, api_request.model);

        let response = self.send_request(&api_request).await?;

        forward_deltas(response.bytes_stream(), &tx).await
    }

    async fn complete_chat(&self, request: LlmRequest) -> Result<LlmResponse> {
        let api_request = self.build_request(request, false);
        tracing::debug!(
            "Requesting completion from {} ({}, {} messages)",
            self.label,
            api_request.model,
            api_request.messages.len()
        );

        let response = self.send_request(&api_request).await?;

        let completion: CompletionResponse = response
            .json()
            .await
            .context("Failed to decode completion response")?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .context("No choices in response")?;

        let tool_calls = choice.message.tool_calls.filter(|calls| !calls.is_empty());

        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            finish_reason: choice.finish_reason,
        })
    }

    fn name(&self) -> &'static str {
        self.label
    }
}

/// Decode an SSE byte stream and send each content delta to `tx`
///
/// Events are reassembled across chunk boundaries, so multi-byte characters
/// and CRLF framing survive arbitrary splits. Stops at `[DONE]`, at the end
/// of the stream, or when the receiver is dropped.
async fn forward_deltas<S, B, E>(stream: S, tx: &mpsc::UnboundedSender<String>) -> Result<()>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut events = pin!(stream.eventsource());

    while let Some(event) = events.next().await {
        let event = event.map_err(|e| anyhow::anyhow!("Failed to read event stream: {}", e))?;
        let data = event.data;

        if data == "[DONE]" {
            return Ok(());
        }

        match serde_json::from_str::<StreamResponse>(&data) {
            Ok(response) => {
                let content = response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.delta)
                    .and_then(|d| d.content);

                if let Some(content) = content {
                    if tx.send(content).is_err() {
                        return Ok(()); // Receiver dropped
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Failed to parse chunk: {} - data: {}", e, data);
            }
        }
    }

    Ok(())
}

// Internal API types
#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Custom tool definitions (OpenAI function calling format)
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolDefinition>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamResponse {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
    finish_reason: Option<String>,
}

// Content is null when the model only requests tools
#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}
