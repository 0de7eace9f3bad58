// Zero-shot search agent
//
// The model is offered a single search tool. It either answers directly or
// asks for the tool; in the latter case every requested call is executed once
// and the model writes its final answer from the tool output. There is never
// a second tool round.
//
// Module Organization:
// - tools.rs: OpenAI function-calling schema for the tool offered to the model

pub mod tools;

pub use tools::{FunctionDefinition, FunctionParameters, ToolDefinition};

use crate::error::{Result, WebWaddleError};
use crate::llm::{LlmAdapter, LlmRequest, Message, ToolCall};
use crate::tool_executor::ToolExecutor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Runtime configuration for the search agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Unique identifier for this agent
    pub id: String,

    /// Display name for the agent
    pub name: String,

    /// System instructions
    pub instructions: String,

    /// Model override; None uses the adapter's default
    pub model: Option<String>,

    pub temperature: f32,

    pub enabled: bool,
}

impl AgentConfig {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            instructions: String::new(),
            model: None,
            temperature: 0.0,
            enabled: true,
        }
    }

    /// The default research agent used by `webwaddle ask`
    pub fn default_researcher() -> Self {
        Self {
            id: "researcher".to_string(),
            name: "Researcher".to_string(),
            instructions: r#"You are a research assistant with access to a web search tool.

Use the search tool whenever the question concerns current events, recent facts, or anything you cannot answer reliably from memory. Pass it one clear, specific query.

When you have the tool's summary:
- Answer the question directly first
- Keep the source URLs from the summary as citations
- Say so if the sources conflict or do not answer the question

Answer directly without the tool only for stable general knowledge."#
                .to_string(),
            model: None,
            temperature: 0.0,
            enabled: true,
        }
    }
}

/// Agent that answers a question with at most one round of tool calls
pub struct SearchAgent {
    config: AgentConfig,
    llm_adapter: Arc<dyn LlmAdapter>,
    tool: Arc<dyn ToolExecutor>,
    tool_definition: ToolDefinition,
}

impl SearchAgent {
    pub fn new(
        config: AgentConfig,
        llm_adapter: Arc<dyn LlmAdapter>,
        tool: Arc<dyn ToolExecutor>,
        tool_definition: ToolDefinition,
    ) -> Self {
        Self {
            config,
            llm_adapter,
            tool,
            tool_definition,
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn tool_definition(&self) -> &ToolDefinition {
        &self.tool_definition
    }

    fn base_request(&self, messages: Vec<Message>) -> LlmRequest {
        LlmRequest::new(messages)
            .with_model(self.config.model.clone())
            .with_temperature(self.config.temperature)
    }

    /// Answer a question, calling the search tool if the model asks for it
    ///
    /// # Errors
    /// - `ConfigError` if the agent is disabled
    /// - `LlmError` if either completion fails
    pub async fn answer(&self, question: &str) -> Result<String> {
        if !self.config.enabled {
            return Err(WebWaddleError::ConfigError(format!(
                "agent '{}' is disabled",
                self.config.id
            )));
        }

        let mut messages = Vec::new();
        if !self.config.instructions.is_empty() {
            messages.push(Message::system(self.config.instructions.clone()));
        }
        messages.push(Message::user(question));

        let request = self
            .base_request(messages.clone())
            .with_tools(vec![self.tool_definition.clone()])
            .with_tool_choice("auto".to_string());

        let response = self.llm_adapter.complete_chat(request).await?;

        let calls = response.requested_tools().to_vec();
        if calls.is_empty() {
            tracing::info!("{} answered without the tool", self.name());
            return Ok(response.content);
        }

        tracing::info!("{} requested {} tool call(s)", self.name(), calls.len());

        messages.push(Message::assistant_tool_calls(response.content, calls.clone()));
        for call in &calls {
            let output = self.execute_call(call).await;
            messages.push(Message::tool(call.id.clone(), output));
        }

        // Final answer; no tools offered so the model cannot ask again
        let final_response = self.llm_adapter.complete_chat(self.base_request(messages)).await?;
        Ok(final_response.content)
    }

    /// Run one tool call, turning failures into text the model can read
    async fn execute_call(&self, call: &ToolCall) -> String {
        if call.function.name != self.tool_definition.function.name {
            tracing::warn!("Model requested unknown tool '{}'", call.function.name);
            return format!(
                "Error: tool '{}' does not exist. The only available tool is '{}'.",
                call.function.name, self.tool_definition.function.name
            );
        }

        match self
            .tool
            .execute_tool(&call.function.name, &call.function.arguments)
            .await
        {
            Ok(output) => output,
            Err(e) => {
                tracing::error!("Tool '{}' failed: {}", call.function.name, e);
                format!("Error: {}", e)
            }
        }
    }
}
