// Tool execution abstraction
// Lets the agent call a tool without depending on its implementation

use crate::error::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Trait for executing tool calls requested by the model
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a tool call and return the result as a string
    ///
    /// # Arguments
    /// * `tool_name` - Name of the tool to call (e.g., "webwaddle_search")
    /// * `arguments` - JSON arguments for the tool call
    ///
    /// # Returns
    /// * `Result<String>` - The tool output, or an error for unknown tools and bad arguments
    async fn execute_tool(&self, tool_name: &str, arguments: &str) -> Result<String>;
}
