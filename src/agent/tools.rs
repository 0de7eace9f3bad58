// Tool definitions in OpenAI-compatible function calling format
//
// Reference: https://platform.openai.com/docs/guides/function-calling

use serde::{Deserialize, Serialize};

/// Tool definition in OpenAI function calling format
///
/// # Example
/// ```json
/// {
///   "type": "function",
///   "function": {
///     "name": "webwaddle_search",
///     "description": "useful for when you need to answer questions about current events",
///     "parameters": {
///       "type": "object",
///       "properties": {
///         "query": { "type": "string", "description": "The search query to execute" }
///       },
///       "required": ["query"]
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// Always "function" for function calling
    #[serde(rename = "type")]
    pub tool_type: String,

    pub function: FunctionDefinition,
}

/// Function definition within a tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,

    /// When the model should reach for this tool
    pub description: String,

    pub parameters: FunctionParameters,
}

/// Parameters schema for a function (JSON Schema format)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionParameters {
    /// Always "object" for parameter schemas
    #[serde(rename = "type")]
    pub param_type: String,

    pub properties: serde_json::Value,

    pub required: Vec<String>,
}

impl ToolDefinition {
    /// Declare a search tool taking a single required `query` string
    pub fn for_search_tool(name: &str, description: &str) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.to_string(),
                description: description.to_string(),
                parameters: FunctionParameters {
                    param_type: "object".to_string(),
                    properties: serde_json::json!({
                        "query": {
                            "type": "string",
                            "description": "The search query to execute"
                        }
                    }),
                    required: vec!["query".to_string()],
                },
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}
