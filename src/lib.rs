// Library interface for WebWaddle
// Search the web for a question and have an LLM write a cited summary.
// The CLI in main.rs is a thin shell over these modules.

pub mod agent;
pub mod app_builder;
pub mod error;
pub mod llm;
pub mod prompts;
pub mod search;
pub mod services;
pub mod tool_executor;
pub mod version;
pub mod webwaddle;

// Re-export commonly used types for convenience
pub use agent::{AgentConfig, SearchAgent, ToolDefinition};
pub use app_builder::{AppBuilder, AppDependencies};
pub use error::{Result, WebWaddleError};
pub use llm::{create_adapter, LlmAdapter, LlmProvider, LlmRequest, LlmResponse, Message as LlmMessage};
pub use prompts::PromptTemplate;
pub use search::{parse_results, DuckDuckGoSearch, SearchEngine, SearchResult, SearchResults};
pub use services::{ConfigService, EnvConfigService};
pub use tool_executor::ToolExecutor;
pub use webwaddle::{WaddleOptions, WebWaddle};
