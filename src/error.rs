// Centralized error handling using thiserror for type-safe error management
//
// One enum covers every failure mode of the search-and-summarize flow:
// the search engine, the chat-completion model, prompt rendering,
// configuration, and the conversions from the std/serde/reqwest/url errors
// that bubble up through `?`.

use thiserror::Error;

/// Main error type for WebWaddle
///
/// Error Handling Strategy:
/// - IO errors: Automatically converted via #[from] IoError variant
/// - Serde errors: Automatically converted via #[from] SerdeError variant
/// - HTTP errors: Automatically converted via #[from] ReqwestError variant
/// - Domain errors: Use specific variants (SearchError, NoResults, etc.)
#[derive(Debug, Error)]
pub enum WebWaddleError {
    /// Search engine request or response failure
    ///
    /// Non-success HTTP status from the engine, or a body that could not be read.
    #[error("Search error: {0}")]
    SearchError(String),

    /// The search produced nothing worth summarizing
    ///
    /// Contains the query that came back empty.
    #[error("No search results found for: {0}")]
    NoResults(String),

    /// LLM adapter or communication error
    ///
    /// Connection failures, API errors, and malformed completions.
    #[error("LLM error: {0}")]
    LlmError(String),

    /// A prompt template referenced a variable that was not supplied
    #[error("Template error: {0}")]
    TemplateError(String),

    /// Model output could not be interpreted (e.g. query list that is not JSON)
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid search result record (empty field, bad link)
    #[error("Invalid search result: {0}")]
    InvalidResult(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Environment variable not found or invalid
    ///
    /// Missing required API keys in particular.
    #[error("Environment error: {0}")]
    EnvError(String),

    /// Tool invocation error (unknown tool, bad arguments)
    #[error("Tool error: {0}")]
    ToolError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
}

/// Type alias for Result with WebWaddleError
pub type Result<T> = std::result::Result<T, WebWaddleError>;

// The LLM adapters report through anyhow; at the tool boundary those become
// LlmError so callers can still match on the failing stage.
impl From<anyhow::Error> for WebWaddleError {
    fn from(err: anyhow::Error) -> Self {
        WebWaddleError::LlmError(format!("{:#}", err))
    }
}
