// Configuration service implementation
//
// Sensitive data (API keys) comes from environment variables, optionally
// seeded from a `.env` file; everything else has a default and can be
// overridden through WEBWADDLE_* variables.

use super::traits::ConfigService;
use crate::error::{Result, WebWaddleError};
use crate::llm::LlmProvider;
use crate::search::{DEFAULT_MAX_RESULTS, DEFAULT_REGION, DEFAULT_SEARCH_URL};
use std::str::FromStr;

pub const ENV_PROVIDER: &str = "WEBWADDLE_PROVIDER";
pub const ENV_API_BASE: &str = "WEBWADDLE_API_BASE";
pub const ENV_MODEL: &str = "WEBWADDLE_MODEL";
pub const ENV_TEMPERATURE: &str = "WEBWADDLE_TEMPERATURE";
pub const ENV_MAX_RESULTS: &str = "WEBWADDLE_MAX_RESULTS";
pub const ENV_ENRICH: &str = "WEBWADDLE_ENRICH";
pub const ENV_SEARCH_URL: &str = "WEBWADDLE_SEARCH_URL";
pub const ENV_REGION: &str = "WEBWADDLE_REGION";

/// Upper bound on results per search
pub const MAX_RESULTS_LIMIT: usize = 25;

/// Environment-based configuration service
///
/// Configuration is loaded once at service creation and cached.
/// Thread Safety: All config is immutable after loading, safe to share.
#[derive(Debug, Clone)]
pub struct EnvConfigService {
    provider: LlmProvider,

    /// None when the provider needs no key
    api_key: Option<String>,

    api_base: String,
    model: String,
    temperature: f32,
    max_results: usize,
    enrich_snippets: bool,
    search_url: String,
    region: String,
}

impl EnvConfigService {
    /// Load configuration from `.env` and the process environment
    ///
    /// Environment Variables:
    /// - WEBWADDLE_PROVIDER (optional): openai | openrouter | ollama, defaults to openai
    /// - OPENAI_API_KEY / OPENROUTER_API_KEY: key for the chosen provider
    /// - WEBWADDLE_API_BASE (optional): chat-completions base URL
    /// - WEBWADDLE_MODEL (optional): defaults to the provider's model (gpt-3.5-turbo-1106)
    /// - WEBWADDLE_TEMPERATURE (optional): 0.0..=2.0, defaults to 0
    /// - WEBWADDLE_MAX_RESULTS (optional): 1..=25, defaults to 4
    /// - WEBWADDLE_ENRICH (optional): true/false, defaults to true
    /// - WEBWADDLE_SEARCH_URL, WEBWADDLE_REGION (optional): DuckDuckGo endpoint and region
    ///
    /// The API key is checked lazily by `get_api_key`, so commands that never
    /// reach the model still work without one.
    ///
    /// # Errors
    /// - Unknown provider, or a number/flag that does not parse or is out of range
    pub fn load() -> Result<Self> {
        // Load .env file (ignore if not found)
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match get(ENV_PROVIDER) {
            Some(raw) => LlmProvider::from_str(&raw).map_err(WebWaddleError::ConfigError)?,
            None => LlmProvider::default(),
        };

        let api_key = if provider.requires_api_key() {
            get(provider.default_env_var())
        } else {
            None
        };

        let api_base = get(ENV_API_BASE).unwrap_or_else(|| provider.default_api_base().to_string());
        let model = get(ENV_MODEL).unwrap_or_else(|| provider.default_model().to_string());

        let temperature = parse_var::<f32>(ENV_TEMPERATURE, get(ENV_TEMPERATURE))?.unwrap_or(0.0);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(WebWaddleError::ConfigError(format!(
                "{} must be between 0.0 and 2.0, got {}",
                ENV_TEMPERATURE, temperature
            )));
        }

        let max_results =
            parse_var::<usize>(ENV_MAX_RESULTS, get(ENV_MAX_RESULTS))?.unwrap_or(DEFAULT_MAX_RESULTS);
        validate_max_results(max_results)?;

        let enrich_snippets = match get(ENV_ENRICH) {
            Some(raw) => parse_bool(ENV_ENRICH, &raw)?,
            None => true,
        };

        Ok(Self {
            provider,
            api_key,
            api_base,
            model,
            temperature,
            max_results,
            enrich_snippets,
            search_url: get(ENV_SEARCH_URL).unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string()),
            region: get(ENV_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string()),
        })
    }
}

/// Check a max-results value against the supported range
pub fn validate_max_results(max_results: usize) -> Result<()> {
    if !(1..=MAX_RESULTS_LIMIT).contains(&max_results) {
        return Err(WebWaddleError::ConfigError(format!(
            "max results must be between 1 and {}, got {}",
            MAX_RESULTS_LIMIT, max_results
        )));
    }
    Ok(())
}

fn parse_var<T: FromStr>(key: &str, raw: Option<String>) -> Result<Option<T>> {
    raw.map(|value| {
        value.trim().parse::<T>().map_err(|_| {
            WebWaddleError::ConfigError(format!("{} has an invalid value: '{}'", key, value))
        })
    })
    .transpose()
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(WebWaddleError::ConfigError(format!(
            "{} must be true or false, got '{}'",
            key, raw
        ))),
    }
}

impl ConfigService for EnvConfigService {
    fn get_provider(&self) -> LlmProvider {
        self.provider
    }

    fn get_api_key(&self) -> Result<String> {
        if !self.provider.requires_api_key() {
            return Ok(String::new());
        }

        self.api_key.clone().ok_or_else(|| {
            WebWaddleError::EnvError(format!(
                "{} environment variable not set",
                self.provider.default_env_var()
            ))
        })
    }

    fn get_api_base(&self) -> String {
        self.api_base.clone()
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_temperature(&self) -> f32 {
        self.temperature
    }

    fn get_max_results(&self) -> usize {
        self.max_results
    }

    fn enrich_snippets(&self) -> bool {
        self.enrich_snippets
    }

    fn get_search_url(&self) -> String {
        self.search_url.clone()
    }

    fn get_region(&self) -> String {
        self.region.clone()
    }
}
