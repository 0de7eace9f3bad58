// Mock test helpers and common mock patterns
//
// Provides reusable mock constructors with sensible defaults.
// Tests can override specific behaviors while inheriting baseline setup.
//
// Usage:
//     use crate::services::mocks::test_helpers::*;
//     let mut config = create_mock_config();
//     config.expect_get_model().returning(|| "custom".to_string());

#[cfg(test)]
pub mod test_helpers {
    use super::super::traits::*;
    use crate::error::WebWaddleError;
    use crate::llm::{LlmProvider, LlmResponse, MockLlmAdapter};
    use crate::search::MockSearchEngine;

    /// Create a mock config service with test defaults
    ///
    /// Default behavior:
    /// - get_provider() returns OpenAI
    /// - get_api_key() returns "test-api-key"
    /// - get_model() returns "test-model"
    /// - get_max_results() returns 4, enrich_snippets() returns false
    pub fn create_mock_config() -> MockConfigService {
        let mut mock = MockConfigService::new();

        mock.expect_get_provider().returning(|| LlmProvider::OpenAI);
        mock.expect_get_api_key()
            .returning(|| Ok("test-api-key".to_string()));
        mock.expect_get_api_base()
            .returning(|| "http://127.0.0.1:9/v1".to_string());
        mock.expect_get_model()
            .returning(|| "test-model".to_string());
        mock.expect_get_temperature().returning(|| 0.0);
        mock.expect_get_max_results().returning(|| 4);
        mock.expect_enrich_snippets().returning(|| false);
        mock.expect_get_search_url()
            .returning(|| "http://127.0.0.1:9/html/".to_string());
        mock.expect_get_region()
            .returning(|| "wt-wt".to_string());

        mock
    }

    /// Create a mock config service whose API key is missing
    pub fn create_mock_config_without_key() -> MockConfigService {
        let mut mock = MockConfigService::new();

        mock.expect_get_provider().returning(|| LlmProvider::OpenAI);
        mock.expect_get_api_key().returning(|| {
            Err(WebWaddleError::EnvError(
                "OPENAI_API_KEY environment variable not set".to_string(),
            ))
        });
        mock.expect_get_api_base()
            .returning(|| "http://127.0.0.1:9/v1".to_string());
        mock.expect_get_model()
            .returning(|| "test-model".to_string());
        mock.expect_get_temperature().returning(|| 0.0);
        mock.expect_get_max_results().returning(|| 4);
        mock.expect_enrich_snippets().returning(|| true);
        mock.expect_get_search_url()
            .returning(|| "http://127.0.0.1:9/html/".to_string());
        mock.expect_get_region()
            .returning(|| "wt-wt".to_string());

        mock
    }

    /// Create a mock search engine that always returns `listing`
    pub fn create_mock_search(listing: &'static str) -> MockSearchEngine {
        let mut mock = MockSearchEngine::new();
        mock.expect_results_text()
            .returning(move |_| Ok(listing.to_string()));
        mock.expect_run()
            .returning(|query| Ok(format!("Page text about {}", query)));
        mock
    }

    /// Create a mock LLM adapter that always answers `content`
    pub fn create_mock_llm(content: &'static str) -> MockLlmAdapter {
        let mut mock = MockLlmAdapter::new();
        mock.expect_complete_chat().returning(move |_| {
            Ok(LlmResponse {
                content: content.to_string(),
                tool_calls: None,
                finish_reason: Some("stop".to_string()),
            })
        });
        mock
    }
}

#[cfg(test)]
mod tests {
    use super::super::traits::*;
    use super::test_helpers::*;
    use crate::llm::LlmAdapter;
    use crate::search::SearchEngine;

    #[test]
    fn test_create_mock_config() {
        let mock = create_mock_config();
        assert_eq!(mock.get_api_key().unwrap(), "test-api-key");
        assert_eq!(mock.get_model(), "test-model");
    }

    #[test]
    fn test_create_mock_config_without_key() {
        let mock = create_mock_config_without_key();
        assert!(mock.get_api_key().is_err());
    }

    #[tokio::test]
    async fn test_create_mock_search() {
        let mock = create_mock_search("[snippet: s, title: t, link: https://x.example/]");
        assert!(mock.results_text("q").await.unwrap().contains("snippet: s"));
        assert_eq!(mock.run("t").await.unwrap(), "Page text about t");
    }

    #[tokio::test]
    async fn test_create_mock_llm() {
        let mock = create_mock_llm("hello");
        let response = mock
            .complete_chat(crate::llm::LlmRequest::new(vec![]))
            .await
            .unwrap();
        assert_eq!(response.content, "hello");
    }
}
