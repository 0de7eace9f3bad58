// End-to-end pipeline tests against local HTTP fakes
//
// A wiremock server stands in for both the DuckDuckGo HTML endpoint and an
// OpenAI-compatible chat completions API, so these run without network
// access or credentials.

use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use webwaddle::llm::LlmAdapter;
use webwaddle::search::SearchEngine;
use webwaddle::webwaddle::{SUMMARY_ERROR_TEXT, TOOL_NAME};
use webwaddle::{
    create_adapter, AppBuilder, AppDependencies, DuckDuckGoSearch, LlmProvider, ToolExecutor,
    WaddleOptions, WebWaddle, WebWaddleError,
};
use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS_PAGE: &str = r#"
<div class="result results_links results_links_deep web-result">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fblog.rust-lang.org%2F&amp;rut=1">Rust Blog</a>
  </h2>
  <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fblog.rust-lang.org%2F">Empowering everyone to build <b>reliable</b> software.</a>
</div>
<div class="result results_links results_links_deep web-result">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="https://this-week-in-rust.org/">This Week in Rust</a>
  </h2>
  <a class="result__snippet" href="https://this-week-in-rust.org/">Weekly updates from the Rust community.</a>
</div>
"#;

const EMPTY_PAGE: &str = "<html><body><div class=\"no-results\">No results.</div></body></html>";

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

fn tool_call_completion(query: &str) -> serde_json::Value {
    json!({
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {
                        "name": TOOL_NAME,
                        "arguments": json!({ "query": query }).to_string()
                    }
                }]
            },
            "finish_reason": "tool_calls"
        }]
    })
}

async fn mount_search(server: &MockServer, query: &str, page: &str) {
    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", query))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(server)
        .await;
}

fn search_engine(server: &MockServer) -> Arc<dyn SearchEngine> {
    Arc::new(
        DuckDuckGoSearch::new()
            .with_base_url(format!("{}/html/", server.uri()))
            .with_max_results(4),
    )
}

fn llm_adapter(server: &MockServer) -> Arc<dyn LlmAdapter> {
    Arc::from(create_adapter(
        LlmProvider::OpenAI,
        "test-key".to_string(),
        Some(server.uri()),
    ))
}

fn waddle(server: &MockServer, enrich_snippets: bool) -> WebWaddle {
    WebWaddle::new(
        search_engine(server),
        llm_adapter(server),
        WaddleOptions {
            enrich_snippets,
            ..WaddleOptions::default()
        },
    )
}

fn dependencies(server: &MockServer) -> AppDependencies {
    AppBuilder::new()
        .with_search_engine(search_engine(server))
        .with_llm_adapter(llm_adapter(server))
        .with_enrich_snippets(Some(false))
        .build()
        .expect("builder should wire mock servers")
}

#[tokio::test]
async fn test_search_results_are_scraped_and_parsed() {
    let server = MockServer::start().await;
    mount_search(&server, "rust news", RESULTS_PAGE).await;

    let results = waddle(&server, false).run_search("rust news").await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results.results[0].title, "Rust Blog");
    assert_eq!(results.results[0].link.as_str(), "https://blog.rust-lang.org/");
    assert_eq!(
        results.results[0].snippet,
        "Empowering everyone to build reliable software."
    );
    assert_eq!(results.results[1].link.as_str(), "https://this-week-in-rust.org/");
}

#[tokio::test]
async fn test_enrichment_replaces_snippets_with_title_search() {
    let server = MockServer::start().await;
    mount_search(&server, "rust news", RESULTS_PAGE).await;
    mount_search(
        &server,
        "Rust Blog",
        r#"<a class="result__a" href="https://a.example/">A</a>
           <div class="result__snippet">Fuller text from the blog.</div>"#,
    )
    .await;
    mount_search(&server, "This Week in Rust", EMPTY_PAGE).await;

    let results = waddle(&server, true).run_search("rust news").await.unwrap();

    assert_eq!(results.results[0].snippet, "Fuller text from the blog.");
    // No hits for the title keeps the original snippet
    assert_eq!(
        results.results[1].snippet,
        "Weekly updates from the Rust community."
    );
}

#[tokio::test]
async fn test_answer_sends_context_and_question_to_model() {
    let server = MockServer::start().await;
    mount_search(&server, "rust news", RESULTS_PAGE).await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "stream": false, "temperature": 0.0 })))
        .and(body_string_contains("https://blog.rust-lang.org/"))
        .and(body_string_contains(" | Next Result | "))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "Rust is shipping steadily (https://blog.rust-lang.org/).",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let summary = waddle(&server, false).answer("rust news").await.unwrap();
    assert_eq!(summary, "Rust is shipping steadily (https://blog.rust-lang.org/).");
}

#[tokio::test]
async fn test_run_returns_fixed_text_when_model_fails() {
    let server = MockServer::start().await;
    mount_search(&server, "rust news", RESULTS_PAGE).await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let waddle = waddle(&server, false);
    let err = waddle.answer("rust news").await.unwrap_err();
    assert!(matches!(err, WebWaddleError::LlmError(ref msg) if msg.contains("500")));

    assert_eq!(waddle.run("rust news").await, SUMMARY_ERROR_TEXT);
}

#[tokio::test]
async fn test_empty_results_skip_the_model() {
    let server = MockServer::start().await;
    mount_search(&server, "nothing here", EMPTY_PAGE).await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let err = waddle(&server, false).answer("nothing here").await.unwrap_err();
    assert!(matches!(err, WebWaddleError::NoResults(_)));
}

#[tokio::test]
async fn test_search_http_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = waddle(&server, false).run_search("rust").await.unwrap_err();
    assert!(matches!(err, WebWaddleError::SearchError(ref msg) if msg.contains("rate limited")));
}

#[tokio::test]
async fn test_stream_summary_forwards_chunks() {
    let server = MockServer::start().await;
    mount_search(&server, "rust news", RESULTS_PAGE).await;

    let sse = concat!(
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"Rust \"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"is busy.\"}}]}\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "stream": true })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse),
        )
        .mount(&server)
        .await;

    let waddle = waddle(&server, false);
    let results = waddle.run_search("rust news").await.unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    waddle.stream_summary(&results, "rust news", tx).await.unwrap();

    let mut chunks = Vec::new();
    while let Some(chunk) = rx.recv().await {
        chunks.push(chunk);
    }
    assert_eq!(chunks, vec!["Rust ", "is busy."]);
}

#[tokio::test]
async fn test_stream_summary_accepts_crlf_events() {
    let server = MockServer::start().await;
    mount_search(&server, "rust news", RESULTS_PAGE).await;

    let sse = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Crabs \"}}]}\r\n\r\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"café\"}}]}\r\n\r\n",
        "data: [DONE]\r\n\r\n",
    );
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "stream": true })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse),
        )
        .mount(&server)
        .await;

    let waddle = waddle(&server, false);
    let results = waddle.run_search("rust news").await.unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    waddle.stream_summary(&results, "rust news", tx).await.unwrap();

    let mut text = String::new();
    while let Some(chunk) = rx.recv().await {
        text.push_str(&chunk);
    }
    assert_eq!(text, "Crabs café");
}

#[tokio::test]
async fn test_research_merges_expanded_queries() {
    let server = MockServer::start().await;
    mount_search(&server, "rust release", RESULTS_PAGE).await;
    mount_search(&server, "rust community", RESULTS_PAGE).await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("web search queries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"["rust release", "rust community"]"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("this-week-in-rust.org"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("merged summary")))
        .expect(1)
        .mount(&server)
        .await;

    let summary = waddle(&server, false)
        .research("what is happening with rust?")
        .await
        .unwrap();
    assert_eq!(summary, "merged summary");
}

#[tokio::test]
async fn test_tool_executor_accepts_query_arguments() {
    let server = MockServer::start().await;
    mount_search(&server, "rust news", RESULTS_PAGE).await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("tool summary")))
        .mount(&server)
        .await;

    let waddle = waddle(&server, false);
    let output = waddle
        .execute_tool(TOOL_NAME, r#"{"query": "rust news"}"#)
        .await
        .unwrap();
    assert_eq!(output, "tool summary");

    let err = waddle.execute_tool("calculator", "{}").await.unwrap_err();
    assert!(matches!(err, WebWaddleError::ToolError(_)));
}

#[tokio::test]
async fn test_agent_calls_search_tool_then_answers() {
    let server = MockServer::start().await;
    mount_search(&server, "rust 2024 edition", RESULTS_PAGE).await;

    // First agent turn: the model asks for the tool
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "tool_choice": "auto" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(tool_call_completion("rust 2024 edition")),
        )
        .expect(1)
        .mount(&server)
        .await;

    // The tool's own summary call
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains(" | Next Result | "))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("edition notes")))
        .expect(1)
        .mount(&server)
        .await;

    // Final agent turn sees the tool output
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("edition notes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("The 2024 edition shipped.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let deps = dependencies(&server);
    let answer = deps
        .search_agent()
        .answer("Has the Rust 2024 edition shipped?")
        .await
        .unwrap();
    assert_eq!(answer, "The 2024 edition shipped.");
}
