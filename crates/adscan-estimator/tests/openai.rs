//! `OpenAiReviewer` against a `wiremock` chat-completions endpoint.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use adscan_estimator::{parse_llm_estimate, EstimateReviewer, LlmError, OpenAiReviewer};

fn reviewer(server: &MockServer) -> OpenAiReviewer {
    OpenAiReviewer::with_base_url("sk-test", "gpt-4o-mini", 5, &server.uri())
        .expect("failed to build test OpenAiReviewer")
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn sends_json_mode_request_and_returns_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.0,
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"{"activeAds": 12}"#)))
        .expect(1)
        .mount(&server)
        .await;

    let text = reviewer(&server)
        .complete("Company: Acme Corp")
        .await
        .expect("completion should succeed");
    assert_eq!(parse_llm_estimate(&text).unwrap().active_ads, 12);
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let result = reviewer(&server).complete("prompt").await;
    assert!(
        matches!(result, Err(LlmError::Status { status: 429 })),
        "expected Status(429), got: {result:?}"
    );
}

#[tokio::test]
async fn missing_choices_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let result = reviewer(&server).complete("prompt").await;
    assert!(matches!(result, Err(LlmError::EmptyResponse)));
}

#[tokio::test]
async fn null_content_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        })))
        .mount(&server)
        .await;

    let result = reviewer(&server).complete("prompt").await;
    assert!(matches!(result, Err(LlmError::EmptyResponse)));
}
