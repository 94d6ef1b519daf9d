//! Integration tests for the fetch backends.
//!
//! Each test stands up a `wiremock` server so no real network traffic is
//! made. Covers the happy path for every backend and the upstream status
//! classification a per-company error message is built from.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use adscan_core::{AppConfig, Environment, FetchProviderKind};
use adscan_fetch::{
    BrowserlessClient, DirectClient, DocumentFetcher, FetchError, FetchOptions, FetchProvider,
    ScrapingBeeClient,
};

const TARGET: &str = "https://www.facebook.com/ads/library/?q=Acme";

fn bee(server: &MockServer) -> ScrapingBeeClient {
    ScrapingBeeClient::with_base_url("test-key", 5, &format!("{}/api/v1", server.uri()))
        .expect("failed to build test ScrapingBeeClient")
}

fn config(provider: FetchProviderKind) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "info".to_string(),
        fetch_provider: provider,
        scrapingbee_api_key: None,
        browserless_api_key: None,
        browserless_url: "http://localhost:3000".to_string(),
        openai_api_key: None,
        openai_model: "gpt-4o-mini".to_string(),
        llm_review: false,
        fetch_timeout_secs: 5,
        user_agent: "adscan-test/0.1".to_string(),
        render_wait_ms: 0,
        inter_request_delay_ms: 0,
        ad_library_country: "US".to_string(),
        max_companies: 10,
        tuning_path: None,
    }
}

// ---------------------------------------------------------------------------
// ScrapingBee
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scrapingbee_returns_body_and_forwards_options() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("url", TARGET))
        .and(query_param("render_js", "true"))
        .and(query_param("wait", "5000"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Sponsored</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let body = bee(&server)
        .fetch(TARGET, &FetchOptions::default())
        .await
        .expect("fetch should succeed");
    assert_eq!(body, "<html>Sponsored</html>");
}

#[tokio::test]
async fn scrapingbee_401_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message":"Invalid api key"}"#))
        .mount(&server)
        .await;

    let result = bee(&server).fetch(TARGET, &FetchOptions::default()).await;
    assert!(
        matches!(result, Err(FetchError::Unauthorized { provider: "scrapingbee" })),
        "expected Unauthorized, got: {result:?}"
    );
}

#[tokio::test]
async fn scrapingbee_out_of_credits_is_quota_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"message":"Monthly API calls limit reached: 1000"}"#),
        )
        .mount(&server)
        .await;

    let result = bee(&server).fetch(TARGET, &FetchOptions::default()).await;
    assert!(
        matches!(result, Err(FetchError::QuotaExhausted { .. })),
        "expected QuotaExhausted, got: {result:?}"
    );
}

#[tokio::test]
async fn scrapingbee_429_carries_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .mount(&server)
        .await;

    let result = bee(&server).fetch(TARGET, &FetchOptions::default()).await;
    assert!(
        matches!(
            result,
            Err(FetchError::RateLimited {
                retry_after_secs: 30,
                ..
            })
        ),
        "expected RateLimited(30), got: {result:?}"
    );
}

#[tokio::test]
async fn scrapingbee_500_is_unexpected_status_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let result = bee(&server).fetch(TARGET, &FetchOptions::default()).await;
    assert!(
        matches!(result, Err(FetchError::UnexpectedStatus { status: 500, .. })),
        "expected UnexpectedStatus(500), got: {result:?}"
    );
}

#[tokio::test]
async fn scrapingbee_empty_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("   "))
        .mount(&server)
        .await;

    let result = bee(&server).fetch(TARGET, &FetchOptions::default()).await;
    assert!(
        matches!(result, Err(FetchError::MalformedResponse { .. })),
        "expected MalformedResponse, got: {result:?}"
    );
}

#[tokio::test]
async fn slow_upstream_is_reported_as_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = ScrapingBeeClient::with_base_url("k", 1, &server.uri()).unwrap();
    let result = client.fetch(TARGET, &FetchOptions::default()).await;
    assert!(
        matches!(result, Err(FetchError::Timeout { .. })),
        "expected Timeout, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Browserless
// ---------------------------------------------------------------------------

#[tokio::test]
async fn browserless_posts_url_and_returns_html() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/content"))
        .and(query_param("token", "bl-token"))
        .and(body_partial_json(json!({
            "url": TARGET,
            "gotoOptions": { "waitUntil": "networkidle2" },
            "waitForTimeout": 5000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("<div>Library ID: 1</div>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = BrowserlessClient::new(&server.uri(), Some("bl-token"), 5).unwrap();
    let html = client
        .fetch(TARGET, &FetchOptions::default())
        .await
        .expect("fetch should succeed");
    assert!(html.contains("Library ID"));
}

#[tokio::test]
async fn browserless_403_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let client = BrowserlessClient::new(&server.uri(), Some("bad"), 5).unwrap();
    let result = client.fetch(TARGET, &FetchOptions::default()).await;
    assert!(
        matches!(result, Err(FetchError::Unauthorized { provider: "browserless" })),
        "expected Unauthorized, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Direct
// ---------------------------------------------------------------------------

#[tokio::test]
async fn direct_fetches_target_itself() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ads/library/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>no results found</p>"))
        .mount(&server)
        .await;

    let client = DirectClient::new(5, "adscan-test/0.1").unwrap();
    let body = client
        .fetch(&format!("{}/ads/library/?q=Acme", server.uri()), &FetchOptions::default())
        .await
        .unwrap();
    assert!(body.contains("no results found"));
}

#[tokio::test]
async fn direct_rejects_invalid_url() {
    let client = DirectClient::new(5, "adscan-test/0.1").unwrap();
    let result = client.fetch("not a url", &FetchOptions::default()).await;
    assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
}

// ---------------------------------------------------------------------------
// Provider selection
// ---------------------------------------------------------------------------

#[test]
fn scrapingbee_without_key_is_missing_credential() {
    let result = FetchProvider::from_config(&config(FetchProviderKind::ScrapingBee));
    assert!(matches!(
        result,
        Err(FetchError::MissingCredential {
            var: "SCRAPINGBEE_API_KEY",
            ..
        })
    ));
}

#[test]
fn browserless_without_key_is_missing_credential() {
    let result = FetchProvider::from_config(&config(FetchProviderKind::Browserless));
    assert!(matches!(
        result,
        Err(FetchError::MissingCredential {
            var: "BROWSERLESS_API_KEY",
            ..
        })
    ));
}

#[test]
fn direct_needs_no_credentials() {
    let provider = FetchProvider::from_config(&config(FetchProviderKind::Direct)).unwrap();
    assert_eq!(provider.provider(), "direct");
}

#[test]
fn configured_key_selects_scrapingbee() {
    let mut cfg = config(FetchProviderKind::ScrapingBee);
    cfg.scrapingbee_api_key = Some("k".to_string());
    let provider = FetchProvider::from_config(&cfg).unwrap();
    assert_eq!(provider.provider(), "scrapingbee");
}
