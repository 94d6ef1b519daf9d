//! Browserless `/content` API client.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::{retry_after_secs, FetchError};
use crate::fetcher::{non_empty_body, DocumentFetcher, FetchOptions};

const PROVIDER: &str = "browserless";

pub struct BrowserlessClient {
    client: Client,
    endpoint: Url,
    timeout_ms: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentRequest<'a> {
    url: &'a str,
    goto_options: GotoOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    wait_for_timeout: Option<u64>,
    viewport: Viewport,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GotoOptions {
    wait_until: &'static str,
    timeout: u64,
}

#[derive(Serialize)]
struct Viewport {
    width: u32,
    height: u32,
}

impl BrowserlessClient {
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`FetchError::InvalidUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str, token: Option<&str>, timeout_secs: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|source| FetchError::Http {
                provider: PROVIDER,
                source,
            })?;

        let content = format!("{}/content", base_url.trim_end_matches('/'));
        let mut endpoint = Url::parse(&content).map_err(|e| FetchError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if let Some(token) = token {
            endpoint.query_pairs_mut().append_pair("token", token);
        }

        Ok(Self {
            client,
            endpoint,
            timeout_ms: timeout_secs.saturating_mul(1000),
        })
    }

    fn endpoint(&self) -> Url {
        self.endpoint.clone()
    }
}

impl DocumentFetcher for BrowserlessClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    /// Fetch fully-rendered HTML. The browser always runs scripts, so
    /// `render_js = false` only drops the post-load wait.
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String, FetchError> {
        let body = ContentRequest {
            url,
            goto_options: GotoOptions {
                wait_until: "networkidle2",
                timeout: self.timeout_ms,
            },
            wait_for_timeout: (options.render_js && options.wait_ms > 0).then_some(options.wait_ms),
            viewport: Viewport {
                width: options.viewport_width,
                height: options.viewport_height,
            },
        };

        tracing::debug!(target_url = url, "requesting page via browserless");
        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| FetchError::transport(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_secs(response.headers());
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::from_status(PROVIDER, status, retry_after, &message));
        }

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::transport(PROVIDER, e))?;
        non_empty_body(PROVIDER, html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_token() {
        let client = BrowserlessClient::new("https://chrome.example/", Some("t0k"), 5).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://chrome.example/content?token=t0k"
        );
    }

    #[test]
    fn endpoint_encodes_reserved_token_characters() {
        let client = BrowserlessClient::new("https://chrome.example", Some("a&b+c#d"), 5).unwrap();
        let endpoint = client.endpoint();
        assert_eq!(endpoint.as_str(), "https://chrome.example/content?token=a%26b%2Bc%23d");
        let pairs: Vec<(String, String)> = endpoint.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("token".to_string(), "a&b+c#d".to_string())]);
    }

    #[test]
    fn unparseable_base_url_is_rejected() {
        let result = BrowserlessClient::new("not a url", Some("t0k"), 5);
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }

    #[test]
    fn endpoint_without_token() {
        let client = BrowserlessClient::new("http://localhost:3000", None, 5).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:3000/content");
    }

    #[test]
    fn request_body_uses_camel_case() {
        let body = ContentRequest {
            url: "https://example.com",
            goto_options: GotoOptions {
                wait_until: "networkidle2",
                timeout: 30_000,
            },
            wait_for_timeout: Some(2_000),
            viewport: Viewport {
                width: 1920,
                height: 1080,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["gotoOptions"]["waitUntil"], "networkidle2");
        assert_eq!(json["waitForTimeout"], 2_000);
        assert_eq!(json["viewport"]["width"], 1920);
    }
}
