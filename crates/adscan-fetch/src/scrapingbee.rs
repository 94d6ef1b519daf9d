//! `ScrapingBee` HTML API client.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::{retry_after_secs, FetchError};
use crate::fetcher::{non_empty_body, DocumentFetcher, FetchOptions};

const PROVIDER: &str = "scrapingbee";
const DEFAULT_BASE_URL: &str = "https://app.scrapingbee.com/api/v1/";

/// Client for the `ScrapingBee` `GET /api/v1/` endpoint.
///
/// Use [`ScrapingBeeClient::new`] for production or
/// [`ScrapingBeeClient::with_base_url`] to point at a mock server in tests.
pub struct ScrapingBeeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl ScrapingBeeClient {
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`FetchError::InvalidUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|source| FetchError::Http {
                provider: PROVIDER,
                source,
            })?;

        // Keep exactly one trailing slash so query_pairs_mut targets the
        // endpoint path rather than replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| FetchError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    fn request_url(&self, target: &str, options: &FetchOptions) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("url", target)
            .append_pair("render_js", if options.render_js { "true" } else { "false" })
            .append_pair("wait", &options.wait_ms.to_string())
            .append_pair("window_width", &options.viewport_width.to_string())
            .append_pair("window_height", &options.viewport_height.to_string())
            .append_pair("block_resources", "false");
        url
    }
}

impl DocumentFetcher for ScrapingBeeClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String, FetchError> {
        let request_url = self.request_url(url, options);
        tracing::debug!(target_url = url, "requesting page via scrapingbee");

        let response = self
            .client
            .get(request_url)
            .send()
            .await
            .map_err(|e| FetchError::transport(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_secs(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::from_status(PROVIDER, status, retry_after, &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(PROVIDER, e))?;
        non_empty_body(PROVIDER, body)
    }
}
