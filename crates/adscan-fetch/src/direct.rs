//! Plain HTTP fetch with no rendering. Mostly useful against pages that
//! ship their content server-side, or for local testing.

use std::time::Duration;

use reqwest::Client;

use crate::error::{retry_after_secs, FetchError};
use crate::fetcher::{non_empty_body, DocumentFetcher, FetchOptions};

const PROVIDER: &str = "direct";

pub struct DirectClient {
    client: Client,
}

impl DirectClient {
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(|source| FetchError::Http {
                provider: PROVIDER,
                source,
            })?;
        Ok(Self { client })
    }
}

impl DocumentFetcher for DirectClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, url: &str, _options: &FetchOptions) -> Result<String, FetchError> {
        let target = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(target)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
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
