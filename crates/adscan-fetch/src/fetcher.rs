use std::future::Future;

use adscan_core::{AppConfig, FetchProviderKind};

use crate::browserless::BrowserlessClient;
use crate::direct::DirectClient;
use crate::error::FetchError;
use crate::scrapingbee::ScrapingBeeClient;

/// Rendering hints passed through to the scraping backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub render_js: bool,
    /// Extra time for client-side rendering after load, in milliseconds.
    pub wait_ms: u64,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            render_js: true,
            wait_ms: 5_000,
            viewport_width: 1920,
            viewport_height: 1080,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            wait_ms: config.render_wait_ms,
            ..Self::default()
        }
    }
}

/// Anything that can turn a URL into a raw HTML/text document.
pub trait DocumentFetcher {
    /// Short backend name used in logs and error messages.
    fn provider(&self) -> &'static str;

    /// Fetch `url` and return the response body.
    fn fetch(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// The backend chosen by `ADSCAN_FETCH_PROVIDER`.
pub enum FetchProvider {
    ScrapingBee(ScrapingBeeClient),
    Browserless(BrowserlessClient),
    Direct(DirectClient),
}

impl FetchProvider {
    /// Build the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingCredential`] when the selected backend
    /// needs an API key that is not configured, or [`FetchError::Http`] if
    /// the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let provider = match config.fetch_provider {
            FetchProviderKind::ScrapingBee => {
                let key = config.scrapingbee_api_key.as_deref().ok_or(
                    FetchError::MissingCredential {
                        provider: "scrapingbee",
                        var: "SCRAPINGBEE_API_KEY",
                    },
                )?;
                Self::ScrapingBee(ScrapingBeeClient::new(key, config.fetch_timeout_secs)?)
            }
            FetchProviderKind::Browserless => {
                let key = config.browserless_api_key.as_deref().ok_or(
                    FetchError::MissingCredential {
                        provider: "browserless",
                        var: "BROWSERLESS_API_KEY",
                    },
                )?;
                Self::Browserless(BrowserlessClient::new(
                    &config.browserless_url,
                    Some(key),
                    config.fetch_timeout_secs,
                )?)
            }
            FetchProviderKind::Direct => Self::Direct(DirectClient::new(
                config.fetch_timeout_secs,
                &config.user_agent,
            )?),
        };

        tracing::debug!(provider = provider.provider(), "fetch provider configured");
        Ok(provider)
    }
}

impl DocumentFetcher for FetchProvider {
    fn provider(&self) -> &'static str {
        match self {
            Self::ScrapingBee(c) => c.provider(),
            Self::Browserless(c) => c.provider(),
            Self::Direct(c) => c.provider(),
        }
    }

    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String, FetchError> {
        match self {
            Self::ScrapingBee(c) => c.fetch(url, options).await,
            Self::Browserless(c) => c.fetch(url, options).await,
            Self::Direct(c) => c.fetch(url, options).await,
        }
    }
}

/// Reject empty bodies, which every backend occasionally returns on a
/// silently failed render.
pub(crate) fn non_empty_body(provider: &'static str, body: String) -> Result<String, FetchError> {
    if body.trim().is_empty() {
        return Err(FetchError::MalformedResponse {
            provider,
            reason: "empty response body".to_string(),
        });
    }
    Ok(body)
}
