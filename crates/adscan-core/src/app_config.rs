use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which scraping backend renders ad-library pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchProviderKind {
    ScrapingBee,
    Browserless,
    Direct,
}

impl std::fmt::Display for FetchProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchProviderKind::ScrapingBee => write!(f, "scrapingbee"),
            FetchProviderKind::Browserless => write!(f, "browserless"),
            FetchProviderKind::Direct => write!(f, "direct"),
        }
    }
}

impl std::str::FromStr for FetchProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scrapingbee" => Ok(FetchProviderKind::ScrapingBee),
            "browserless" => Ok(FetchProviderKind::Browserless),
            "direct" => Ok(FetchProviderKind::Direct),
            other => Err(format!(
                "unknown fetch provider '{other}'; expected scrapingbee, browserless, or direct"
            )),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub fetch_provider: FetchProviderKind,
    pub scrapingbee_api_key: Option<String>,
    pub browserless_api_key: Option<String>,
    pub browserless_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub llm_review: bool,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub render_wait_ms: u64,
    pub inter_request_delay_ms: u64,
    pub ad_library_country: String,
    pub max_companies: usize,
    pub tuning_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "[redacted]");
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("fetch_provider", &self.fetch_provider)
            .field("scrapingbee_api_key", &redact(&self.scrapingbee_api_key))
            .field("browserless_api_key", &redact(&self.browserless_api_key))
            .field("browserless_url", &self.browserless_url)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openai_model", &self.openai_model)
            .field("llm_review", &self.llm_review)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("render_wait_ms", &self.render_wait_ms)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("ad_library_country", &self.ad_library_country)
            .field("max_companies", &self.max_companies)
            .field("tuning_path", &self.tuning_path)
            .finish()
    }
}
