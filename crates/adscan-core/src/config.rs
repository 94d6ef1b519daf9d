use crate::app_config::{AppConfig, Environment, FetchProviderKind};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Credentials are optional here: which one is required depends on the
/// selected provider and is checked when the provider is built.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty strings count as unset so `.env` templates with blank keys behave.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match optional(var) {
            None => Ok(default),
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(invalid(var, format!("'{raw}' is not a boolean"))),
            },
        }
    };

    let env = parse_environment(&or_default("ADSCAN_ENV", "development"));

    let bind_addr = or_default("ADSCAN_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("ADSCAN_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("ADSCAN_LOG_LEVEL", "info");

    let fetch_provider = or_default("ADSCAN_FETCH_PROVIDER", "scrapingbee")
        .parse::<FetchProviderKind>()
        .map_err(|reason| invalid("ADSCAN_FETCH_PROVIDER", reason))?;

    let scrapingbee_api_key = optional("SCRAPINGBEE_API_KEY");
    let browserless_api_key = optional("BROWSERLESS_API_KEY");
    let browserless_url = or_default("ADSCAN_BROWSERLESS_URL", "https://chrome.browserless.io");
    let openai_api_key = optional("OPENAI_API_KEY");
    let openai_model = or_default("ADSCAN_OPENAI_MODEL", "gpt-4o-mini");
    let llm_review = parse_bool("ADSCAN_LLM_REVIEW", false)?;

    let fetch_timeout_secs = parse_u64("ADSCAN_FETCH_TIMEOUT_SECS", "90")?;
    let user_agent = or_default("ADSCAN_USER_AGENT", "adscan/0.1 (ad-activity-estimator)");
    let render_wait_ms = parse_u64("ADSCAN_RENDER_WAIT_MS", "5000")?;
    let inter_request_delay_ms = parse_u64("ADSCAN_INTER_REQUEST_DELAY_MS", "5000")?;

    let ad_library_country = or_default("ADSCAN_AD_LIBRARY_COUNTRY", "US").to_ascii_uppercase();
    if ad_library_country.len() != 2 || !ad_library_country.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Err(invalid(
            "ADSCAN_AD_LIBRARY_COUNTRY",
            format!("'{ad_library_country}' is not a two-letter country code"),
        ));
    }

    let max_companies = parse_usize("ADSCAN_MAX_COMPANIES", "10")?;
    if max_companies == 0 {
        return Err(invalid(
            "ADSCAN_MAX_COMPANIES",
            "must be at least 1".to_string(),
        ));
    }

    let tuning_path = optional("ADSCAN_TUNING_PATH").map(PathBuf::from);

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        fetch_provider,
        scrapingbee_api_key,
        browserless_api_key,
        browserless_url,
        openai_api_key,
        openai_model,
        llm_review,
        fetch_timeout_secs,
        user_agent,
        render_wait_ms,
        inter_request_delay_ms,
        ad_library_country,
        max_companies,
        tuning_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
