use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{provider} is selected but {var} is not set")]
    MissingCredential {
        provider: &'static str,
        var: &'static str,
    },

    #[error("HTTP error from {provider}: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {provider} timed out")]
    Timeout { provider: &'static str },

    #[error("authentication with {provider} failed; check the API key")]
    Unauthorized { provider: &'static str },

    #[error("rate limited by {provider} (retry after {retry_after_secs}s)")]
    RateLimited {
        provider: &'static str,
        retry_after_secs: u64,
    },

    #[error("{provider} account has run out of credits")]
    QuotaExhausted { provider: &'static str },

    #[error("unexpected HTTP status {status} from {provider}")]
    UnexpectedStatus { provider: &'static str, status: u16 },

    #[error("malformed response from {provider}: {reason}")]
    MalformedResponse {
        provider: &'static str,
        reason: String,
    },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    /// Wrap a transport error, separating timeouts from other failures.
    pub(crate) fn transport(provider: &'static str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            FetchError::Timeout { provider }
        } else {
            FetchError::Http { provider, source }
        }
    }

    /// Classify a non-2xx upstream response.
    ///
    /// Providers report credit exhaustion under 401, 402, and 403
    /// interchangeably, so those statuses are checked against the body
    /// wording. A 429 is always a rate limit.
    pub(crate) fn from_status(
        provider: &'static str,
        status: StatusCode,
        retry_after_secs: Option<u64>,
        body: &str,
    ) -> Self {
        let lower = body.to_lowercase();
        let mentions_quota = ["credit", "quota", "limit reached", "payment required"]
            .iter()
            .any(|needle| lower.contains(needle));

        let quota_status = matches!(
            status,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        );
        if status == StatusCode::PAYMENT_REQUIRED || (quota_status && mentions_quota) {
            return FetchError::QuotaExhausted { provider };
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                FetchError::Unauthorized { provider }
            }
            StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited {
                provider,
                retry_after_secs: retry_after_secs.unwrap_or(60),
            },
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                FetchError::Timeout { provider }
            }
            other => FetchError::UnexpectedStatus {
                provider,
                status: other.as_u16(),
            },
        }
    }
}

/// Read `Retry-After` as whole seconds, ignoring HTTP-date values.
pub(crate) fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}
