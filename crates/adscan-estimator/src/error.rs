use thiserror::Error;

use adscan_fetch::FetchError;

/// Failures that stop a batch before any company is analysed.
#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("fetch provider setup failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("LLM reviewer setup failed: {0}")]
    Llm(#[from] LlmError),
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM review is disabled")]
    Disabled,

    #[error("LLM review is enabled but OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("LLM request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("LLM returned status {status}")]
    Status { status: u16 },

    #[error("LLM response had no message content")]
    EmptyResponse,

    #[error(transparent)]
    Parse(#[from] LlmParseError),
}

#[derive(Debug, Error)]
pub enum LlmParseError {
    #[error("no JSON object found in LLM output")]
    NoJson,

    #[error("LLM output is not a valid estimate: {0}")]
    Json(#[from] serde_json::Error),
}
