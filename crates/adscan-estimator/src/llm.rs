//! Optional LLM second opinion on the heuristic estimate.
//!
//! The model sees a compact evidence summary and answers with
//! `{"activeAds": n}`. Its output is untrusted text: [`parse_llm_estimate`]
//! is the only way it turns into a number, and any failure there leaves the
//! heuristic estimate in place.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use adscan_core::{CompanyInput, ConfidenceTier};

use crate::error::{LlmError, LlmParseError};
use crate::estimate::AdEstimate;
use crate::evidence::EvidenceReport;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

const SYSTEM_PROMPT: &str = "You review scraped Facebook Ad Library evidence for one company. \
Reply with a single JSON object of the form {\"activeAds\": <non-negative integer>} and nothing else.";

/// Prompt in, raw completion text out.
pub trait EstimateReviewer {
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, LlmError>> + Send;
}

/// Reviewer used when LLM review is off. Always declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReview;

impl EstimateReviewer for NoReview {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Disabled)
    }
}

/// The estimate the model is asked to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ParsedEstimate {
    #[serde(rename = "activeAds", alias = "active_ads")]
    pub active_ads: u32,
}

/// Pull a [`ParsedEstimate`] out of free-form model output.
///
/// Strips Markdown code fences, then parses the text between the first `{`
/// and the last `}`.
///
/// # Errors
///
/// Returns [`LlmParseError::NoJson`] when there is no brace-delimited span,
/// or [`LlmParseError::Json`] when that span does not deserialize.
pub fn parse_llm_estimate(text: &str) -> Result<ParsedEstimate, LlmParseError> {
    let unfenced = text.replace("```json", "").replace("```", "");
    let start = unfenced.find('{').ok_or(LlmParseError::NoJson)?;
    let end = unfenced.rfind('}').ok_or(LlmParseError::NoJson)?;
    if end < start {
        return Err(LlmParseError::NoJson);
    }
    Ok(serde_json::from_str(&unfenced[start..=end])?)
}

/// Evidence summary sent to the reviewer.
#[must_use]
pub fn review_prompt(
    input: &CompanyInput,
    report: &EvidenceReport,
    heuristic: &AdEstimate,
    date_range_days: u32,
    tier_cap: u32,
) -> String {
    let m = &report.markers;
    let tier_note = match heuristic.tier {
        ConfidenceTier::Handle => "the company's social handle appears on the page",
        ConfidenceTier::Domain => "the company's website domain appears on the page",
        ConfidenceTier::Name => "only the company name appears on the page",
        ConfidenceTier::None => "nothing identifying the company appears on the page",
    };
    format!(
        "Company: {name}\nWebsite: {website}\nVerification: {tier} ({tier_note})\n\
         Marker counts: sponsored={sponsored}, ad labels={labels}, ad cards={cards}, \
         ad cards mentioning the handle={colocated}\n\
         Heuristic estimate: {heuristic_count} active ads\n\
         Date range: last {date_range_days} days\n\
         Estimate how many ads this company is currently running. \
         The answer must be between 0 and {tier_cap}.",
        name = input.company_name,
        website = input.website_url,
        tier = heuristic.tier,
        sponsored = m.sponsored,
        labels = m.ad_label,
        cards = m.containers,
        colocated = m.handle_colocated,
        heuristic_count = heuristic.active_ads.unwrap_or(0),
    )
}

/// OpenAI chat-completions reviewer.
pub struct OpenAiReviewer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: ResponseFormat,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiReviewer {
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, LlmError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Point the reviewer at a different host, e.g. a mock server.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(LlmError::Http)?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            url: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
        })
    }
}

impl EstimateReviewer for OpenAiReviewer {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(LlmError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
            });
        }

        let body: ChatResponse = response.json().await.map_err(LlmError::Http)?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}
