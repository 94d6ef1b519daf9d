//! `POST /api/v1/analyze`.

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adscan_core::{AppConfig, CompanyInput, CompanyResult};
use adscan_estimator::{build_pipeline, BatchSummary};

use super::{ApiError, AppState};
use crate::middleware::RequestId;

const MAX_DATE_RANGE_DAYS: u32 = 365;

fn default_date_range() -> u32 {
    30
}

/// Request body. Provider keys are optional and, when present, take
/// precedence over the server's environment for this request only.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnalyzeRequest {
    pub companies: Vec<CompanyInput>,
    #[serde(default = "default_date_range")]
    pub date_range: u32,
    #[serde(default, alias = "scrapingbeeApiKey")]
    pub scraping_bee_api_key: Option<String>,
    #[serde(default)]
    pub browserless_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnalyzeResponse {
    pub companies: Vec<CompanyResult>,
    pub date_range: u32,
    pub analysis_date: DateTime<Utc>,
    pub summary: BatchSummary,
}

impl AnalyzeRequest {
    fn validate(&self, max_companies: usize) -> Result<(), String> {
        if self.companies.is_empty() {
            return Err("companies must contain at least one entry".to_string());
        }
        if self.companies.len() > max_companies {
            return Err(format!(
                "at most {max_companies} companies per request, got {}",
                self.companies.len()
            ));
        }
        if self.companies.iter().all(|c| !c.has_name()) {
            return Err("every company has a blank name".to_string());
        }
        if !(1..=MAX_DATE_RANGE_DAYS).contains(&self.date_range) {
            return Err(format!(
                "dateRange must be between 1 and {MAX_DATE_RANGE_DAYS}"
            ));
        }
        Ok(())
    }

    /// Server config with any non-blank request keys layered on top.
    fn effective_config(&self, base: &AppConfig) -> AppConfig {
        let pick = |key: &Option<String>, fallback: &Option<String>| {
            key.as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .or_else(|| fallback.clone())
        };

        let mut config = base.clone();
        config.scrapingbee_api_key = pick(&self.scraping_bee_api_key, &base.scrapingbee_api_key);
        config.browserless_api_key = pick(&self.browserless_api_key, &base.browserless_api_key);
        config.openai_api_key = pick(&self.openai_api_key, &base.openai_api_key);
        config
    }
}

pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;

    request
        .validate(state.config.max_companies)
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let config = request.effective_config(&state.config);
    let mut pipeline = build_pipeline(&config, (*state.tuning).clone()).map_err(|e| {
        tracing::warn!(request_id = %req_id.0, error = %e, "rejecting analyze request");
        ApiError::new(req_id.0.clone(), "missing_credentials", e.to_string())
    })?;

    let report = pipeline.run(&request.companies, request.date_range).await;

    Ok(Json(AnalyzeResponse {
        companies: report.results,
        date_range: request.date_range,
        analysis_date: Utc::now(),
        summary: report.summary,
    }))
}
