//! Batch orchestration.
//!
//! Companies are analysed strictly one after another in input order. The
//! only thing spacing out upstream requests is the injected [`Pacer`]; the
//! loop itself never sleeps or retries.

use serde::Serialize;

use adscan_core::{AppConfig, CompanyInput, CompanyResult, ConfidenceTier, EstimatorConfig};
use adscan_fetch::{
    ad_library_search_url, DocumentFetcher, FetchError, FetchOptions, FetchProvider, MinInterval,
    Pacer,
};

use crate::classify::classify;
use crate::error::{EstimatorError, LlmError};
use crate::estimate::{estimate, AdEstimate, MissReason};
use crate::evidence::{scan, EvidenceReport};
use crate::handles::{extract_identifiers, Identifiers};
use crate::llm::{parse_llm_estimate, review_prompt, EstimateReviewer, NoReview, OpenAiReviewer};

/// Everything derived from one company's ad-library document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub identifiers: Identifiers,
    pub report: EvidenceReport,
    pub tier: ConfidenceTier,
    pub estimate: AdEstimate,
    /// Whether an LLM review replaced the heuristic count.
    pub reviewed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Companies submitted, including skipped ones.
    pub total: usize,
    pub found: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub results: Vec<CompanyResult>,
    pub summary: BatchSummary,
}

/// Extract, scan, classify, and estimate for a document already in hand.
#[must_use]
pub fn analyze_document(
    input: &CompanyInput,
    document: &str,
    date_range_days: u32,
    config: &EstimatorConfig,
) -> Analysis {
    let identifiers = extract_identifiers(input, &config.business_suffixes);
    let report = scan(document, input, &identifiers, config);
    let tier = classify(&report);
    let estimate = estimate(&report, tier, date_range_days, config);

    tracing::debug!(
        company = %input.company_name,
        handles = identifiers.handles.len(),
        domain = ?identifiers.domain,
        %tier,
        sponsored = report.markers.sponsored,
        containers = report.markers.containers,
        colocated = report.markers.handle_colocated,
        no_results = report.no_results_detected,
        "document analysed"
    );

    Analysis {
        identifiers,
        report,
        tier,
        estimate,
        reviewed: false,
    }
}

pub struct Pipeline<F, P, R = NoReview> {
    fetcher: F,
    pacer: P,
    reviewer: Option<R>,
    config: EstimatorConfig,
    options: FetchOptions,
    country: String,
}

impl<F, P> Pipeline<F, P, NoReview>
where
    F: DocumentFetcher,
    P: Pacer,
{
    #[must_use]
    pub fn new(fetcher: F, pacer: P, config: EstimatorConfig) -> Self {
        Self {
            fetcher,
            pacer,
            reviewer: None,
            config,
            options: FetchOptions::default(),
            country: "US".to_string(),
        }
    }
}

impl<F, P, R> Pipeline<F, P, R>
where
    F: DocumentFetcher,
    P: Pacer,
    R: EstimateReviewer,
{
    /// Swap in an LLM reviewer. `None` keeps estimates purely heuristic.
    #[must_use]
    pub fn with_reviewer<R2: EstimateReviewer>(self, reviewer: Option<R2>) -> Pipeline<F, P, R2> {
        Pipeline {
            fetcher: self.fetcher,
            pacer: self.pacer,
            reviewer,
            config: self.config,
            options: self.options,
            country: self.country,
        }
    }

    #[must_use]
    pub fn with_fetch_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Two-letter country the ad library is searched in.
    #[must_use]
    pub fn with_country(mut self, country: &str) -> Self {
        self.country = country.to_string();
        self
    }

    #[must_use]
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Analyse every company in order.
    ///
    /// Never fails as a whole: each company yields exactly one result, and a
    /// fetch failure becomes that company's `error`. Companies with a blank
    /// name are skipped and left out of `results`.
    pub async fn run(&mut self, companies: &[CompanyInput], date_range_days: u32) -> BatchReport {
        let mut results = Vec::with_capacity(companies.len());
        let mut summary = BatchSummary {
            total: companies.len(),
            ..BatchSummary::default()
        };

        tracing::info!(
            companies = companies.len(),
            date_range_days,
            provider = self.fetcher.provider(),
            "starting ad estimation batch"
        );

        for input in companies {
            if !input.has_name() {
                tracing::warn!(website = %input.website_url, "skipping company with blank name");
                summary.skipped += 1;
                continue;
            }

            let result = match self.analyze_company(input, date_range_days).await {
                Ok(analysis) => {
                    tracing::info!(
                        company = %input.company_name,
                        tier = %analysis.tier,
                        active_ads = ?analysis.estimate.active_ads,
                        new_ads = ?analysis.estimate.new_ads,
                        reviewed = analysis.reviewed,
                        "company analysed"
                    );
                    analysis.estimate.into_result(input)
                }
                Err(e) => {
                    tracing::warn!(
                        company = %input.company_name,
                        error = %e,
                        "company analysis failed"
                    );
                    summary.failed += 1;
                    CompanyResult::failed(input, e.to_string())
                }
            };

            if result.found {
                summary.found += 1;
            }
            results.push(result);
        }

        if summary.failed > 0 {
            tracing::warn!(
                failed = summary.failed,
                total = summary.total,
                "some companies failed during the batch"
            );
        }
        tracing::info!(
            total = summary.total,
            found = summary.found,
            failed = summary.failed,
            skipped = summary.skipped,
            "ad estimation batch complete"
        );

        BatchReport { results, summary }
    }

    /// Fetch the ad-library search page for one company and analyse it.
    ///
    /// # Errors
    ///
    /// Returns the fetcher's [`FetchError`]. Nothing after the fetch fails.
    pub async fn analyze_company(
        &mut self,
        input: &CompanyInput,
        date_range_days: u32,
    ) -> Result<Analysis, FetchError> {
        let url = ad_library_search_url(&input.company_name, &self.country);

        self.pacer.pace().await;
        tracing::debug!(company = %input.company_name, %url, "fetching ad library");
        let document = self.fetcher.fetch(&url, &self.options).await?;

        let mut analysis = analyze_document(input, &document, date_range_days, &self.config);
        self.review(input, &mut analysis, date_range_days).await;
        Ok(analysis)
    }

    /// Let the reviewer replace the heuristic count. Any reviewer or parse
    /// failure keeps the heuristic estimate.
    async fn review(&self, input: &CompanyInput, analysis: &mut Analysis, date_range_days: u32) {
        let Some(reviewer) = &self.reviewer else {
            return;
        };
        if analysis.estimate.miss == Some(MissReason::NoResults) {
            return;
        }

        let cap = self.config.weights(analysis.tier).cap;
        let prompt = review_prompt(
            input,
            &analysis.report,
            &analysis.estimate,
            date_range_days,
            cap,
        );

        let parsed = match reviewer.complete(&prompt).await {
            Ok(text) => parse_llm_estimate(&text).map_err(LlmError::from),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(parsed) => {
                tracing::debug!(
                    company = %input.company_name,
                    heuristic = ?analysis.estimate.active_ads,
                    reviewed = parsed.active_ads,
                    cap,
                    "LLM review accepted"
                );
                analysis.estimate = AdEstimate::from_count(
                    parsed.active_ads,
                    analysis.tier,
                    date_range_days,
                    &self.config,
                );
                analysis.reviewed = true;
            }
            Err(LlmError::Disabled) => {}
            Err(e) => {
                tracing::warn!(
                    company = %input.company_name,
                    error = %e,
                    "LLM review failed; keeping heuristic estimate"
                );
            }
        }
    }
}

/// Assemble the production pipeline from application config.
///
/// Credentials are checked here, before any company is touched.
///
/// # Errors
///
/// Returns [`EstimatorError::Fetch`] when the selected fetch provider has no
/// API key, or [`EstimatorError::Llm`] when LLM review is on without an
/// OpenAI key.
pub fn build_pipeline(
    config: &AppConfig,
    tuning: EstimatorConfig,
) -> Result<Pipeline<FetchProvider, MinInterval, OpenAiReviewer>, EstimatorError> {
    let fetcher = FetchProvider::from_config(config)?;

    let reviewer = if config.llm_review {
        let api_key = config
            .openai_api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey)?;
        Some(OpenAiReviewer::new(
            api_key,
            &config.openai_model,
            config.fetch_timeout_secs,
        )?)
    } else {
        None
    };

    Ok(Pipeline::new(
        fetcher,
        MinInterval::from_millis(config.inter_request_delay_ms),
        tuning,
    )
    .with_reviewer(reviewer)
    .with_fetch_options(FetchOptions::from_config(config))
    .with_country(&config.ad_library_country))
}
