//! Marker counts to a bounded active/new ad estimate.

use serde::Serialize;

use adscan_core::{CompanyInput, CompanyResult, ConfidenceTier, EstimatorConfig};

use crate::evidence::EvidenceReport;

/// Why a company ended up with no active-ad count. None of these are
/// failures; they are reported as `found: false` with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissReason {
    /// The ad library said it had nothing for the query.
    NoResults,
    /// Name, domain, or handle evidence exists but no ads were counted.
    NoActiveAds,
    /// No evidence the company appears in the document at all.
    NotFound,
}

impl MissReason {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            MissReason::NoResults => {
                "no ads found: the ad library returned no results for this company"
            }
            MissReason::NoActiveAds => {
                "company found in the ad library but no active ads were detected"
            }
            MissReason::NotFound => "company not found in the ad library",
        }
    }
}

impl std::fmt::Display for MissReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdEstimate {
    /// `None` whenever the final count is zero.
    pub active_ads: Option<u32>,
    pub new_ads: Option<u32>,
    pub tier: ConfidenceTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miss: Option<MissReason>,
}

impl AdEstimate {
    fn miss(tier: ConfidenceTier, reason: MissReason) -> Self {
        Self {
            active_ads: None,
            new_ads: None,
            tier,
            miss: Some(reason),
        }
    }

    /// Build an estimate from a final count: clamp to the tier cap, derive
    /// new ads from the date-range ratio, and turn zero into a miss.
    #[must_use]
    pub fn from_count(
        count: u32,
        tier: ConfidenceTier,
        date_range_days: u32,
        config: &EstimatorConfig,
    ) -> Self {
        let active = count.min(config.weights(tier).cap);
        if active == 0 {
            let reason = if tier == ConfidenceTier::None {
                MissReason::NotFound
            } else {
                MissReason::NoActiveAds
            };
            return Self::miss(tier, reason);
        }

        let percent = config.new_ad_percent(date_range_days);
        Self {
            active_ads: Some(active),
            new_ads: Some(ceil_percent(active, percent).min(active)),
            tier,
            miss: None,
        }
    }

    #[must_use]
    pub fn found(&self) -> bool {
        self.active_ads.is_some_and(|n| n > 0)
    }

    #[must_use]
    pub fn into_result(self, input: &CompanyInput) -> CompanyResult {
        match (self.active_ads, self.miss) {
            (Some(active), _) if active > 0 => {
                CompanyResult::active(input, active, self.new_ads.unwrap_or(0), self.tier)
            }
            (_, Some(reason)) => CompanyResult::missed(input, self.tier, reason.message()),
            _ => CompanyResult::missed(input, self.tier, MissReason::NotFound.message()),
        }
    }
}

/// Estimate active and new ads for one scanned document.
#[must_use]
pub fn estimate(
    report: &EvidenceReport,
    tier: ConfidenceTier,
    date_range_days: u32,
    config: &EstimatorConfig,
) -> AdEstimate {
    if report.no_results_detected {
        return AdEstimate::miss(tier, MissReason::NoResults);
    }

    let markers = &report.markers;
    let weights = config.weights(tier);

    let raw = match tier {
        ConfidenceTier::Handle if markers.handle_colocated > 0 => markers.handle_colocated,
        ConfidenceTier::Handle | ConfidenceTier::Name => {
            scale_percent(markers.sponsored, weights.percent)
        }
        ConfidenceTier::Domain => markers
            .containers
            .max(scale_percent(markers.sponsored, weights.percent)),
        ConfidenceTier::None => scale_percent(markers.containers, weights.percent),
    };
    let mut count = raw.min(weights.cap);

    // Low-count correction: a handle or domain match with ads on the page
    // but a tiny weighted count falls back to the capped sponsored count.
    let corrects_low = matches!(tier, ConfidenceTier::Handle | ConfidenceTier::Domain);
    if corrects_low && count < config.low_count_threshold && markers.any_ads() {
        let fallback = markers
            .sponsored
            .max(markers.ad_label)
            .min(config.low_count_cap);
        if fallback > count {
            tracing::debug!(%tier, count, fallback, "applying low-count correction");
            count = fallback.min(weights.cap);
        }
    }

    AdEstimate::from_count(count, tier, date_range_days, config)
}

/// `floor(n * percent / 100)`.
fn scale_percent(n: u32, percent: u32) -> u32 {
    let scaled = u64::from(n) * u64::from(percent) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// `ceil(n * percent / 100)`.
fn ceil_percent(n: u32, percent: u32) -> u32 {
    let scaled = (u64::from(n) * u64::from(percent)).div_ceil(100);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "estimate_test.rs"]
mod tests;
