//! Tunable heuristics for evidence scanning and ad-count estimation.
//!
//! Every constant here is a guess carried over from hand-tuned scraping
//! heuristics, not a business rule. A YAML file can override any subset.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tier::ConfidenceTier;
use crate::ConfigError;

/// Fraction (as an integer percent) applied to a tier's base signal, and the
/// ceiling on the resulting count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierWeights {
    pub percent: u32,
    pub cap: u32,
}

/// One step of the new-ad ratio table: windows of at most `max_days`
/// use `percent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioStep {
    pub max_days: u32,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Lower-case phrases that mean the ad library returned nothing.
    pub no_results_phrases: Vec<String>,
    /// Lower-case keywords counted as "sponsored" markers.
    pub sponsored_markers: Vec<String>,
    /// Lower-case markup fragments that open one ad card.
    pub container_markers: Vec<String>,
    /// Lower-case suffixes stripped from handles to guess the brand stem.
    pub business_suffixes: Vec<String>,
    pub handle: TierWeights,
    pub domain: TierWeights,
    pub name: TierWeights,
    pub none: TierWeights,
    /// HANDLE/DOMAIN counts below this are recomputed from the sponsored count.
    pub low_count_threshold: u32,
    /// Ceiling on the sponsored count used by the low-count correction.
    pub low_count_cap: u32,
    /// Ascending by `max_days`.
    pub new_ad_ratio_steps: Vec<RatioStep>,
    /// Ratio for windows longer than the last step.
    pub new_ad_ratio_fallback_percent: u32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| -> Vec<String> {
            items.iter().map(|s| (*s).to_string()).collect()
        };
        Self {
            no_results_phrases: strings(&[
                "no results found",
                "no ads match your search",
                "no ads found",
                "there are no ads",
                "we couldn't find any ads",
                "didn't return any results",
                "no results for",
            ]),
            sponsored_markers: strings(&["sponsored"]),
            container_markers: strings(&[
                "library id:",
                "data-testid=\"ad-library-card\"",
                "data-ad-preview=",
                "class=\"_7jvw",
            ]),
            business_suffixes: strings(&[
                "official", "company", "group", "corp", "inc", "llc", "ltd", "co", "hq",
            ]),
            handle: TierWeights {
                percent: 70,
                cap: 150,
            },
            domain: TierWeights {
                percent: 50,
                cap: 75,
            },
            name: TierWeights {
                percent: 30,
                cap: 25,
            },
            none: TierWeights {
                percent: 20,
                cap: 10,
            },
            low_count_threshold: 3,
            low_count_cap: 20,
            new_ad_ratio_steps: vec![
                RatioStep {
                    max_days: 7,
                    percent: 15,
                },
                RatioStep {
                    max_days: 30,
                    percent: 25,
                },
            ],
            new_ad_ratio_fallback_percent: 40,
        }
    }
}

impl EstimatorConfig {
    #[must_use]
    pub fn weights(&self, tier: ConfidenceTier) -> TierWeights {
        match tier {
            ConfidenceTier::Handle => self.handle,
            ConfidenceTier::Domain => self.domain,
            ConfidenceTier::Name => self.name,
            ConfidenceTier::None => self.none,
        }
    }

    /// Share of active ads assumed to have started inside a window of
    /// `days`, as an integer percent. Thresholds are inclusive.
    #[must_use]
    pub fn new_ad_percent(&self, days: u32) -> u32 {
        self.new_ad_ratio_steps
            .iter()
            .find(|step| days <= step.max_days)
            .map_or(self.new_ad_ratio_fallback_percent, |step| step.percent)
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when a ratio is not below 100%,
    /// the step table is unsorted, or a marker list is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.no_results_phrases.iter().any(|p| p.trim().is_empty())
            || self.sponsored_markers.is_empty()
            || self.container_markers.is_empty()
        {
            return Err(ConfigError::Validation(
                "marker and phrase lists must be non-empty and contain no blank entries"
                    .to_string(),
            ));
        }

        for (label, weights) in [
            ("handle", self.handle),
            ("domain", self.domain),
            ("name", self.name),
            ("none", self.none),
        ] {
            if weights.percent > 100 {
                return Err(ConfigError::Validation(format!(
                    "{label} tier percent {} exceeds 100",
                    weights.percent
                )));
            }
        }

        if self.new_ad_ratio_fallback_percent >= 100
            || self.new_ad_ratio_steps.iter().any(|s| s.percent >= 100)
        {
            return Err(ConfigError::Validation(
                "new-ad ratios must be below 100%".to_string(),
            ));
        }

        if self
            .new_ad_ratio_steps
            .windows(2)
            .any(|pair| pair[0].max_days >= pair[1].max_days)
        {
            return Err(ConfigError::Validation(
                "new_ad_ratio_steps must be sorted by ascending max_days".to_string(),
            ));
        }

        Ok(())
    }
}

/// Tuning from `path` when one is configured, otherwise the built-in defaults.
///
/// # Errors
///
/// Returns `ConfigError` if a configured file cannot be loaded.
pub fn resolve_tuning(path: Option<&Path>) -> Result<EstimatorConfig, ConfigError> {
    match path {
        Some(path) => load_tuning(path),
        None => Ok(EstimatorConfig::default()),
    }
}

/// Load estimator tuning from a YAML file, falling back to defaults for
/// anything the file leaves out.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_tuning(path: &Path) -> Result<EstimatorConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let config: EstimatorConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
