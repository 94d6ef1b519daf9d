use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tier::ConfidenceTier;
use crate::ConfigError;

/// One company submitted for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInput {
    #[serde(alias = "company_name", alias = "name")]
    pub company_name: String,
    #[serde(default, alias = "website_url", alias = "website")]
    pub website_url: String,
    #[serde(default, alias = "social_url", alias = "facebook_url")]
    pub social_url: Option<String>,
}

impl CompanyInput {
    #[must_use]
    pub fn new(company_name: &str, website_url: &str, social_url: Option<&str>) -> Self {
        Self {
            company_name: company_name.to_string(),
            website_url: website_url.to_string(),
            social_url: social_url.map(str::to_string),
        }
    }

    #[must_use]
    pub fn has_name(&self) -> bool {
        !self.company_name.trim().is_empty()
    }
}

/// Outcome for one company in a batch.
///
/// `found` is true exactly when `active_ads` is a positive count; the
/// constructors are the only way the pipeline builds one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResult {
    pub company_name: String,
    pub website_url: String,
    pub found: bool,
    pub active_ads: Option<u32>,
    pub new_ads: Option<u32>,
    pub verification: Option<ConfidenceTier>,
    pub error: Option<String>,
}

impl CompanyResult {
    /// A company with a positive active-ad estimate. A zero count is
    /// reported through [`CompanyResult::missed`] instead.
    #[must_use]
    pub fn active(
        input: &CompanyInput,
        active_ads: u32,
        new_ads: u32,
        tier: ConfidenceTier,
    ) -> Self {
        debug_assert!(active_ads > 0, "active results need a positive count");
        Self {
            company_name: input.company_name.clone(),
            website_url: input.website_url.clone(),
            found: active_ads > 0,
            active_ads: (active_ads > 0).then_some(active_ads),
            new_ads: (active_ads > 0).then_some(new_ads.min(active_ads)),
            verification: Some(tier),
            error: None,
        }
    }

    /// A company that was analysed but showed no active ads.
    #[must_use]
    pub fn missed(input: &CompanyInput, tier: ConfidenceTier, reason: impl Into<String>) -> Self {
        Self {
            company_name: input.company_name.clone(),
            website_url: input.website_url.clone(),
            found: false,
            active_ads: None,
            new_ads: None,
            verification: Some(tier),
            error: Some(reason.into()),
        }
    }

    /// A company whose analysis failed before a tier could be assigned.
    #[must_use]
    pub fn failed(input: &CompanyInput, error: impl Into<String>) -> Self {
        Self {
            company_name: input.company_name.clone(),
            website_url: input.website_url.clone(),
            found: false,
            active_ads: None,
            new_ads: None,
            verification: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompaniesFile {
    pub companies: Vec<CompanyInput>,
}

/// Load and validate a batch of companies from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_companies(path: &Path) -> Result<CompaniesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CompaniesFile = serde_yaml::from_str(&content)?;
    validate_companies(&file)?;
    Ok(file)
}

fn validate_companies(file: &CompaniesFile) -> Result<(), ConfigError> {
    if file.companies.is_empty() {
        return Err(ConfigError::Validation(
            "companies file lists no companies".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for company in &file.companies {
        if !company.has_name() {
            return Err(ConfigError::Validation(
                "company name must be non-empty".to_string(),
            ));
        }

        if !seen.insert(company.company_name.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate company name: '{}'",
                company.company_name
            )));
        }
    }

    Ok(())
}
