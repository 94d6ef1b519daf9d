//! Offline commands: no fetch provider, no credentials.

use std::path::Path;

use anyhow::Context;

use adscan_core::{AppConfig, CompanyInput};

/// Analyse a saved document and print the analysis plus the result the
/// batch would have reported.
pub(crate) fn run_scan(
    config: &AppConfig,
    document: &Path,
    input: &CompanyInput,
    date_range: u32,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(document)
        .with_context(|| format!("failed to read {}", document.display()))?;
    let tuning = adscan_core::resolve_tuning(config.tuning_path.as_deref())?;

    let analysis = adscan_estimator::analyze_document(input, &text, date_range, &tuning);
    let result = analysis.estimate.into_result(input);

    let output = serde_json::json!({
        "analysis": analysis,
        "result": result,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print the identifiers derived from the given URLs. Needs no credentials,
/// and runs on default tuning when no configuration could be loaded.
pub(crate) fn run_handles(
    config: Option<&AppConfig>,
    social_url: &str,
    website: &str,
) -> anyhow::Result<()> {
    let tuning =
        adscan_core::resolve_tuning(config.and_then(|c| c.tuning_path.as_deref()))?;
    let input = CompanyInput::new("", website, Some(social_url));
    let ids = adscan_estimator::extract_identifiers(&input, &tuning.business_suffixes);

    if ids.platform.is_none() {
        tracing::warn!(social_url, "no known platform host in social URL");
    }
    println!("{}", serde_json::to_string_pretty(&ids)?);
    Ok(())
}
