//! `adscan analyze`: the online batch.

use std::path::Path;

use adscan_core::{AppConfig, CompanyInput};

/// Gather companies from the file and flags, run the pipeline, and print
/// the batch response as JSON on stdout.
///
/// # Errors
///
/// Returns an error if no companies were given, the batch exceeds
/// `ADSCAN_MAX_COMPANIES`, the companies or tuning file cannot be loaded, or
/// the configured provider is missing its credentials. Per-company failures
/// are reported in the output, not returned.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    companies_file: Option<&Path>,
    inline: Vec<CompanyInput>,
    date_range: u32,
) -> anyhow::Result<()> {
    let companies = collect_companies(companies_file, inline)?;
    if companies.is_empty() {
        anyhow::bail!("no companies given; pass --companies <file> or --company NAME|WEBSITE");
    }
    if companies.len() > config.max_companies {
        anyhow::bail!(
            "{} companies given but ADSCAN_MAX_COMPANIES is {}",
            companies.len(),
            config.max_companies
        );
    }

    let tuning = adscan_core::resolve_tuning(config.tuning_path.as_deref())?;
    let mut pipeline = adscan_estimator::build_pipeline(config, tuning)?;

    let report = pipeline.run(&companies, date_range).await;

    let output = serde_json::json!({
        "companies": report.results,
        "dateRange": date_range,
        "analysisDate": chrono::Utc::now().to_rfc3339(),
        "summary": report.summary,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// File entries first, then inline flags, in the order given.
pub(crate) fn collect_companies(
    companies_file: Option<&Path>,
    inline: Vec<CompanyInput>,
) -> anyhow::Result<Vec<CompanyInput>> {
    let mut companies = match companies_file {
        Some(path) => adscan_core::load_companies(path)?.companies,
        None => Vec::new(),
    };
    companies.extend(inline);
    Ok(companies)
}
