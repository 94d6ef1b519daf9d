mod analyze;
mod scan;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use adscan_core::CompanyInput;

#[derive(Debug, Parser)]
#[command(name = "adscan")]
#[command(about = "Estimate ad-library activity for a list of companies")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch each company's ad-library page and estimate active/new ads
    Analyze {
        /// YAML file with a `companies:` list
        #[arg(long)]
        companies: Option<PathBuf>,
        /// Inline company, repeatable
        #[arg(long = "company", value_name = "NAME|WEBSITE[|SOCIAL_URL]", value_parser = parse_company_flag)]
        company: Vec<CompanyInput>,
        /// Window in days used for the new-ad ratio
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=365))]
        date_range: u32,
    },
    /// Analyse a saved ad-library document offline
    Scan {
        /// Path to the saved HTML or text document
        #[arg(long)]
        document: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        website: String,
        #[arg(long)]
        social: Option<String>,
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=365))]
        date_range: u32,
    },
    /// Print the handle variants and domain derived from a company's URLs
    Handles {
        social_url: String,
        #[arg(long, default_value = "")]
        website: String,
    },
}

/// Parse `NAME|WEBSITE[|SOCIAL_URL]`. Website and social URL may be empty.
fn parse_company_flag(raw: &str) -> Result<CompanyInput, String> {
    let mut parts = raw.split('|').map(str::trim);
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err("company name must not be empty".to_string());
    }
    let website = parts.next().unwrap_or_default();
    let social = parts.next().filter(|s| !s.is_empty());
    if parts.next().is_some() {
        return Err(format!(
            "expected NAME|WEBSITE[|SOCIAL_URL], got {} fields",
            raw.split('|').count()
        ));
    }
    Ok(CompanyInput::new(name, website, social))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = adscan_core::load_app_config();
    let log_level = config.as_ref().map_or("info", |c| c.log_level.as_str());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            companies,
            company,
            date_range,
        } => {
            let config = config?;
            analyze::run_analyze(&config, companies.as_deref(), company, date_range).await
        }
        Commands::Scan {
            document,
            name,
            website,
            social,
            date_range,
        } => {
            let config = config?;
            let input = CompanyInput::new(&name, &website, social.as_deref());
            scan::run_scan(&config, &document, &input, date_range)
        }
        Commands::Handles {
            social_url,
            website,
        } => {
            if let Err(e) = &config {
                tracing::warn!(error = %e, "configuration invalid; using default tuning");
            }
            scan::run_handles(config.as_ref().ok(), &social_url, &website)
        }
    }
}

#[cfg(test)]
mod tests;
