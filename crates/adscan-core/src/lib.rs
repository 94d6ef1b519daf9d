//! Shared data model and configuration for the ad-activity scanner.

pub mod app_config;
pub mod companies;
pub mod config;
pub mod error;
pub mod tier;
pub mod tuning;

pub use app_config::{AppConfig, Environment, FetchProviderKind};
pub use companies::{load_companies, CompaniesFile, CompanyInput, CompanyResult};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use tier::ConfidenceTier;
pub use tuning::{load_tuning, resolve_tuning, EstimatorConfig, RatioStep, TierWeights};
