//! Verification-tiered ad estimation.
//!
//! For each company: derive comparison identifiers from its social and
//! website URLs, fetch the ad-library search page, scan it for presence
//! signals, classify how trustworthy the match is, and turn raw marker
//! counts into a bounded active/new ad estimate.

pub mod classify;
pub mod error;
pub mod estimate;
pub mod evidence;
pub mod handles;
pub mod llm;
pub mod pipeline;

pub use classify::classify;
pub use error::{EstimatorError, LlmError, LlmParseError};
pub use estimate::{estimate, AdEstimate, MissReason};
pub use evidence::{scan, EvidenceReport, MarkerCounts};
pub use handles::{extract_domain, extract_identifiers, HandleSet, Identifiers, Platform};
pub use llm::{
    parse_llm_estimate, review_prompt, EstimateReviewer, NoReview, OpenAiReviewer, ParsedEstimate,
};
pub use pipeline::{
    analyze_document, build_pipeline, Analysis, BatchReport, BatchSummary, Pipeline,
};
