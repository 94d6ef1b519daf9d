//! Presence signals scanned out of an ad-library document.
//!
//! The markup is third-party and unversioned, so this is plain substring
//! and regex counting. Results are best-effort signals, not extraction.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use adscan_core::{CompanyInput, EstimatorConfig};

use crate::handles::{Identifiers, Platform};

/// `>Ad<` style labels, matched against the original-case document.
static AD_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s*Ad\s*<").expect("valid ad label regex"));

/// Raw occurrence counts. Uncapped at this stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerCounts {
    pub sponsored: u32,
    pub ad_label: u32,
    pub containers: u32,
    /// Ad containers whose markup mentions the matched handle.
    pub handle_colocated: u32,
}

impl MarkerCounts {
    /// Whether anything in the document looks like an ad at all.
    #[must_use]
    pub fn any_ads(&self) -> bool {
        self.sponsored > 0 || self.ad_label > 0 || self.containers > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceReport {
    pub no_results_detected: bool,
    pub domain_appears: bool,
    pub name_appears: bool,
    /// First handle variant found in the document, if any.
    pub handle_match: Option<String>,
    pub markers: MarkerCounts,
}

impl EvidenceReport {
    #[must_use]
    pub fn handle_matched(&self) -> bool {
        self.handle_match.is_some()
    }
}

/// Scan `document` for evidence about `input`.
///
/// Pure: the same document and identifiers always give the same report.
#[must_use]
pub fn scan(
    document: &str,
    input: &CompanyInput,
    ids: &Identifiers,
    config: &EstimatorConfig,
) -> EvidenceReport {
    let lower = document.to_lowercase();

    let no_results_detected = config
        .no_results_phrases
        .iter()
        .any(|phrase| lower.contains(phrase.to_lowercase().as_str()));

    let domain_appears = ids
        .domain
        .as_deref()
        .is_some_and(|domain| lower.contains(domain));

    let name_appears = name_forms(&input.company_name)
        .iter()
        .any(|form| lower.contains(form.as_str()));

    let handle_match = match_handle(document, &lower, ids);

    let sponsored = config
        .sponsored_markers
        .iter()
        .map(|marker| occurrences(&lower, &marker.to_lowercase()))
        .fold(0u32, u32::saturating_add);

    let ad_label = saturating_u32(AD_LABEL_RE.find_iter(document).count());

    let container_starts = dominant_container_starts(&lower, &config.container_markers);
    let containers = saturating_u32(container_starts.len());

    let handle_colocated = handle_match.as_deref().map_or(0, |handle| {
        colocated_count(&lower, &container_starts, &handle.to_lowercase())
    });

    EvidenceReport {
        no_results_detected,
        domain_appears,
        name_appears,
        handle_match,
        markers: MarkerCounts {
            sponsored,
            ad_label,
            containers,
            handle_colocated,
        },
    }
}

/// Lowercase name as given, plus a punctuation-free form.
fn name_forms(name: &str) -> Vec<String> {
    let lower = name.trim().to_lowercase();
    let stripped = lower
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut forms = Vec::with_capacity(2);
    for form in [lower, stripped] {
        if !form.is_empty() && !forms.contains(&form) {
            forms.push(form);
        }
    }
    forms
}

/// First handle variant present as `handle`, `@handle`, or `<host>/handle`,
/// checked in the lowercased text and then case-sensitively in the raw text.
fn match_handle(document: &str, lower: &str, ids: &Identifiers) -> Option<String> {
    let hosts = ids.platform.unwrap_or(Platform::Facebook).hosts();

    ids.handles
        .iter()
        .find(|handle| {
            let needle = handle.to_lowercase();
            let in_lower = lower.contains(needle.as_str())
                || lower.contains(format!("@{needle}").as_str())
                || hosts
                    .iter()
                    .any(|host| lower.contains(format!("{host}/{needle}").as_str()));
            in_lower || document.contains(handle)
        })
        .map(str::to_string)
}

fn occurrences(haystack: &str, needle: &str) -> u32 {
    if needle.is_empty() {
        return 0;
    }
    saturating_u32(haystack.matches(needle).count())
}

/// Start offsets of the container marker that occurs most often.
///
/// Several markers can describe the same card, so counts are not summed;
/// the most frequent signature wins.
fn dominant_container_starts(lower: &str, markers: &[String]) -> Vec<usize> {
    markers
        .iter()
        .map(|marker| marker.to_lowercase())
        .filter(|marker| !marker.is_empty())
        .map(|marker| {
            lower
                .match_indices(marker.as_str())
                .map(|(i, _)| i)
                .collect::<Vec<_>>()
        })
        .max_by_key(Vec::len)
        .unwrap_or_default()
}

/// Count container segments (marker start up to the next marker start)
/// that mention `handle`.
fn colocated_count(lower: &str, starts: &[usize], handle: &str) -> u32 {
    let hits = starts
        .iter()
        .enumerate()
        .filter(|&(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(lower.len());
            lower[start..end].contains(handle)
        })
        .count();
    saturating_u32(hits)
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
