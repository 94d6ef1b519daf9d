use adscan_core::ConfidenceTier;

use crate::evidence::EvidenceReport;

/// Strongest verification signal present in `report`.
///
/// Total and deterministic: a handle match beats a domain mention, which
/// beats a name mention.
#[must_use]
pub fn classify(report: &EvidenceReport) -> ConfidenceTier {
    if report.handle_matched() {
        ConfidenceTier::Handle
    } else if report.domain_appears {
        ConfidenceTier::Domain
    } else if report.name_appears {
        ConfidenceTier::Name
    } else {
        ConfidenceTier::None
    }
}
