use super::*;
use crate::evidence::MarkerCounts;

fn cfg() -> EstimatorConfig {
    EstimatorConfig::default()
}

fn report(markers: MarkerCounts) -> EvidenceReport {
    EvidenceReport {
        markers,
        ..EvidenceReport::default()
    }
}

fn sponsored(n: u32) -> MarkerCounts {
    MarkerCounts {
        sponsored: n,
        ..MarkerCounts::default()
    }
}

// ---------------------------------------------------------------------------
// Tier weighting
// ---------------------------------------------------------------------------

#[test]
fn handle_falls_back_to_seventy_percent_of_sponsored() {
    let est = estimate(&report(sponsored(10)), ConfidenceTier::Handle, 7, &cfg());
    assert_eq!(est.active_ads, Some(7));
    assert_eq!(est.new_ads, Some(2));
    assert!(est.found());
}

#[test]
fn handle_prefers_colocated_count() {
    let markers = MarkerCounts {
        sponsored: 40,
        containers: 12,
        handle_colocated: 9,
        ad_label: 0,
    };
    let est = estimate(&report(markers), ConfidenceTier::Handle, 30, &cfg());
    assert_eq!(est.active_ads, Some(9));
}

#[test]
fn handle_is_capped() {
    let est = estimate(&report(sponsored(1_000)), ConfidenceTier::Handle, 30, &cfg());
    assert_eq!(est.active_ads, Some(150));
}

#[test]
fn domain_uses_max_of_containers_and_half_sponsored() {
    let markers = MarkerCounts {
        sponsored: 20,
        containers: 6,
        ..MarkerCounts::default()
    };
    let est = estimate(&report(markers), ConfidenceTier::Domain, 30, &cfg());
    assert_eq!(est.active_ads, Some(10));

    let markers = MarkerCounts {
        sponsored: 4,
        containers: 6,
        ..MarkerCounts::default()
    };
    let est = estimate(&report(markers), ConfidenceTier::Domain, 30, &cfg());
    assert_eq!(est.active_ads, Some(6));
}

#[test]
fn domain_is_capped_at_75() {
    let markers = MarkerCounts {
        containers: 500,
        ..MarkerCounts::default()
    };
    let est = estimate(&report(markers), ConfidenceTier::Domain, 30, &cfg());
    assert_eq!(est.active_ads, Some(75));
}

#[test]
fn name_uses_thirty_percent_capped_at_25() {
    let est = estimate(&report(sponsored(20)), ConfidenceTier::Name, 30, &cfg());
    assert_eq!(est.active_ads, Some(6));

    let est = estimate(&report(sponsored(200)), ConfidenceTier::Name, 30, &cfg());
    assert_eq!(est.active_ads, Some(25));
}

#[test]
fn none_uses_twenty_percent_of_containers_capped_at_10() {
    let markers = MarkerCounts {
        containers: 25,
        sponsored: 100,
        ..MarkerCounts::default()
    };
    let est = estimate(&report(markers), ConfidenceTier::None, 30, &cfg());
    assert_eq!(est.active_ads, Some(5));

    let markers = MarkerCounts {
        containers: 400,
        ..MarkerCounts::default()
    };
    let est = estimate(&report(markers), ConfidenceTier::None, 30, &cfg());
    assert_eq!(est.active_ads, Some(10));
}

// ---------------------------------------------------------------------------
// Low-count correction
// ---------------------------------------------------------------------------

#[test]
fn low_handle_count_is_corrected_from_sponsored() {
    let markers = MarkerCounts {
        sponsored: 5,
        handle_colocated: 1,
        ..MarkerCounts::default()
    };
    let est = estimate(&report(markers), ConfidenceTier::Handle, 30, &cfg());
    assert_eq!(est.active_ads, Some(5));
}

#[test]
fn low_domain_count_uses_ad_labels_when_larger() {
    let markers = MarkerCounts {
        sponsored: 1,
        ad_label: 4,
        containers: 1,
        handle_colocated: 0,
    };
    let est = estimate(&report(markers), ConfidenceTier::Domain, 30, &cfg());
    assert_eq!(est.active_ads, Some(4));
}

#[test]
fn low_count_correction_is_capped() {
    let cfg = EstimatorConfig {
        low_count_threshold: 50,
        ..EstimatorConfig::default()
    };
    let est = estimate(&report(sponsored(3)), ConfidenceTier::Handle, 30, &cfg);
    // 70% of 3 is 2, corrected to the sponsored count itself.
    assert_eq!(est.active_ads, Some(3));

    let est = estimate(&report(sponsored(40)), ConfidenceTier::Handle, 30, &cfg);
    // 28 is under the raised threshold, but the correction never exceeds 20.
    assert_eq!(est.active_ads, Some(28));
}

#[test]
fn name_tier_is_not_corrected() {
    let est = estimate(&report(sponsored(2)), ConfidenceTier::Name, 30, &cfg());
    assert_eq!(est.active_ads, None);
    assert_eq!(est.miss, Some(MissReason::NoActiveAds));
}

#[test]
fn correction_needs_ads_on_the_page() {
    let est = estimate(&report(MarkerCounts::default()), ConfidenceTier::Handle, 30, &cfg());
    assert_eq!(est.active_ads, None);
    assert_eq!(est.miss, Some(MissReason::NoActiveAds));
}

// ---------------------------------------------------------------------------
// Misses
// ---------------------------------------------------------------------------

#[test]
fn no_results_short_circuits_regardless_of_markers() {
    let mut r = report(MarkerCounts {
        sponsored: 50,
        containers: 20,
        ad_label: 10,
        handle_colocated: 5,
    });
    r.no_results_detected = true;

    for days in [1, 7, 30, 90] {
        let est = estimate(&r, ConfidenceTier::Handle, days, &cfg());
        assert_eq!(est.active_ads, None);
        assert_eq!(est.new_ads, None);
        assert_eq!(est.miss, Some(MissReason::NoResults));
        assert!(!est.found());
    }
}

#[test]
fn zero_count_distinguishes_found_from_not_found() {
    let found_no_ads = estimate(&report(MarkerCounts::default()), ConfidenceTier::Name, 30, &cfg());
    let not_found = estimate(&report(MarkerCounts::default()), ConfidenceTier::None, 30, &cfg());

    assert_eq!(found_no_ads.miss, Some(MissReason::NoActiveAds));
    assert_eq!(not_found.miss, Some(MissReason::NotFound));
    assert_ne!(
        found_no_ads.miss.map(MissReason::message),
        not_found.miss.map(MissReason::message)
    );
}

#[test]
fn no_results_message_mentions_no_ads_found() {
    assert!(MissReason::NoResults.message().starts_with("no ads found"));
}

// ---------------------------------------------------------------------------
// New-ad ratio
// ---------------------------------------------------------------------------

#[test]
fn ratio_boundaries_are_inclusive() {
    let cfg = cfg();
    let new_ads = |days| AdEstimate::from_count(20, ConfidenceTier::Handle, days, &cfg).new_ads;

    assert_eq!(new_ads(7), Some(3)); // ceil(20 * 0.15)
    assert_eq!(new_ads(8), Some(5)); // ceil(20 * 0.25)
    assert_eq!(new_ads(30), Some(5));
    assert_eq!(new_ads(31), Some(8)); // ceil(20 * 0.40)
    assert_eq!(new_ads(90), Some(8));
}

#[test]
fn new_ads_never_exceed_active() {
    let cfg = cfg();
    for active in 1..=150 {
        for days in [1, 7, 8, 30, 31, 365] {
            let est = AdEstimate::from_count(active, ConfidenceTier::Handle, days, &cfg);
            let new_ads = est.new_ads.unwrap();
            assert!(new_ads <= active, "active {active} days {days}");
            assert!(new_ads >= 1);
        }
    }
}

#[test]
fn from_count_clamps_to_tier_cap() {
    let est = AdEstimate::from_count(500, ConfidenceTier::Name, 7, &cfg());
    assert_eq!(est.active_ads, Some(25));
    assert_eq!(est.new_ads, Some(4));
}

// ---------------------------------------------------------------------------
// Conversion to CompanyResult
// ---------------------------------------------------------------------------

#[test]
fn found_result_carries_counts_and_tier() {
    let input = CompanyInput::new("Acme Corp", "https://acme.com", None);
    let result = AdEstimate::from_count(7, ConfidenceTier::Handle, 7, &cfg()).into_result(&input);

    assert!(result.found);
    assert_eq!(result.active_ads, Some(7));
    assert_eq!(result.new_ads, Some(2));
    assert_eq!(result.verification, Some(ConfidenceTier::Handle));
    assert_eq!(result.error, None);
}

#[test]
fn missed_result_carries_message() {
    let input = CompanyInput::new("Acme Corp", "https://acme.com", None);
    let result = AdEstimate::from_count(0, ConfidenceTier::Domain, 7, &cfg()).into_result(&input);

    assert!(!result.found);
    assert_eq!(result.active_ads, None);
    assert_eq!(result.new_ads, None);
    assert_eq!(
        result.error.as_deref(),
        Some(MissReason::NoActiveAds.message())
    );
}
