//! Facebook Ad Library search URLs.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

const AD_LIBRARY_BASE: &str = "https://www.facebook.com/ads/library/";

/// Build a keyword search over active ads of every type in `country`.
#[must_use]
pub fn ad_library_search_url(query: &str, country: &str) -> String {
    let q = utf8_percent_encode(query.trim(), NON_ALPHANUMERIC);
    format!(
        "{AD_LIBRARY_BASE}?active_status=active&ad_type=all&country={country}&q={q}&search_type=keyword_unordered&media_type=all"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_spaces_and_punctuation() {
        let url = ad_library_search_url("Acme & Sons, Inc.", "US");
        assert!(url.starts_with("https://www.facebook.com/ads/library/?"));
        assert!(url.contains("country=US"));
        assert!(url.contains("q=Acme%20%26%20Sons%2C%20Inc%2E"), "{url}");
    }

    #[test]
    fn trims_query() {
        let url = ad_library_search_url("  Acme  ", "GB");
        assert!(url.contains("q=Acme&"), "{url}");
        assert!(url.contains("country=GB"));
    }
}
