//! Comparison identifiers derived from a company's social and website URLs.
//!
//! Nothing here fails: a URL that does not look like a known profile or
//! website simply yields no handles or no domain.

use serde::Serialize;

use adscan_core::CompanyInput;

/// Social platform a profile URL belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
    TikTok,
}

/// Host patterns in match order: primary domain, short domain, mobile.
const HOST_PATTERNS: &[(&str, Platform)] = &[
    ("facebook.com", Platform::Facebook),
    ("fb.com", Platform::Facebook),
    ("m.facebook.com", Platform::Facebook),
    ("instagram.com", Platform::Instagram),
    ("tiktok.com", Platform::TikTok),
];

/// Path segments that are site sections rather than profile slugs.
const RESERVED_SEGMENTS: &[&str] = &[
    "pages",
    "profile.php",
    "people",
    "groups",
    "events",
    "watch",
    "marketplace",
    "ads",
    "explore",
    "p",
    "reel",
    "reels",
    "stories",
    "tag",
    "discover",
    "video",
];

impl Platform {
    /// Hosts whose `<host>/<handle>` links count as a handle mention.
    #[must_use]
    pub fn hosts(self) -> &'static [&'static str] {
        match self {
            Platform::Facebook => &["facebook.com", "fb.com"],
            Platform::Instagram => &["instagram.com"],
            Platform::TikTok => &["tiktok.com"],
        }
    }

    /// Suffixes brands tack onto their handle on this platform only.
    fn suffixes(self) -> &'static [&'static str] {
        match self {
            Platform::Facebook => &["page", "fb"],
            Platform::Instagram => &["insta", "ig"],
            Platform::TikTok => &["tiktok", "tt"],
        }
    }
}

/// Ordered, de-duplicated handle variants, most literal first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HandleSet(Vec<String>);

impl HandleSet {
    /// Build the variant list for one raw handle.
    ///
    /// Variants: the raw handle, lowercase, alphanumeric-only, and the
    /// alphanumeric form with one platform or business suffix removed.
    /// Anything of two characters or fewer is dropped.
    #[must_use]
    pub fn from_handle(raw: &str, platform: Platform, business_suffixes: &[String]) -> Self {
        let lower = raw.to_lowercase();
        let alnum: String = lower.chars().filter(|c| c.is_alphanumeric()).collect();
        let stem = strip_suffix(&alnum, platform, business_suffixes);

        let mut variants: Vec<String> = Vec::with_capacity(4);
        for candidate in [raw.to_string(), lower, alnum, stem] {
            if candidate.chars().count() > 2 && !variants.contains(&candidate) {
                variants.push(candidate);
            }
        }
        Self(variants)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, handle: &str) -> bool {
        self.0.iter().any(|h| h == handle)
    }
}

fn strip_suffix(alnum: &str, platform: Platform, business_suffixes: &[String]) -> String {
    let platform_suffixes = platform.suffixes().iter().copied();
    let business = business_suffixes.iter().map(String::as_str);

    for suffix in platform_suffixes.chain(business) {
        let suffix = suffix.to_lowercase();
        if suffix.is_empty() {
            continue;
        }
        if let Some(stem) = alnum.strip_suffix(suffix.as_str()) {
            if !stem.is_empty() {
                return stem.to_string();
            }
        }
    }
    alnum.to_string()
}

/// Everything the scanner compares a document against, besides the name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Identifiers {
    pub platform: Option<Platform>,
    pub handles: HandleSet,
    pub domain: Option<String>,
}

#[must_use]
pub fn extract_identifiers(input: &CompanyInput, business_suffixes: &[String]) -> Identifiers {
    let profile = input.social_url.as_deref().and_then(extract_handle);

    let (platform, handles) = match profile {
        Some((platform, raw)) => (
            Some(platform),
            HandleSet::from_handle(&raw, platform, business_suffixes),
        ),
        None => (None, HandleSet::default()),
    };

    Identifiers {
        platform,
        handles,
        domain: extract_domain(&input.website_url),
    }
}

/// Pull the first path segment after a known platform host.
///
/// Accepts URLs with or without a scheme and a leading `www.`. Query strings,
/// fragments, and trailing slashes are ignored; TikTok's `@` prefix is
/// dropped. Site sections such as `pages` or `profile.php` are not handles.
#[must_use]
pub fn extract_handle(social_url: &str) -> Option<(Platform, String)> {
    let rest = strip_scheme_and_www(social_url.trim());

    let (platform, after_host) = HOST_PATTERNS.iter().find_map(|(host, platform)| {
        let n = host.len();
        let bytes = rest.as_bytes();
        let matches = bytes.len() > n
            && bytes[..n].eq_ignore_ascii_case(host.as_bytes())
            && bytes[n] == b'/';
        matches.then(|| (*platform, &rest[n + 1..]))
    })?;

    let path = after_host
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    let segment = path
        .split('/')
        .map(str::trim)
        .find(|s| !s.is_empty())?
        .trim_start_matches('@');

    let reserved = RESERVED_SEGMENTS
        .iter()
        .any(|r| r.eq_ignore_ascii_case(segment));
    (!segment.is_empty() && !reserved).then(|| (platform, segment.to_string()))
}

/// Bare, lowercase host of a website URL: no scheme, no `www.`, no path.
#[must_use]
pub fn extract_domain(website_url: &str) -> Option<String> {
    let lower = website_url.trim().to_lowercase();
    let rest = strip_scheme_and_www(&lower);
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('.');

    (host.contains('.') && !host.starts_with('.')).then(|| host.to_string())
}

fn strip_scheme_and_www(url: &str) -> &str {
    let without_scheme = url.find("://").map_or(url, |i| &url[i + 3..]);
    let bytes = without_scheme.as_bytes();
    if bytes.len() >= 4 && bytes[..4].eq_ignore_ascii_case(b"www.") {
        &without_scheme[4..]
    } else {
        without_scheme
    }
}
