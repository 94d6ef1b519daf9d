use serde::{Deserialize, Serialize};

/// Which verification signal backed an ad-count estimate.
///
/// Variants are declared weakest first so the derived `Ord` matches trust:
/// `Handle > Domain > Name > None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceTier {
    None,
    Name,
    Domain,
    Handle,
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceTier::Handle => write!(f, "HANDLE"),
            ConfidenceTier::Domain => write!(f, "DOMAIN"),
            ConfidenceTier::Name => write!(f, "NAME"),
            ConfidenceTier::None => write!(f, "NONE"),
        }
    }
}
