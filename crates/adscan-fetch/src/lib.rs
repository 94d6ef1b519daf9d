//! Document fetching for ad-library search pages.
//!
//! Every scraping backend implements [`DocumentFetcher`]; [`FetchProvider`]
//! picks one from configuration. Failures are classified into
//! [`FetchError`] variants so callers can report them per company.

pub mod ad_library;
pub mod browserless;
pub mod direct;
pub mod error;
pub mod fetcher;
pub mod rate_limit;
pub mod scrapingbee;

pub use ad_library::ad_library_search_url;
pub use browserless::BrowserlessClient;
pub use direct::DirectClient;
pub use error::FetchError;
pub use fetcher::{DocumentFetcher, FetchOptions, FetchProvider};
pub use rate_limit::{MinInterval, Pacer, Unpaced};
pub use scrapingbee::ScrapingBeeClient;
