//! Scraper for IMDb's top-movie listings that turns plot summaries and
//! genre tags into word-frequency tables and word-cloud images.

pub mod analysis;
pub mod detail;
pub mod error;
pub mod fetch;
pub mod freq;
pub mod listing;
pub mod selectors;
pub mod text;
pub mod wordcloud;

pub use error::{Result, ScrapeError};
pub use fetch::{HttpFetcher, PageFetcher};
pub use freq::FrequencyTable;
pub use selectors::SelectorConfig;

/// One movie entry from a listing page. Identity is the URL; listings are
/// not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRef {
    pub title: String,
    pub url: String,
}

/// Plot summary and genre tags for a single movie. Both may be empty when
/// the detail page could not be fetched or none of the selectors matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDetail {
    pub title: String,
    pub plot: String,
    pub genres: Vec<String>,
}

const IMDB_BASE: &str = "https://www.imdb.com";

/// Scraper over the IMDb listing and detail pages. Generic over the page
/// fetcher so tests can feed it canned markup.
pub struct ImdbScraper<F = HttpFetcher> {
    fetcher: F,
    selectors: SelectorConfig,
    base_url: String,
}

impl ImdbScraper<HttpFetcher> {
    pub fn new() -> Self {
        Self::with_fetcher(HttpFetcher::new())
    }
}

impl Default for ImdbScraper<HttpFetcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PageFetcher> ImdbScraper<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher,
            selectors: SelectorConfig::default(),
            base_url: IMDB_BASE.to_string(),
        }
    }

    pub fn selectors(mut self, selectors: SelectorConfig) -> Self {
        self.selectors = selectors;
        self
    }

    /// Point the scraper at a different host (mock servers in tests).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}
