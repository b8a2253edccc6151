//! CSS selector table for the IMDb page families.
//!
//! IMDb's markup drifts, and the selector lists are the part of the scraper
//! that ages. They live here as operator-editable configuration: a JSON file
//! can override any field, everything else falls back to the built-in lists.

use std::fs;
use std::path::Path;

use scraper::Selector;
use serde::Deserialize;

use crate::error::{Result, ScrapeError};

/// Ordered selector lists, tried first to last. The first selector that
/// yields any matches wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectorConfig {
    /// Listing entries on a genre search results page.
    pub genre_listing: Vec<String>,
    /// Listing entries on the moviemeter chart.
    pub overall_listing: Vec<String>,
    /// Next-page affordance on a paginated genre search.
    pub next_page: String,
    /// Plot summary on a movie detail page.
    pub plot: Vec<String>,
    /// Genre labels on a movie detail page.
    pub genres: Vec<String>,
    /// Listing entries on the popular chart (fallback endpoint).
    pub popular_fallback: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            genre_listing: vec![
                ".lister-item-content h3 a".to_string(),
                ".titleColumn a".to_string(),
            ],
            overall_listing: vec![
                ".titleColumn a".to_string(),
                ".cli-children a".to_string(),
                "h3.ipc-title__text a".to_string(),
                ".lister-item-header a".to_string(),
            ],
            next_page: ".lister-page-next".to_string(),
            plot: vec![
                "[data-testid=\"plot\"] span.sc-466bb6c-0".to_string(),
                "[data-testid=\"plot-xl\"]".to_string(),
                ".summary_text".to_string(),
                "[data-testid=\"storyline-plot-summary\"]".to_string(),
                ".plot_summary .text-muted".to_string(),
            ],
            genres: vec![
                "div.ipc-chip-list a.ipc-chip".to_string(),
                "div.subtext a[href*=\"genres\"]".to_string(),
                ".genre a".to_string(),
                "[data-testid=\"genres\"] a".to_string(),
                "[data-testid=\"genres\"] span.ipc-metadata-list-item__list-content-item"
                    .to_string(),
            ],
            popular_fallback: ".titleColumn a".to_string(),
        }
    }
}

impl SelectorConfig {
    /// Load overrides from a JSON file. Missing fields keep their defaults;
    /// a selector that does not parse as CSS is rejected here rather than
    /// surfacing mid-scrape.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let singles = [&self.next_page, &self.popular_fallback];
        let lists = [&self.genre_listing, &self.overall_listing, &self.plot, &self.genres];
        for selector in lists.into_iter().flatten().chain(singles) {
            if let Err(e) = Selector::parse(selector) {
                return Err(ScrapeError::Config(format!(
                    "invalid selector `{selector}`: {e}"
                )));
            }
        }
        Ok(())
    }
}

/// Parse a selector string, carrying the offending pattern in the error.
pub(crate) fn parse(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        SelectorConfig::default()
            .validate()
            .expect("built-in selectors must parse");
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let config: SelectorConfig =
            serde_json::from_str(r#"{"next_page": "a.next"}"#).unwrap();
        assert_eq!(config.next_page, "a.next");
        assert_eq!(config.genre_listing, SelectorConfig::default().genre_listing);
    }

    #[test]
    fn invalid_css_is_rejected() {
        let config: SelectorConfig =
            serde_json::from_str(r#"{"next_page": "[[["}"#).unwrap();
        assert!(matches!(config.validate(), Err(ScrapeError::Config(_))));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed = serde_json::from_str::<SelectorConfig>(r#"{"plots": []}"#);
        assert!(parsed.is_err());
    }
}
