//! Detail extraction for a single movie page: plot summary and genre tags.

use scraper::Html;
use tracing::{debug, warn};

use crate::fetch::PageFetcher;
use crate::{ImdbScraper, MovieDetail, MovieRef, SelectorConfig, selectors};

impl<F: PageFetcher> ImdbScraper<F> {
    /// Plot and genres for one movie. Never fails: a fetch or parse problem
    /// logs a warning and yields an empty record so one broken page cannot
    /// abort a batch.
    pub async fn movie_details(&self, movie: &MovieRef) -> MovieDetail {
        debug!(title = %movie.title, "fetching details");
        let body = match self.fetcher.get(&movie.url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(title = %movie.title, error = %e, "detail fetch failed, recording empty details");
                return MovieDetail {
                    title: movie.title.clone(),
                    plot: String::new(),
                    genres: Vec::new(),
                };
            }
        };
        let (plot, genres) = extract_details(&body, &self.selectors);
        MovieDetail {
            title: movie.title.clone(),
            plot,
            genres,
        }
    }
}

/// Run the plot and genre selector chains over one detail page. First plot
/// selector with a match wins; first genre selector with any matches
/// contributes all of its elements, not deduplicated.
fn extract_details(html: &str, config: &SelectorConfig) -> (String, Vec<String>) {
    let doc = Html::parse_document(html);

    let mut plot = String::new();
    for selector in &config.plot {
        let Ok(sel) = selectors::parse(selector) else {
            debug!(selector = %selector, "skipping unparseable plot selector");
            continue;
        };
        if let Some(el) = doc.select(&sel).next() {
            plot = el.text().collect::<String>().trim().to_string();
            debug!(selector = %selector, "plot selector matched");
            break;
        }
    }

    let mut genres = Vec::new();
    for selector in &config.genres {
        let Ok(sel) = selectors::parse(selector) else {
            debug!(selector = %selector, "skipping unparseable genre selector");
            continue;
        };
        genres = doc
            .select(&sel)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|label| !label.is_empty())
            .collect();
        if !genres.is_empty() {
            debug!(selector = %selector, count = genres.len(), "genre selector matched");
            break;
        }
    }

    (plot, genres)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_uses_first_matching_selector() {
        let html = r#"
            <div data-testid="plot-xl">  A banker is convicted of murder.  </div>
            <div class="summary_text">should not win</div>"#;
        let (plot, _) = extract_details(html, &SelectorConfig::default());
        assert_eq!(plot, "A banker is convicted of murder.");
    }

    #[test]
    fn plot_falls_back_down_the_chain() {
        let html = r#"<div class="plot_summary"><p class="text-muted">Legacy layout plot.</p></div>"#;
        let (plot, _) = extract_details(html, &SelectorConfig::default());
        assert_eq!(plot, "Legacy layout plot.");
    }

    #[test]
    fn genres_keep_duplicates_and_order() {
        let html = r#"
            <div class="subtext">
              <a href="/search/title?genres=drama">Drama</a>
              <a href="/search/title?genres=crime">Crime</a>
              <a href="/search/title?genres=drama">Drama</a>
            </div>"#;
        let (_, genres) = extract_details(html, &SelectorConfig::default());
        assert_eq!(genres, vec!["Drama", "Crime", "Drama"]);
    }

    #[test]
    fn missing_everything_yields_empty_record() {
        let (plot, genres) = extract_details("<html><body></body></html>", &SelectorConfig::default());
        assert!(plot.is_empty());
        assert!(genres.is_empty());
    }
}
