//! Listing extraction: genre search results (paginated) and the overall
//! charts, each behind an ordered selector fallback chain.

use scraper::Html;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::{ImdbScraper, MovieRef, selectors};

/// Genre search pages carry 50 entries each.
const PAGE_SIZE: usize = 50;

/// Raw (title, href) pairs from one listing page, plus whether a next-page
/// affordance was present.
struct ListingPage {
    entries: Vec<(String, String)>,
    has_next: bool,
}

impl<F: PageFetcher> ImdbScraper<F> {
    /// Top rated movies for one genre, capped at `count`. Pagination stops
    /// when the count is reached, the next-page link disappears, every
    /// selector comes up empty, or a page fetch fails; whatever accumulated
    /// by then is returned.
    pub async fn top_by_genre(&self, genre: &str, count: usize) -> Result<Vec<MovieRef>> {
        let url = format!(
            "{}/search/title/?genres={}&sort=user_rating,desc&title_type=feature&num_votes=25000,&view=advanced",
            self.base_url, genre
        );
        info!(genre, count, "fetching top movies by genre");

        let mut movies = Vec::new();
        let mut page = 1usize;
        while movies.len() < count {
            let page_url = if page > 1 {
                format!("{}&start={}", url, (page - 1) * PAGE_SIZE + 1)
            } else {
                url.clone()
            };
            let body = match self.fetcher.get(&page_url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(page, error = %e, "listing fetch failed, stopping pagination");
                    break;
                }
            };
            let listing = parse_listing(&body, &self.selectors.genre_listing, &self.selectors.next_page)?;
            if listing.entries.is_empty() {
                warn!(page, "no listing selector matched, stopping pagination");
                break;
            }
            for (title, href) in listing.entries {
                if movies.len() >= count {
                    break;
                }
                match self.resolve(&href) {
                    Ok(url) => movies.push(MovieRef { title, url }),
                    Err(e) => debug!(href = %href, error = %e, "skipping unresolvable href"),
                }
            }
            if !listing.has_next {
                break;
            }
            page += 1;
        }

        info!(genre, found = movies.len(), "genre listing complete");
        Ok(movies)
    }

    /// Top movies overall from the moviemeter chart. If no selector in the
    /// chain matches there, retries once against the popular chart.
    pub async fn top_overall(&self, count: usize) -> Result<Vec<MovieRef>> {
        let url = format!("{}/chart/moviemeter/?ref_=nv_mv_mpm", self.base_url);
        info!(count, "fetching top movies overall");

        let mut entries = match self.fetcher.get(&url).await {
            Ok(body) => first_matching(&body, &self.selectors.overall_listing)?,
            Err(e) => {
                warn!(error = %e, "moviemeter chart fetch failed");
                Vec::new()
            }
        };

        if entries.is_empty() {
            let fallback = format!("{}/chart/popular/", self.base_url);
            warn!(url = %fallback, "no chart selector matched, trying fallback endpoint");
            match self.fetcher.get(&fallback).await {
                Ok(body) => {
                    entries =
                        first_matching(&body, std::slice::from_ref(&self.selectors.popular_fallback))?;
                }
                Err(e) => warn!(error = %e, "fallback chart fetch failed"),
            }
        }

        let mut movies = Vec::new();
        for (title, href) in entries.into_iter().take(count) {
            match self.resolve(&href) {
                Ok(url) => movies.push(MovieRef { title, url }),
                Err(e) => debug!(href = %href, error = %e, "skipping unresolvable href"),
            }
        }
        info!(found = movies.len(), "overall listing complete");
        Ok(movies)
    }

    /// Resolve a listing href against the base host and drop any query
    /// string, so the same title always maps to the same URL.
    fn resolve(&self, href: &str) -> Result<String> {
        let base = Url::parse(&self.base_url)?;
        let mut url = base.join(href)?;
        url.set_query(None);
        Ok(url.to_string())
    }
}

/// Try each selector in order; the first one yielding any entries wins.
fn first_matching(html: &str, selector_chain: &[String]) -> Result<Vec<(String, String)>> {
    let doc = Html::parse_document(html);
    for selector in selector_chain {
        let sel = selectors::parse(selector)?;
        let entries = collect_entries(&doc, &sel);
        if !entries.is_empty() {
            debug!(selector = %selector, count = entries.len(), "listing selector matched");
            return Ok(entries);
        }
    }
    Ok(Vec::new())
}

/// One paginated listing page: entries via the selector chain, plus the
/// next-page check. `Html` stays inside this function so it never crosses
/// an await in the callers.
fn parse_listing(
    html: &str,
    selector_chain: &[String],
    next_page: &str,
) -> Result<ListingPage> {
    let doc = Html::parse_document(html);
    let mut entries = Vec::new();
    for selector in selector_chain {
        let sel = selectors::parse(selector)?;
        entries = collect_entries(&doc, &sel);
        if !entries.is_empty() {
            debug!(selector = %selector, count = entries.len(), "listing selector matched");
            break;
        }
        debug!(selector = %selector, "no match, trying next selector");
    }
    let next_sel = selectors::parse(next_page)?;
    let has_next = doc.select(&next_sel).next().is_some();
    Ok(ListingPage { entries, has_next })
}

fn collect_entries(doc: &Html, sel: &scraper::Selector) -> Vec<(String, String)> {
    doc.select(sel)
        .filter_map(|el| {
            let href = el.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            let title = el.text().collect::<String>().trim().to_string();
            if title.is_empty() {
                return None;
            }
            Some((title, href.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SelectorConfig;

    const FALLBACK_ONLY: &str = r#"
        <html><body>
          <table><tr><td class="titleColumn">
            <a href="/title/tt0000001/?ref_=x">First Movie</a>
          </td></tr>
          <tr><td class="titleColumn">
            <a href="/title/tt0000002/?ref_=x">Second Movie</a>
          </td></tr></table>
        </body></html>"#;

    #[test]
    fn fallback_selector_matches_when_primary_is_absent() {
        let config = SelectorConfig::default();
        let page = parse_listing(FALLBACK_ONLY, &config.genre_listing, &config.next_page).unwrap();
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.entries[0].0, "First Movie");
        assert_eq!(page.entries[0].1, "/title/tt0000001/?ref_=x");
        assert!(!page.has_next);
    }

    #[test]
    fn next_page_affordance_is_detected() {
        let html = format!(
            r#"{}<a class="lister-page-next" href="/search/?start=51">Next</a>"#,
            FALLBACK_ONLY
        );
        let config = SelectorConfig::default();
        let page = parse_listing(&html, &config.genre_listing, &config.next_page).unwrap();
        assert!(page.has_next);
    }

    #[test]
    fn exhausted_selector_chain_yields_nothing() {
        let config = SelectorConfig::default();
        let page = parse_listing(
            "<html><body><p>maintenance page</p></body></html>",
            &config.genre_listing,
            &config.next_page,
        )
        .unwrap();
        assert!(page.entries.is_empty());
    }

    #[test]
    fn entries_without_href_or_title_are_skipped() {
        let html = r#"
            <div class="titleColumn"><a href="">Broken</a></div>
            <div class="titleColumn"><a href="/title/tt1/"> </a></div>
            <div class="titleColumn"><a href="/title/tt2/">Kept</a></div>"#;
        let entries = first_matching(html, &[".titleColumn a".to_string()]).unwrap();
        assert_eq!(entries, vec![("Kept".to_string(), "/title/tt2/".to_string())]);
    }
}
