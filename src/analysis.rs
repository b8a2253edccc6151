//! Pipeline composites: listing -> per-movie details -> frequency tables.

use tracing::info;

use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::freq::FrequencyTable;
use crate::{ImdbScraper, MovieRef, text};

/// Word frequencies across the plot summaries of the top movies, either
/// for one genre or overall. A movie whose detail fetch fails contributes
/// nothing; the rest of the batch still counts.
pub async fn plot_word_frequencies<F: PageFetcher>(
    scraper: &ImdbScraper<F>,
    genre: Option<&str>,
    count: usize,
) -> Result<FrequencyTable> {
    let movies = match genre {
        Some(genre) => scraper.top_by_genre(genre, count).await?,
        None => scraper.top_overall(count).await?,
    };
    if movies.is_empty() {
        info!("no movies found to analyze");
        return Ok(FrequencyTable::new());
    }

    let mut table = FrequencyTable::new();
    for movie in &movies {
        let details = scraper.movie_details(movie).await;
        table.extend(text::normalize(&details.plot));
    }
    info!(movies = movies.len(), terms = table.len(), "plot keywords counted");
    Ok(table)
}

/// Genre label frequencies across a movie collection, fetched per movie.
/// Labels are counted as extracted, duplicates within one movie included.
pub async fn genre_frequencies<F: PageFetcher>(
    scraper: &ImdbScraper<F>,
    movies: &[MovieRef],
) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for movie in movies {
        let details = scraper.movie_details(movie).await;
        table.extend(details.genres);
    }
    info!(movies = movies.len(), genres = table.len(), "genres counted");
    table
}
