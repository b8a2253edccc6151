use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use imdb_wordcloud::{ImdbScraper, SelectorConfig, analysis, wordcloud};

/// Scrape IMDb's top movies and render plot-keyword and genre word clouds.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Genre to analyze (e.g. action, drama, comedy); prompts when omitted
    #[arg(long)]
    genre: Option<String>,

    /// How many movies to pull per listing
    #[arg(long, default_value_t = 50)]
    count: usize,

    /// Directory the word-cloud images are written to
    #[arg(long, default_value = "wordclouds")]
    out_dir: PathBuf,

    /// JSON file overriding the built-in CSS selector table
    #[arg(long)]
    selectors: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("imdb_wordcloud=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("imdb_wordcloud=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}

fn prompt_genre() -> io::Result<Option<String>> {
    print!("Enter a genre to analyze (e.g. action, drama, comedy) or press Enter for overall analysis: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let genre = line.trim().to_lowercase();
    Ok(if genre.is_empty() { None } else { Some(genre) })
}

fn print_table(heading: &str, entries: &[(&str, u64)]) {
    println!("\n{heading}");
    for (term, count) in entries {
        println!("{term}: {count}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let selectors = match &args.selectors {
        Some(path) => SelectorConfig::load(path)?,
        None => SelectorConfig::default(),
    };
    let scraper = ImdbScraper::new().selectors(selectors);

    let genre = match args.genre {
        Some(genre) if !genre.trim().is_empty() => Some(genre.trim().to_lowercase()),
        Some(_) => None,
        None => prompt_genre()?,
    };

    if let Some(genre) = &genre {
        println!("\nAnalyzing plot summaries for top movies in genre: {genre}");
        let keywords = analysis::plot_word_frequencies(&scraper, Some(genre), args.count).await?;
        if !keywords.is_empty() {
            print_table(
                &format!("Top 20 plot keywords for {genre} movies:"),
                &keywords.most_common(20),
            );
            let path = args.out_dir.join(format!("{genre}_plot_wordcloud.png"));
            let title = format!("Plot keywords for top {genre} movies");
            if wordcloud::render(&keywords, &path, Some(&title))? {
                println!("\nPlot word cloud saved to {}", path.display());
            }
        }
    }

    println!("\nAnalyzing overall top movies...");
    let keywords = analysis::plot_word_frequencies(&scraper, None, args.count).await?;
    if !keywords.is_empty() {
        print_table(
            "Top 20 plot keywords for overall top movies:",
            &keywords.most_common(20),
        );
        let path = args.out_dir.join("overall_plot_wordcloud.png");
        if wordcloud::render(&keywords, &path, Some("Plot keywords for top movies overall"))? {
            println!("\nPlot word cloud saved to {}", path.display());
        }
    }

    println!("\nAnalyzing genres of top movies...");
    let top_movies = scraper.top_overall(args.count).await?;
    if !top_movies.is_empty() {
        let genres = analysis::genre_frequencies(&scraper, &top_movies).await;
        if !genres.is_empty() {
            print_table("Most common genres in top movies:", &genres.ranked());
            let path = args.out_dir.join("top_genres_wordcloud.png");
            if wordcloud::render(&genres, &path, None)? {
                println!("\nGenre word cloud saved to {}", path.display());
            }
        }
    }

    Ok(())
}
