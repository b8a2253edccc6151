//! Plot-text normalization: lowercase, strip punctuation, tokenize, drop
//! stopwords and short tokens.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));

/// Generic narrative words that dominate plot summaries without saying
/// anything about one movie in particular.
const DOMAIN_STOPWORDS: [&str; 40] = [
    "movie", "film", "story", "character", "one", "two", "three", "may",
    "also", "would", "could", "must", "however", "new", "man", "woman",
    "find", "gets", "goes", "going", "go", "get", "way", "make", "made",
    "making", "takes", "take", "taking", "young", "old", "even", "will",
    "become", "becomes", "becoming", "day", "night", "year", "month",
];

static STOPLIST: LazyLock<HashSet<String>> = LazyLock::new(|| {
    let mut set: HashSet<String> = stop_words::get(stop_words::LANGUAGE::English)
        .into_iter()
        .collect();
    set.extend(DOMAIN_STOPWORDS.iter().map(|w| (*w).to_string()));
    set
});

/// Turn raw plot text into frequency-count tokens: lowercased, punctuation
/// stripped, split on word boundaries, keeping alphabetic tokens longer
/// than two characters that are not on the combined stoplist.
pub fn normalize(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    let lowered = raw.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, "");
    cleaned
        .unicode_words()
        .filter(|w| w.chars().all(char::is_alphabetic))
        .filter(|w| w.chars().count() > 2)
        .filter(|w| !STOPLIST.contains(*w))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_yield_nothing() {
        assert!(normalize("").is_empty());
        assert!(normalize("   ").is_empty());
        assert!(normalize("\n\t ").is_empty());
    }

    #[test]
    fn stopwords_and_short_tokens_are_dropped() {
        assert!(normalize("The THE the!!").is_empty());
        assert!(normalize("a an of to it").is_empty());
    }

    #[test]
    fn domain_words_are_dropped_regardless_of_case_and_punctuation() {
        assert!(normalize("Story.").is_empty());
        assert!(normalize("MOVIE! Film, CHARACTER?").is_empty());
        assert!(normalize("becomes Becoming BECOME").is_empty());
    }

    #[test]
    fn content_words_survive() {
        let tokens = normalize("A banker is convicted of murdering his wife.");
        assert!(tokens.contains(&"banker".to_string()));
        assert!(tokens.contains(&"convicted".to_string()));
        assert!(tokens.contains(&"murdering".to_string()));
        assert!(!tokens.contains(&"his".to_string()));
    }

    #[test]
    fn numbers_and_mixed_tokens_are_dropped() {
        let tokens = normalize("escape in 1947 from cellblock5");
        assert_eq!(tokens, vec!["escape".to_string()]);
    }
}
