use std::collections::HashMap;

/// Occurrence counts for tokens or genre labels. Rebuilt from scratch every
/// run; never persisted.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, term: impl Into<String>) {
        *self.counts.entry(term.into()).or_insert(0) += 1;
    }

    pub fn extend<I>(&mut self, terms: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        for term in terms {
            self.add(term);
        }
    }

    pub fn get(&self, term: &str) -> u64 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// All entries, highest count first. Equal counts order alphabetically
    /// so output is stable.
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self
            .counts
            .iter()
            .map(|(term, count)| (term.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// The `n` most frequent entries.
    pub fn most_common(&self, n: usize) -> Vec<(&str, u64)> {
        let mut entries = self.ranked();
        entries.truncate(n);
        entries
    }
}

impl<S: Into<String>> FromIterator<S> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}
