//! Per-document word frequencies.

use std::collections::HashMap;

use crate::tokenizer;

/// Occurrence count of every lowercase token in a processed document.
///
/// Built once per document selection and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct FrequencyIndex {
    counts: HashMap<String, usize>,
    total: usize,
}

impl FrequencyIndex {
    /// Scan `text` once and count its tokens case-insensitively.
    pub fn build(text: &str) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut total = 0;
        for token in tokenizer::tokens(text) {
            *counts.entry(token.canonical()).or_default() += 1;
            total += 1;
        }
        Self { counts, total }
    }

    /// Occurrences of `word`, compared case-insensitively. Unknown words count zero.
    pub fn count(&self, word: &str) -> usize {
        self.counts
            .get(word)
            .or_else(|| self.counts.get(&word.to_lowercase()))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct words.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Number of tokens scanned.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Iterate `(word, count)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(w, c)| (w.as_str(), *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_are_case_insensitive() {
        let index = FrequencyIndex::build("Paris is nice. PARIS is big, paris!");
        assert_eq!(index.count("paris"), 3);
        assert_eq!(index.count("Paris"), 3);
        assert_eq!(index.count("is"), 2);
        assert_eq!(index.count("london"), 0);
    }

    #[test]
    fn test_totals() {
        let index = FrequencyIndex::build("a b a c");
        assert_eq!(index.total(), 4);
        assert_eq!(index.distinct(), 3);
    }

    #[test]
    fn test_markup_is_not_counted() {
        let index = FrequencyIndex::build("# Title\n\n- [x](y) `z`");
        assert_eq!(index.count("title"), 1);
        assert_eq!(index.count("x"), 1);
        assert_eq!(index.count("y"), 1);
        assert_eq!(index.count("z"), 1);
        assert_eq!(index.total(), 4);
    }

    #[test]
    fn test_empty_text() {
        let index = FrequencyIndex::build("");
        assert_eq!(index.total(), 0);
        assert_eq!(index.iter().count(), 0);
    }
}
