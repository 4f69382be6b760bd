//! Word tokenizer.
//!
//! A token is a maximal run of word characters (letters, digits, underscore),
//! matched leftmost-first and non-overlapping. Everything between two tokens
//! is a separator and is never inspected.
//!
//! Scanning is a pure "find the next token at or after `from`" operation over
//! an immutable string, so any chunk of text can be scanned independently and
//! a scan can be resumed from any byte offset.

use std::sync::LazyLock;

use regex::Regex;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("static word pattern"));

/// A single word token borrowed from the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The matched word, in its original casing.
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token<'_> {
    /// Lowercase form used for every membership comparison.
    pub fn canonical(&self) -> String {
        self.text.to_lowercase()
    }

    /// Length in characters, which is what a mask preserves.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Find the first token starting at or after byte offset `from`.
///
/// Returns `None` when `from` is past the end of `text` or no further word
/// characters exist.
pub fn next_token(text: &str, from: usize) -> Option<Token<'_>> {
    if from > text.len() {
        return None;
    }
    WORD.find_at(text, from).map(|m| Token {
        text: m.as_str(),
        start: m.start(),
        end: m.end(),
    })
}

/// Lazy iterator over every token of a text.
///
/// Cloning the iterator snapshots its cursor, so a scan can be replayed.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    cursor: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, cursor: 0 }
    }

    /// Byte offset where the next search will begin.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = next_token(self.text, self.cursor)?;
        self.cursor = token.end;
        Some(token)
    }
}

/// Iterate the tokens of `text`.
pub fn tokens(text: &str) -> Tokens<'_> {
    Tokens::new(text)
}

/// Whether `word` is exactly one token with nothing around it.
pub fn is_single_token(word: &str) -> bool {
    next_token(word, 0).is_some_and(|t| t.start == 0 && t.end == word.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(text: &str) -> Vec<&str> {
        tokens(text).map(|t| t.text).collect()
    }

    #[test]
    fn test_splits_on_punctuation_and_space() {
        assert_eq!(
            words("Paris is nice. It's 2024!"),
            vec!["Paris", "is", "nice", "It", "s", "2024"]
        );
    }

    #[test]
    fn test_underscore_and_digits_are_word_characters() {
        assert_eq!(words("snake_case v2 -x-"), vec!["snake_case", "v2", "x"]);
    }

    #[test]
    fn test_offsets_cover_the_match() {
        let text = "  hello, world";
        let first = next_token(text, 0).unwrap();
        assert_eq!((first.start, first.end), (2, 7));
        assert_eq!(&text[first.start..first.end], "hello");

        let second = next_token(text, first.end).unwrap();
        assert_eq!(second.text, "world");
        assert!(next_token(text, second.end).is_none());
    }

    #[test]
    fn test_no_tokens_in_separator_only_text() {
        assert!(next_token("--- ... !!!", 0).is_none());
        assert!(next_token("", 0).is_none());
    }

    #[test]
    fn test_offset_past_end_is_none() {
        assert!(next_token("abc", 10).is_none());
    }

    #[test]
    fn test_resuming_mid_word_yields_suffix() {
        let token = next_token("redaction", 3).unwrap();
        assert_eq!(token.text, "action");
    }

    #[test]
    fn test_iterator_is_restartable() {
        let mut iter = tokens("one two three");
        iter.next();
        let replay = iter.clone();
        assert_eq!(iter.map(|t| t.text).collect::<Vec<_>>(), vec!["two", "three"]);
        assert_eq!(replay.map(|t| t.text).collect::<Vec<_>>(), vec!["two", "three"]);
    }

    #[test]
    fn test_deterministic_boundaries() {
        let text = "Same *input*, same `boundaries`.";
        let first: Vec<_> = tokens(text).collect();
        let second: Vec<_> = tokens(text).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unicode_letters_stay_in_one_token() {
        let token = next_token("café au lait", 0).unwrap();
        assert_eq!(token.text, "café");
        assert_eq!(token.char_len(), 4);
        assert_eq!(token.canonical(), "café");
    }

    #[test]
    fn test_is_single_token() {
        assert!(is_single_token("paris"));
        assert!(!is_single_token("paris facts"));
        assert!(!is_single_token(" paris"));
        assert!(!is_single_token("it's"));
        assert!(!is_single_token(""));
    }
}
