//! Solve detection from the document's own title.
//!
//! The title is the first line of the processed document written as a level-1
//! ATX heading (`# ...`). The puzzle is solved once every word of that line
//! has been revealed.
//!
//! Matching is line-based and ignores markdown structure, so a `# ` line inside
//! a fenced code block is a title too.

use std::sync::LazyLock;

use regex::Regex;

use crate::redact::RevealedSet;
use crate::tokenizer;

static TITLE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# .*$").expect("static title pattern"));

/// Why a document cannot be played.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TitleError {
    #[error("Could not find page title")]
    Missing,

    #[error("Could not find any words in page title")]
    Empty,
}

/// The title line of a document and its canonical words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    line: String,
    words: Vec<String>,
}

impl Title {
    /// Locate the title in a processed document body.
    pub fn find(body: &str) -> Result<Self, TitleError> {
        let line = TITLE_LINE
            .find(body)
            .ok_or(TitleError::Missing)?
            .as_str()
            .trim_end_matches('\r');

        let words: Vec<String> = tokenizer::tokens(line).map(|t| t.canonical()).collect();
        if words.is_empty() {
            return Err(TitleError::Empty);
        }

        Ok(Self {
            line: line.to_string(),
            words,
        })
    }

    /// The heading line as written, including the leading `# `.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Lowercase title words in order of appearance.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Title words not yet revealed.
    pub fn missing<'a>(&'a self, revealed: &'a RevealedSet) -> impl Iterator<Item = &'a str> {
        self.words
            .iter()
            .filter(|w| !revealed.contains(w))
            .map(String::as_str)
    }

    /// Whether every title word has been revealed.
    pub fn is_solved(&self, revealed: &RevealedSet) -> bool {
        self.missing(revealed).next().is_none()
    }
}
