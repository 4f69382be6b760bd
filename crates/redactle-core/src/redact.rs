//! The redaction function and the revealed-word set it consults.
//!
//! [`Redactor`] walks a text chunk token by token. Separators are copied
//! through untouched; a token is copied when the puzzle is solved or its
//! lowercase form has been revealed, otherwise it becomes a
//! [`Segment::Masked`] that remembers how many characters it hides.
//!
//! A single chunk is scanned for at most [`RedactLimits::max_iterations`]
//! tokens. What happens to the text past that point is decided by the
//! [`OverflowPolicy`].

use std::collections::HashSet;

use redactle_config::{OverflowPolicy, PuzzleConfig};
use tracing::warn;

use crate::tokenizer::{self, Token};

/// Default cap on tokens scanned per chunk.
pub const DEFAULT_MAX_REDACTION_ITERATIONS: usize = 1000;

/// Default glyph written once per masked character.
pub const DEFAULT_MASK_GLYPH: char = '█';

/// Words every puzzle gives away before the first guess.
pub const ARTICLES: [&str; 3] = ["a", "an", "the"];

/// Set of lowercase words the player may see.
///
/// Free words (the articles) are members from the start but are not part of
/// the guess history. The set only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealedSet {
    members: HashSet<String>,
    free: HashSet<String>,
    /// Guessed words in reveal order, oldest first.
    history: Vec<String>,
}

impl RevealedSet {
    /// An empty set with no free words.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set seeded with free words that never show up in the guess history.
    pub fn with_free_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let free: HashSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        Self {
            members: free.clone(),
            free,
            history: Vec::new(),
        }
    }

    /// The starting set of a puzzle: [`ARTICLES`] plus any `extra` free words.
    pub fn for_puzzle<S: AsRef<str>>(extra: &[S]) -> Self {
        Self::with_free_words(
            ARTICLES
                .iter()
                .copied()
                .chain(extra.iter().map(AsRef::as_ref)),
        )
    }

    /// Reveal every word in `words` as if each had been guessed.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for word in words {
            set.insert(word.as_ref());
        }
        set
    }

    /// Reveal `word`. Returns `false` when it was already a member.
    pub fn insert(&mut self, word: &str) -> bool {
        let word = word.to_lowercase();
        if self.members.contains(&word) {
            return false;
        }
        self.members.insert(word.clone());
        self.history.push(word);
        true
    }

    /// Membership test. `word` is expected in lowercase.
    pub fn contains(&self, word: &str) -> bool {
        self.members.contains(word)
    }

    /// Whether `word` was given away for free.
    pub fn is_free(&self, word: &str) -> bool {
        self.free.contains(word)
    }

    /// Guessed words, most recently revealed first. Free words are excluded.
    pub fn guesses(&self) -> impl Iterator<Item = &str> {
        self.history.iter().rev().map(String::as_str)
    }

    /// Number of member words, free words included.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Safety limits applied to every chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactLimits {
    /// Maximum tokens scanned in one chunk.
    pub max_iterations: usize,
    /// Treatment of the unscanned remainder when the cap is reached.
    pub overflow: OverflowPolicy,
    /// Glyph used for plain-text masks.
    pub mask_glyph: char,
}

impl Default for RedactLimits {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_REDACTION_ITERATIONS,
            overflow: OverflowPolicy::Reveal,
            mask_glyph: DEFAULT_MASK_GLYPH,
        }
    }
}

impl From<&PuzzleConfig> for RedactLimits {
    fn from(config: &PuzzleConfig) -> Self {
        Self {
            max_iterations: config.max_redaction_iterations,
            overflow: config.overflow,
            mask_glyph: config.mask_glyph,
        }
    }
}

/// A piece of redacted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text shown as-is.
    Literal(&'a str),
    /// A hidden run of `len` characters.
    Masked { len: usize },
}

/// Redaction parameterized by the current reveal state.
#[derive(Debug, Clone, Copy)]
pub struct Redactor<'a> {
    revealed: &'a RevealedSet,
    solved: bool,
    limits: &'a RedactLimits,
}

impl<'a> Redactor<'a> {
    pub fn new(revealed: &'a RevealedSet, solved: bool, limits: &'a RedactLimits) -> Self {
        Self {
            revealed,
            solved,
            limits,
        }
    }

    pub fn limits(&self) -> &RedactLimits {
        self.limits
    }

    fn is_visible(&self, token: &Token<'_>) -> bool {
        self.solved || self.revealed.contains(&token.canonical())
    }

    /// Split `text` into literal and masked segments. Adjacent visible text
    /// is merged into one literal.
    pub fn segments<'t>(&self, text: &'t str) -> Vec<Segment<'t>> {
        let mut out = Vec::new();
        let mut cursor = 0;
        let mut literal_from = 0;
        let mut scanned = 0;

        while cursor < text.len() {
            if scanned == self.limits.max_iterations {
                self.overflow(text, cursor, literal_from, &mut out);
                return out;
            }
            let Some(token) = tokenizer::next_token(text, cursor) else {
                break;
            };
            scanned += 1;

            if !self.is_visible(&token) {
                if token.start > literal_from {
                    out.push(Segment::Literal(&text[literal_from..token.start]));
                }
                out.push(Segment::Masked {
                    len: token.char_len(),
                });
                literal_from = token.end;
            }
            cursor = token.end;
        }

        if literal_from < text.len() {
            out.push(Segment::Literal(&text[literal_from..]));
        }
        out
    }

    fn overflow<'t>(
        &self,
        text: &'t str,
        cursor: usize,
        literal_from: usize,
        out: &mut Vec<Segment<'t>>,
    ) {
        let rest = &text[cursor..];
        let leaking = tokenizer::next_token(text, cursor).is_some();
        if leaking {
            warn!(
                cap = self.limits.max_iterations,
                remaining_bytes = rest.len(),
                policy = ?self.limits.overflow,
                "Redaction scan cap reached with words left in chunk"
            );
        }

        if !leaking || self.limits.overflow == OverflowPolicy::Reveal {
            out.push(Segment::Literal(&text[literal_from..]));
            return;
        }
        if cursor > literal_from {
            out.push(Segment::Literal(&text[literal_from..cursor]));
        }
        mask_remainder(rest, out);
    }

    /// Redact `text` into a plain string, one mask glyph per hidden character.
    pub fn redact(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for segment in self.segments(text) {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Masked { len } => {
                    out.extend(std::iter::repeat_n(self.limits.mask_glyph, len));
                }
            }
        }
        out
    }
}

/// Mask every non-whitespace run of `rest`, keeping whitespace for layout.
fn mask_remainder<'t>(rest: &'t str, out: &mut Vec<Segment<'t>>) {
    let mut run_start = 0;
    let mut run_len = 0;
    for (i, ch) in rest.char_indices() {
        if ch.is_whitespace() {
            if run_len > 0 {
                out.push(Segment::Masked { len: run_len });
                run_len = 0;
                run_start = i;
            }
        } else {
            if run_len == 0 && i > run_start {
                out.push(Segment::Literal(&rest[run_start..i]));
            }
            run_len += 1;
        }
    }
    if run_len > 0 {
        out.push(Segment::Masked { len: run_len });
    } else if run_start < rest.len() {
        out.push(Segment::Literal(&rest[run_start..]));
    }
}

/// Redact `text` against `revealed`. With `solved` set nothing is masked.
pub fn redact(text: &str, revealed: &RevealedSet, solved: bool, limits: &RedactLimits) -> String {
    Redactor::new(revealed, solved, limits).redact(text)
}
