//! Puzzle session: the one owner of mutable puzzle state.
//!
//! A session moves `Loading → Ready → Solved` or `Loading → Error`. Loading a
//! document strips its frontmatter, parses it, builds the frequency index, and
//! runs the solve detector once. Every accepted guess grows the revealed set
//! and re-runs the detector. All display data comes from [`Session::derive_view`],
//! recomputed on demand from the current state.

use std::sync::Arc;

use redactle_config::AppConfig;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::document::{Document, DocumentError, ProcessedDocument};
use crate::frequency::FrequencyIndex;
use crate::pipeline::Snapshot;
use crate::redact::{RedactLimits, Redactor, RevealedSet};
use crate::render::{RenderOptions, Renderer};
use crate::title::{Title, TitleError};
use crate::tokenizer;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No document selected yet.
    Loading,
    Ready,
    Solved,
    /// The selected document cannot be played.
    Error,
}

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("document index {index} is out of range for a corpus of {len}")]
    InvalidCorpusIndex { index: usize, len: usize },

    #[error(transparent)]
    Title(#[from] TitleError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("no document loaded")]
    NotLoaded,
}

/// Result of submitting a guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuessOutcome {
    /// A new word joined the revealed set.
    Revealed { word: String, count: usize },
    /// The word was already revealed (or free). Nothing changed.
    AlreadyRevealed { word: String },
    /// Empty, or not a single word. Only the buffer was cleared.
    Rejected,
    /// Input is closed in the current phase.
    Disabled,
}

/// A guessed word with its frequency in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevealedWord {
    pub word: String,
    pub count: usize,
}

/// Plain display data for a rendering host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub phase: Phase,
    /// Redacted HTML. Absent while loading and in the error state.
    pub markup: Option<String>,
    pub error: Option<String>,
    /// Guessed words, most recently revealed first.
    pub guesses: Vec<RevealedWord>,
    pub guess: String,
    pub input_enabled: bool,
    /// `None` until a document is loaded, and in the error state.
    pub solved: Option<bool>,
}

/// Per-document artifacts, discarded on re-selection.
#[derive(Debug)]
struct Loaded {
    index: usize,
    document: Arc<ProcessedDocument>,
    frequency: FrequencyIndex,
    title: Option<Title>,
}

/// A single-player puzzle over one corpus document.
#[derive(Debug)]
pub struct Session {
    config: AppConfig,
    limits: RedactLimits,
    options: RenderOptions,
    phase: Phase,
    loaded: Option<Loaded>,
    revealed: RevealedSet,
    guess: String,
    error: Option<String>,
    just_solved: bool,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        let limits = RedactLimits::from(&config.puzzle);
        let options = RenderOptions::from(&config.render);
        let revealed = RevealedSet::for_puzzle(&config.puzzle.free_words);
        Self {
            config,
            limits,
            options,
            phase: Phase::Loading,
            loaded: None,
            revealed,
            guess: String::new(),
            error: None,
            just_solved: false,
        }
    }

    /// Select `corpus[index]` and start a fresh puzzle on it.
    ///
    /// An out-of-range index fails without touching the session. A document
    /// without a usable title moves the session to [`Phase::Error`] and the
    /// title error is returned.
    pub fn load(&mut self, corpus: &[Document], index: usize) -> Result<Phase, SessionError> {
        let document = corpus.get(index).ok_or(SessionError::InvalidCorpusIndex {
            index,
            len: corpus.len(),
        })?;
        let processed = document.process()?;
        let frequency = FrequencyIndex::build(processed.body());
        let title = Title::find(processed.body());

        self.revealed = RevealedSet::for_puzzle(&self.config.puzzle.free_words);
        self.guess.clear();
        self.error = None;
        self.just_solved = false;

        let (title, result) = match title {
            Ok(title) => (Some(title), Ok(())),
            Err(e) => (None, Err(e)),
        };
        self.loaded = Some(Loaded {
            index,
            document: Arc::new(processed),
            frequency,
            title,
        });

        if let Err(e) = result {
            warn!(index, error = %e, "document cannot be played");
            self.phase = Phase::Error;
            self.error = Some(e.to_string());
            return Err(e.into());
        }

        self.phase = Phase::Ready;
        info!(
            index,
            distinct_words = self.frequency().map_or(0, FrequencyIndex::distinct),
            "puzzle loaded"
        );
        self.evaluate();
        Ok(self.phase)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Index of the selected document.
    pub fn index(&self) -> Option<usize> {
        self.loaded.as_ref().map(|l| l.index)
    }

    pub fn document(&self) -> Option<&Arc<ProcessedDocument>> {
        self.loaded.as_ref().map(|l| &l.document)
    }

    pub fn frequency(&self) -> Option<&FrequencyIndex> {
        self.loaded.as_ref().map(|l| &l.frequency)
    }

    pub fn title(&self) -> Option<&Title> {
        self.loaded.as_ref().and_then(|l| l.title.as_ref())
    }

    pub fn revealed(&self) -> &RevealedSet {
        &self.revealed
    }

    /// The terminal error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `None` until a playable document is loaded.
    pub fn solved(&self) -> Option<bool> {
        match self.phase {
            Phase::Ready => Some(false),
            Phase::Solved => Some(true),
            Phase::Loading | Phase::Error => None,
        }
    }

    /// Whether guesses are currently accepted.
    pub fn input_enabled(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// The pending guess buffer.
    pub fn guess(&self) -> &str {
        &self.guess
    }

    /// Replace the pending guess buffer. Ignored once solved.
    pub fn set_guess(&mut self, text: impl Into<String>) {
        if self.phase != Phase::Solved {
            self.guess = text.into();
        }
    }

    /// Submit the pending guess buffer.
    pub fn submit_guess(&mut self) -> GuessOutcome {
        if !self.input_enabled() {
            debug!(phase = ?self.phase, "guess ignored");
            return GuessOutcome::Disabled;
        }

        let guess = std::mem::take(&mut self.guess);
        let word = guess.trim().to_lowercase();
        if word.is_empty() || !tokenizer::is_single_token(&word) {
            debug!(guess = %guess, "guess rejected");
            return GuessOutcome::Rejected;
        }

        if !self.revealed.insert(&word) {
            return GuessOutcome::AlreadyRevealed { word };
        }

        let count = self.frequency().map_or(0, |f| f.count(&word));
        info!(word = %word, count, "word revealed");
        self.evaluate();
        GuessOutcome::Revealed { word, count }
    }

    /// Set the buffer to `word` and submit it.
    pub fn submit(&mut self, word: &str) -> GuessOutcome {
        if !self.input_enabled() {
            return GuessOutcome::Disabled;
        }
        self.set_guess(word);
        self.submit_guess()
    }

    /// Returns `true` exactly once after the session becomes solved.
    pub fn take_solve_event(&mut self) -> bool {
        std::mem::take(&mut self.just_solved)
    }

    /// Guessed words with their document frequency, most recent first.
    pub fn revealed_words(&self) -> Vec<RevealedWord> {
        let Some(frequency) = self.frequency() else {
            return Vec::new();
        };
        self.revealed
            .guesses()
            .map(|word| RevealedWord {
                word: word.to_string(),
                count: frequency.count(word),
            })
            .collect()
    }

    /// The solved flag handed to the redactor.
    fn reveal_all(&self) -> bool {
        self.phase == Phase::Solved && self.config.puzzle.reveal_all_on_solve
    }

    /// Capture what a render needs, for use off the session's control flow.
    pub fn snapshot(&self) -> Result<Snapshot, SessionError> {
        if self.phase == Phase::Error {
            return Err(SessionError::NotLoaded);
        }
        let document = self.document().ok_or(SessionError::NotLoaded)?;
        Ok(Snapshot::new(
            Arc::clone(document),
            self.revealed.clone(),
            self.reveal_all(),
            self.limits.clone(),
            self.options.clone(),
        ))
    }

    /// Redacted HTML for the current state.
    pub fn render_html(&self) -> Result<String, SessionError> {
        if self.phase == Phase::Error {
            return Err(SessionError::NotLoaded);
        }
        let document = self.document().ok_or(SessionError::NotLoaded)?;
        let redactor = Redactor::new(&self.revealed, self.reveal_all(), &self.limits);
        Ok(Renderer::new(redactor, &self.options).html(document))
    }

    /// Recompute everything a host displays.
    pub fn derive_view(&self) -> View {
        if self.phase == Phase::Error {
            return View {
                phase: self.phase,
                markup: None,
                error: self.error.clone(),
                guesses: Vec::new(),
                guess: self.guess.clone(),
                input_enabled: false,
                solved: None,
            };
        }
        View {
            phase: self.phase,
            markup: self.render_html().ok(),
            error: None,
            guesses: self.revealed_words(),
            guess: self.guess.clone(),
            input_enabled: self.input_enabled(),
            solved: self.solved(),
        }
    }

    /// Re-run the solve detector.
    fn evaluate(&mut self) {
        if self.phase != Phase::Ready {
            return;
        }
        let solved = self.title().is_some_and(|t| t.is_solved(&self.revealed));
        if solved {
            self.phase = Phase::Solved;
            self.just_solved = true;
            self.guess.clear();
            info!(
                guesses = self.revealed.guesses().count(),
                "puzzle solved"
            );
        }
    }
}
