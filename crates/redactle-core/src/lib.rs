#![deny(unsafe_code)]

//! Redactle core: the redaction engine and puzzle session.
//!
//! A document is tokenized into words, every word the player has not guessed
//! is masked with a length-preserving placeholder, and the puzzle is solved
//! once every word of the document's title is revealed. Hosts (CLI, TUI) feed
//! a [`Session`] with guesses and display what [`Session::derive_view`] or the
//! async [`pipeline`] produces.

use std::future::Future;
use std::pin::Pin;

/// Boxed `Send` future for async trait methods used through `dyn Trait`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Corpus providers and random document selection.
pub mod corpus;
/// Raw documents, frontmatter stripping, markdown parsing.
pub mod document;
/// Word occurrence counts.
pub mod frequency;
/// In-memory activity log for the TUI.
pub mod logging;
/// Last-write-wins background rendering.
pub mod pipeline;
/// The redaction function and revealed-word set.
pub mod redact;
/// Structured rendering to HTML and styled text.
pub mod render;
/// Puzzle session state machine.
pub mod session;
/// Title extraction and solve detection.
pub mod title;
/// Word tokenization.
pub mod tokenizer;

pub use corpus::{CorpusError, CorpusProvider, DirectoryCorpus, StaticCorpus, pick_index};
pub use document::{Document, ProcessedDocument};
pub use frequency::FrequencyIndex;
pub use logging::{ActivityLog, ActivityReader};
pub use pipeline::{RenderSlot, Snapshot};
pub use redact::{RedactLimits, Redactor, RevealedSet, redact};
pub use render::{RenderOptions, Renderer};
pub use session::{GuessOutcome, Phase, Session, SessionError, View};
pub use title::{Title, TitleError};
