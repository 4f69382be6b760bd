//! Raw and processed puzzle documents.

use std::sync::{Arc, LazyLock};

use markdown::mdast::Node;
use regex::Regex;

/// A leading `---` delimited metadata block, including its closing line break.
static FRONTMATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A---[ \t]*\r?\n(?:.*\n)*?---[ \t]*(?:\r?\n|\z)")
        .expect("static frontmatter pattern")
});

/// Errors from preparing a document for play.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to parse markdown: {0}")]
    Markdown(String),
}

/// One raw corpus entry: full markdown text, possibly with frontmatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: Arc<str>,
}

impl Document {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Strip frontmatter and parse the body.
    pub fn process(&self) -> Result<ProcessedDocument, DocumentError> {
        ProcessedDocument::new(strip_frontmatter(&self.text))
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Remove a leading metadata block. Text without one is returned unchanged.
pub fn strip_frontmatter(text: &str) -> &str {
    match FRONTMATTER.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// A document body with its frontmatter removed, parsed once into a
/// markdown syntax tree. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    body: String,
    tree: Node,
}

impl ProcessedDocument {
    /// Parse `body` (already stripped of frontmatter) with GFM extensions.
    pub fn new(body: &str) -> Result<Self, DocumentError> {
        let tree = markdown::to_mdast(body, &markdown::ParseOptions::gfm())
            .map_err(|e| DocumentError::Markdown(e.to_string()))?;
        Ok(Self {
            body: body.to_string(),
            tree,
        })
    }

    /// Markdown source of the body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Root of the parsed syntax tree.
    pub fn tree(&self) -> &Node {
        &self.tree
    }
}
