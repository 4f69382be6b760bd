//! Corpus providers: where puzzle documents come from.
//!
//! The engine only sees an ordered `Vec<Document>`. [`StaticCorpus`] serves
//! documents held in memory; [`DirectoryCorpus`] reads markdown files from a
//! directory tree in sorted path order, so a given index always names the
//! same file.

use std::path::{Path, PathBuf};

use rand::Rng;
use redactle_config::CorpusConfig;
use tracing::{debug, info};

use crate::BoxFuture;
use crate::document::Document;

/// Errors from loading a corpus.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no documents found in {0}")]
    Empty(String),

    #[error("corpus scan task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Supplies the ordered list of documents a session selects from.
pub trait CorpusProvider: Send + Sync {
    /// Human-readable origin, used in logs and error messages.
    fn describe(&self) -> String;

    /// Load every document. An empty corpus is an error.
    fn documents(&self) -> BoxFuture<'_, Result<Vec<Document>, CorpusError>>;
}

/// Documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCorpus {
    documents: Vec<Document>,
}

impl StaticCorpus {
    pub fn new<I, D>(documents: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Document>,
    {
        Self {
            documents: documents.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl CorpusProvider for StaticCorpus {
    fn describe(&self) -> String {
        format!("{} in-memory documents", self.documents.len())
    }

    fn documents(&self) -> BoxFuture<'_, Result<Vec<Document>, CorpusError>> {
        Box::pin(async move {
            if self.documents.is_empty() {
                return Err(CorpusError::Empty(self.describe()));
            }
            Ok(self.documents.clone())
        })
    }
}

/// A corpus file and its contents.
#[derive(Debug, Clone)]
pub struct CorpusEntry {
    pub path: PathBuf,
    pub document: Document,
}

/// Markdown files under a directory, in sorted path order.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryCorpus {
    pub fn new(root: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            extensions,
        }
    }

    pub fn from_config(config: &CorpusConfig) -> Self {
        Self::new(&config.docs_dir, config.extensions.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read every matching file along with its path.
    pub async fn scan(&self) -> Result<Vec<CorpusEntry>, CorpusError> {
        let root = self.root.clone();
        let extensions = self.extensions.clone();
        let entries = tokio::task::spawn_blocking(move || {
            let mut paths = Vec::new();
            collect_paths(&root, &extensions, &mut paths)?;
            paths.sort();
            paths
                .into_iter()
                .map(|path| {
                    let text = std::fs::read_to_string(&path).map_err(|source| CorpusError::Io {
                        path: path.clone(),
                        source,
                    })?;
                    debug!(path = %path.display(), bytes = text.len(), "read corpus file");
                    Ok(CorpusEntry {
                        path,
                        document: Document::from(text),
                    })
                })
                .collect::<Result<Vec<_>, CorpusError>>()
        })
        .await??;

        if entries.is_empty() {
            return Err(CorpusError::Empty(self.describe()));
        }
        info!(root = %self.root.display(), documents = entries.len(), "corpus loaded");
        Ok(entries)
    }
}

impl CorpusProvider for DirectoryCorpus {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn documents(&self) -> BoxFuture<'_, Result<Vec<Document>, CorpusError>> {
        Box::pin(async move {
            let entries = self.scan().await?;
            Ok(entries.into_iter().map(|e| e.document).collect())
        })
    }
}

/// Walk `dir` recursively, collecting files whose extension is listed.
/// Hidden entries are skipped.
fn collect_paths(
    dir: &Path,
    extensions: &[String],
    out: &mut Vec<PathBuf>,
) -> Result<(), CorpusError> {
    let io_err = |source| CorpusError::Io {
        path: dir.to_path_buf(),
        source,
    };
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();

        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'))
        {
            continue;
        }

        if path.is_dir() {
            collect_paths(&path, extensions, out)?;
        } else if let Some(ext) = path.extension().and_then(|e| e.to_str())
            && extensions.iter().any(|x| x.eq_ignore_ascii_case(ext))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Pick a uniformly random valid index into a corpus of `len` documents.
pub fn pick_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    (len > 0).then(|| rng.gen_range(0..len))
}
