//! On-disk corpus fixtures.

use std::path::{Path, PathBuf};

use redactle_config::AppConfig;
use redactle_core::DirectoryCorpus;
use tempfile::TempDir;

/// A docs directory in a temp dir, removed on drop.
pub struct TestCorpus {
    dir: TempDir,
}

impl TestCorpus {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Build a corpus from `(relative path, contents)` pairs.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let corpus = Self::new();
        for (rel, body) in files {
            corpus.write(rel, body);
        }
        corpus
    }

    /// Write one file, creating parent directories as needed.
    pub fn write(&self, rel: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create corpus subdir");
        }
        std::fs::write(&path, body).expect("failed to write corpus file");
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A config whose `corpus.docs_dir` points here.
    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        config.corpus.docs_dir = self.dir.path().display().to_string();
        config
    }

    /// A provider reading this directory with the default extensions.
    pub fn provider(&self) -> DirectoryCorpus {
        DirectoryCorpus::from_config(&self.config().corpus)
    }

    /// Write `redactle.toml` next to the docs and return its path.
    pub async fn write_config(&self, toml_content: &str) -> PathBuf {
        let path = self.dir.path().join("redactle.toml");
        tokio::fs::write(&path, toml_content)
            .await
            .expect("failed to write test config");
        path
    }
}

impl Default for TestCorpus {
    fn default() -> Self {
        Self::new()
    }
}
