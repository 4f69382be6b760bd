#![deny(unsafe_code)]

//! Configuration loading and validation for Redactle.
//!
//! Loads TOML configuration files and validates them. [`AppConfig`] is the
//! central configuration structure shared by the engine and both hosts.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Puzzle mechanics and redaction limits.
    #[serde(default)]
    pub puzzle: PuzzleConfig,

    /// Markup rendering options.
    #[serde(default)]
    pub render: RenderConfig,

    /// Where the CLI/TUI hosts look for documents.
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What to do with the rest of a text chunk once the redaction scan hits
/// `puzzle.max_redaction_iterations`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Append the unscanned remainder verbatim.
    #[default]
    Reveal,
    /// Mask every non-whitespace character of the remainder.
    Mask,
}

/// Puzzle mechanics.
///
/// ## TOML Example
///
/// ```toml
/// [puzzle]
/// free_words = ["of", "and"]
/// max_redaction_iterations = 1000
/// overflow = "mask"
/// mask_glyph = "#"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Extra words revealed for free at session start. The articles "a",
    /// "an" and "the" are always free and need not be listed.
    #[serde(default)]
    pub free_words: Vec<String>,

    /// Maximum number of tokens scanned in a single text chunk.
    #[serde(default = "default_max_redaction_iterations")]
    pub max_redaction_iterations: usize,

    /// Behavior for the remainder of a chunk that exceeds the scan cap.
    #[serde(default)]
    pub overflow: OverflowPolicy,

    /// Glyph emitted once per character of a masked word.
    #[serde(default = "default_mask_glyph")]
    pub mask_glyph: char,

    /// Whether solving the puzzle unmasks the whole document.
    #[serde(default = "default_true")]
    pub reveal_all_on_solve: bool,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            free_words: Vec::new(),
            max_redaction_iterations: default_max_redaction_iterations(),
            overflow: OverflowPolicy::default(),
            mask_glyph: default_mask_glyph(),
            reveal_all_on_solve: true,
        }
    }
}

fn default_max_redaction_iterations() -> usize {
    1000
}

fn default_mask_glyph() -> char {
    '█'
}

fn default_true() -> bool {
    true
}

/// Markup rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Destination written into every rendered link instead of the real URL.
    #[serde(default = "default_link_placeholder")]
    pub link_placeholder: String,

    /// Whether heading text below level 1 goes through redaction like prose
    /// does. The title heading always stays readable.
    #[serde(default)]
    pub mask_headings: bool,

    /// CSS class attached to masked placeholders.
    #[serde(default = "default_redacted_class")]
    pub redacted_class: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            link_placeholder: default_link_placeholder(),
            mask_headings: false,
            redacted_class: default_redacted_class(),
        }
    }
}

fn default_link_placeholder() -> String {
    "#".to_string()
}

fn default_redacted_class() -> String {
    "redacted".to_string()
}

/// Document discovery for the bundled hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory scanned recursively for documents.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    /// File extensions (without the dot) treated as documents.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            extensions: default_extensions(),
        }
    }
}

fn default_docs_dir() -> String {
    "docs".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "mdx".to_string()]
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let mut config: AppConfig = toml::from_str(s)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Lowercase and trim the free words so membership checks stay
    /// case-insensitive.
    fn normalize(&mut self) {
        for word in &mut self.puzzle.free_words {
            *word = word.trim().to_lowercase();
        }
        for ext in &mut self.corpus.extensions {
            *ext = ext.trim_start_matches('.').to_string();
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.puzzle.max_redaction_iterations == 0 {
            return Err(ConfigError::Validation(
                "puzzle.max_redaction_iterations must be at least 1".to_string(),
            ));
        }
        for (i, word) in self.puzzle.free_words.iter().enumerate() {
            if word.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "puzzle.free_words[{i}] must not be empty"
                )));
            }
        }
        let glyph = self.puzzle.mask_glyph;
        if glyph.is_alphanumeric() || glyph == '_' || glyph.is_whitespace() {
            return Err(ConfigError::Validation(format!(
                "puzzle.mask_glyph must not be a word or whitespace character, got {glyph:?}"
            )));
        }

        if self.render.link_placeholder.contains(':') {
            return Err(ConfigError::Validation(format!(
                "render.link_placeholder must not carry a scheme, got {:?}",
                self.render.link_placeholder
            )));
        }
        if self.render.redacted_class.trim().is_empty() {
            return Err(ConfigError::Validation(
                "render.redacted_class must not be empty".to_string(),
            ));
        }

        if self.corpus.docs_dir.is_empty() {
            return Err(ConfigError::Validation(
                "corpus.docs_dir must not be empty".to_string(),
            ));
        }
        if self.corpus.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "corpus.extensions must list at least one extension".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                valid_levels, self.logging.level
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.puzzle.free_words.is_empty());
        assert_eq!(config.puzzle.max_redaction_iterations, 1000);
        assert_eq!(config.puzzle.overflow, OverflowPolicy::Reveal);
        assert_eq!(config.puzzle.mask_glyph, '█');
        assert!(config.puzzle.reveal_all_on_solve);
        assert_eq!(config.render.link_placeholder, "#");
        assert!(!config.render.mask_headings);
        assert_eq!(config.corpus.docs_dir, "docs");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r##"
            [puzzle]
            free_words = ["A", " of "]
            max_redaction_iterations = 50
            overflow = "mask"
            mask_glyph = "*"
            reveal_all_on_solve = false

            [render]
            link_placeholder = "#hidden"
            mask_headings = true
            redacted_class = "blackout"

            [corpus]
            docs_dir = "content"
            extensions = [".md", "markdown"]

            [logging]
            level = "debug"
        "##;
        let config = AppConfig::parse(toml).unwrap();
        assert_eq!(config.puzzle.free_words, vec!["a", "of"]);
        assert_eq!(config.puzzle.max_redaction_iterations, 50);
        assert_eq!(config.puzzle.overflow, OverflowPolicy::Mask);
        assert_eq!(config.puzzle.mask_glyph, '*');
        assert!(!config.puzzle.reveal_all_on_solve);
        assert_eq!(config.render.link_placeholder, "#hidden");
        assert!(config.render.mask_headings);
        assert_eq!(config.render.redacted_class, "blackout");
        assert_eq!(config.corpus.docs_dir, "content");
        assert_eq!(config.corpus.extensions, vec!["md", "markdown"]);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validation_rejects_zero_iterations() {
        let toml = r#"
            [puzzle]
            max_redaction_iterations = 0
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_blank_free_word() {
        let toml = r#"
            [puzzle]
            free_words = ["of", "  "]
        "#;
        let err = AppConfig::parse(toml).unwrap_err();
        assert!(err.to_string().contains("puzzle.free_words[1]"));
    }

    #[test]
    fn test_validation_rejects_word_mask_glyph() {
        let toml = r#"
            [puzzle]
            mask_glyph = "x"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_unknown_overflow_policy() {
        let toml = r#"
            [puzzle]
            overflow = "split"
        "#;
        let err = AppConfig::parse(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_rejects_url_placeholder() {
        let toml = r#"
            [render]
            link_placeholder = "https://example.com"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_empty_extensions() {
        let toml = r#"
            [corpus]
            extensions = []
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_bad_log_level() {
        let toml = r#"
            [logging]
            level = "loud"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = AppConfig::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed = AppConfig::parse(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    // ── Async file-based loading ──────────────────────────────────────

    #[tokio::test]
    async fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("redactle.toml");
        tokio::fs::write(&path, b"[corpus]\ndocs_dir = \"site/docs\"\n")
            .await
            .unwrap();

        let config = AppConfig::load(&path).await.unwrap();
        assert_eq!(config.corpus.docs_dir, "site/docs");
    }

    #[tokio::test]
    async fn test_load_nonexistent_file() {
        let result = AppConfig::load(Path::new("/nonexistent/file.toml")).await;
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_invalid_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        tokio::fs::write(&path, b"not valid toml [[[").await.unwrap();

        let result = AppConfig::load(&path).await;
        assert!(result.is_err());
    }

    // ── Error display ─────────────────────────────────────────────────

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("bad value".to_string());
        assert_eq!(err.to_string(), "validation error: bad value");
    }
}
