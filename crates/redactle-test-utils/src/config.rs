//! Configuration builders for tests.

use redactle_config::{AppConfig, OverflowPolicy};

/// Fluent builder for [`AppConfig`].
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .reveal_all_on_solve(false)
///     .max_redaction_iterations(3)
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn free_words(mut self, words: &[&str]) -> Self {
        self.config.puzzle.free_words = words.iter().map(|w| w.to_string()).collect();
        self
    }

    pub fn max_redaction_iterations(mut self, n: usize) -> Self {
        self.config.puzzle.max_redaction_iterations = n;
        self
    }

    pub fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.config.puzzle.overflow = policy;
        self
    }

    pub fn mask_glyph(mut self, glyph: char) -> Self {
        self.config.puzzle.mask_glyph = glyph;
        self
    }

    pub fn reveal_all_on_solve(mut self, reveal: bool) -> Self {
        self.config.puzzle.reveal_all_on_solve = reveal;
        self
    }

    pub fn link_placeholder(mut self, placeholder: &str) -> Self {
        self.config.render.link_placeholder = placeholder.to_string();
        self
    }

    pub fn mask_headings(mut self, mask: bool) -> Self {
        self.config.render.mask_headings = mask;
        self
    }

    pub fn docs_dir(mut self, dir: &str) -> Self {
        self.config.corpus.docs_dir = dir.to_string();
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
