//! Fuzz target for frontmatter stripping, redaction, and rendering.
//!
//! Run with: cargo +nightly fuzz run fuzz_redact
//!
//! Checks on arbitrary markdown that redaction keeps character counts, that
//! revealing every token reproduces the input, and that rendering never
//! panics.

#![no_main]

use libfuzzer_sys::fuzz_target;
use redactle_core::render::{RenderOptions, Renderer};
use redactle_core::{Document, RedactLimits, Redactor, RevealedSet, redact, tokenizer};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let limits = RedactLimits::default();

    let none = RevealedSet::new();
    let masked = redact(text, &none, false, &limits);
    assert_eq!(masked.chars().count(), text.chars().count());

    let all = RevealedSet::from_words(tokenizer::tokens(text).map(|t| t.canonical()));
    assert_eq!(redact(text, &all, false, &limits), text);

    if let Ok(doc) = Document::from(text).process() {
        let options = RenderOptions::default();
        let renderer = Renderer::new(Redactor::new(&none, false, &limits), &options);
        let html = renderer.html(&doc);
        let _ = renderer.text(&doc);
        assert!(!html.contains("<script"));
    }
});
