//! End-to-end puzzle scenarios across document, redaction, rendering, and
//! session state.

use pretty_assertions::assert_eq;
use redactle_config::{AppConfig, OverflowPolicy};
use redactle_core::{
    CorpusProvider, Document, GuessOutcome, Phase, RedactLimits, RevealedSet, Session,
    SessionError, TitleError, redact, tokenizer,
};
use redactle_test_utils::config::TestConfigBuilder;
use redactle_test_utils::corpus::TestCorpus;
use redactle_test_utils::fixtures;
use redactle_test_utils::tracing_setup::init_test_tracing;

fn session_with(config: AppConfig, text: &str) -> Session {
    let mut session = Session::new(config);
    session.load(&[Document::from(text)], 0).unwrap();
    session
}

fn mask(len: usize) -> String {
    format!(
        "<span class=\"redacted\" data-length=\"{len}\">{}</span>",
        "█".repeat(len)
    )
}

// ── Scenarios ───────────────────────────────────────────────────────

#[test]
fn test_paris_facts_scenario() {
    init_test_tracing();
    let config = TestConfigBuilder::new().reveal_all_on_solve(false).build();
    let mut session = session_with(config, fixtures::PARIS);

    assert_eq!(session.title().unwrap().words(), &["paris", "facts"]);
    assert_eq!(session.solved(), Some(false));
    let nice = format!("{}.</p>", mask(4));
    assert!(session.render_html().unwrap().contains(&nice));

    session.submit("paris");
    assert_eq!(session.solved(), Some(false));
    assert!(session.render_html().unwrap().contains(&nice));

    session.submit("facts");
    assert_eq!(session.solved(), Some(true));
    assert!(session.take_solve_event());

    let view = session.derive_view();
    assert_eq!(
        view.markup.as_deref(),
        Some(
            format!(
                "<h1>Paris Facts</h1>\n<p>Paris {} {nice}\n",
                mask(2)
            )
            .as_str()
        )
    );
}

#[test]
fn test_link_scenario() {
    let session = session_with(AppConfig::default(), fixtures::LINK);
    let html = session.render_html().unwrap();
    assert_eq!(
        html,
        format!(
            "<h1>Paris</h1>\n<p><a href=\"#\">{} {}</a></p>\n",
            mask(5),
            mask(4)
        )
    );
    assert!(!html.contains("answer-is-paris"));
    assert!(!html.contains("example.com"));
}

#[test]
fn test_missing_title_scenario() {
    let mut session = Session::new(AppConfig::default());
    let err = session
        .load(&[Document::from(fixtures::NO_TITLE)], 0)
        .unwrap_err();
    assert!(matches!(err, SessionError::Title(TitleError::Missing)));

    let view = session.derive_view();
    assert_eq!(view.phase, Phase::Error);
    assert_eq!(view.error.as_deref(), Some("Could not find page title"));
    assert!(view.markup.is_none());
    assert!(view.guesses.is_empty());
}

#[test]
fn test_empty_title_scenario() {
    let mut session = Session::new(AppConfig::default());
    let err = session
        .load(&[Document::from(fixtures::EMPTY_TITLE)], 0)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Could not find any words in page title"
    );
    assert_eq!(session.phase(), Phase::Error);
}

// ── Properties ──────────────────────────────────────────────────────

#[test]
fn test_round_trip_when_every_token_is_revealed() {
    let text = "Ünïcode wörds, snake_case, 42 numbers; and `code`!";
    let revealed = RevealedSet::from_words(tokenizer::tokens(text).map(|t| t.canonical()));
    assert_eq!(
        redact(text, &revealed, false, &RedactLimits::default()),
        text
    );
}

#[test]
fn test_articles_are_free_in_any_case() {
    let session = session_with(AppConfig::default(), "# X\n\nTHE An a The dog");
    let html = session.render_html().unwrap();
    assert!(html.contains(&format!("<p>THE An a The {}</p>", mask(3))));
    assert!(session.revealed_words().is_empty());
}

#[test]
fn test_revealing_never_hides_visible_text() {
    let text = "The quick brown fox jumps over the lazy dog. The fox naps.";
    let limits = RedactLimits::default();
    let mut revealed = RevealedSet::with_free_words(["a", "an", "the"]);
    let mut previous = redact(text, &revealed, false, &limits);

    for guess in ["fox", "lazy", "missing", "quick", "dog", "naps"] {
        revealed.insert(guess);
        let next = redact(text, &revealed, false, &limits);
        assert_eq!(previous.chars().count(), next.chars().count());
        for (before, after) in previous.chars().zip(next.chars()) {
            if before != '█' {
                assert_eq!(before, after, "visible text changed after guessing {guess}");
            }
        }
        previous = next;
    }
}

#[test]
fn test_solve_requires_whole_title() {
    for (guesses, solved) in [
        (&["great", "wall"][..], true),
        (&["GREAT", "Wall"][..], true),
        (&["great"][..], false),
        (&["wall", "china"][..], false),
    ] {
        let mut session = session_with(AppConfig::default(), "# The Great Wall\n\nbody");
        for g in guesses {
            session.submit(g);
        }
        assert_eq!(session.solved(), Some(solved), "{guesses:?}");
    }
}

#[test]
fn test_duplicate_guess_matches_single_guess() {
    let mut once = session_with(AppConfig::default(), fixtures::KITCHEN_SINK);
    let mut twice = session_with(AppConfig::default(), fixtures::KITCHEN_SINK);
    once.submit("wall");
    twice.submit("wall");
    assert!(matches!(
        twice.submit("Wall"),
        GuessOutcome::AlreadyRevealed { .. }
    ));
    assert_eq!(once.derive_view(), twice.derive_view());
}

#[test]
fn test_kitchen_sink_structure() {
    let mut session = session_with(AppConfig::default(), fixtures::KITCHEN_SINK);
    session.submit("wall");
    let html = session.render_html().unwrap();

    assert!(html.starts_with("<h1>The Great Wall</h1>\n"));
    assert!(html.contains("<h2>History</h2>"));
    assert!(html.contains("<ul>\n<li>"));
    assert!(html.contains("<blockquote>"));
    assert!(html.contains("<pre><code class=\"language-text\">wall "));
    assert!(html.contains("<table>"));
    assert!(html.contains("<a href=\"#\">the "));
    assert!(!html.contains("maps.example"));
    assert!(!html.contains("ignored"));

    let words = session.revealed_words();
    assert_eq!(words[0].word, "wall");
    assert_eq!(words[0].count, 5);
}

#[test]
fn test_overflow_mask_policy_hides_remainder() {
    let config = TestConfigBuilder::new()
        .max_redaction_iterations(2)
        .overflow(OverflowPolicy::Mask)
        .build();
    let session = session_with(config, "# T\n\none two three four");
    let html = session.render_html().unwrap();
    assert!(!html.contains("three"));
    assert!(!html.contains("four"));

    let config = TestConfigBuilder::new().max_redaction_iterations(2).build();
    let session = session_with(config, "# T\n\none two three four");
    let html = session.render_html().unwrap();
    assert!(html.contains("three four"));
}

// ── Corpus and config on disk ───────────────────────────────────────

#[tokio::test]
async fn test_directory_corpus_feeds_session() {
    let corpus = TestCorpus::with_files(&[
        ("b/second.md", fixtures::LINK),
        ("a.md", fixtures::PARIS),
        ("skip.txt", "# nope"),
    ]);
    let docs = corpus.provider().documents().await.unwrap();
    assert_eq!(docs.len(), 2);

    let mut session = Session::new(corpus.config());
    session.load(&docs, 0).unwrap();
    assert_eq!(session.title().unwrap().line(), "# Paris Facts");
    session.load(&docs, 1).unwrap();
    assert_eq!(session.title().unwrap().line(), "# Paris");
    assert!(matches!(
        session.load(&docs, 2),
        Err(SessionError::InvalidCorpusIndex { index: 2, len: 2 })
    ));
}

#[tokio::test]
async fn test_config_file_shapes_session() {
    let corpus = TestCorpus::new();
    let path = corpus
        .write_config(
            "[puzzle]\nfree_words = [\"Of\"]\nmask_glyph = \"*\"\n\n\
             [render]\nredacted_class = \"hidden\"\n",
        )
        .await;
    let config = AppConfig::load(&path).await.unwrap();
    let session = session_with(config, "# Title\n\nThe end of a day");
    assert_eq!(
        session.render_html().unwrap(),
        "<h1>Title</h1>\n<p>The <span class=\"hidden\" data-length=\"3\">***</span> of a \
         <span class=\"hidden\" data-length=\"3\">***</span></p>\n"
    );
}

#[test]
fn test_articles_stay_free_with_empty_free_word_list() {
    let config = AppConfig::parse("[puzzle]\nfree_words = []").unwrap();
    let session = session_with(config, "# The Wall\n\nthe a an");
    assert!(session.revealed().contains("the"));
    assert_eq!(
        session.render_html().unwrap(),
        "<h1>The Wall</h1>\n<p>the a an</p>\n"
    );
}

#[test]
fn test_heading_in_fenced_code_is_taken_as_title() {
    let mut session = session_with(AppConfig::default(), "```\n# Fake title\n```");
    assert_eq!(session.phase(), Phase::Ready);
    assert_eq!(session.title().unwrap().words(), &["fake", "title"]);

    let html = session.render_html().unwrap();
    assert!(html.starts_with("<pre><code># "));
    assert!(html.contains(&format!("# {} {}", mask(4), mask(5))));

    session.submit("fake");
    session.submit("title");
    assert_eq!(session.solved(), Some(true));
}
