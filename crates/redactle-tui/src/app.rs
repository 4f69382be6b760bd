//! TUI application state and event handling.

use redactle_config::AppConfig;
use redactle_core::pipeline::{self, Rendered, RenderSlot};
use redactle_core::render::TextLine;
use redactle_core::{ActivityReader, Document, GuessOutcome, Phase, Session};
use tokio::sync::mpsc;
use tracing::warn;

use crate::keymap::{Action, KeyMapper};
use crate::panels::{GuessesPanel, LogsPanel, PanelState, PuzzlePanel};

/// Ticks the solve banner stays up (at 100 ms per tick).
pub const CELEBRATION_TICKS: u32 = 30;

/// Lines moved by PageUp/PageDown.
const PAGE: usize = 10;

/// The panels available in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Puzzle,
    Guesses,
    Logs,
}

impl Panel {
    pub fn title(self) -> &'static str {
        match self {
            Panel::Puzzle => "Puzzle",
            Panel::Guesses => "Guesses",
            Panel::Logs => "Logs",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Panel::Puzzle => Panel::Guesses,
            Panel::Guesses => Panel::Logs,
            Panel::Logs => Panel::Puzzle,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Panel::Puzzle => Panel::Logs,
            Panel::Guesses => Panel::Puzzle,
            Panel::Logs => Panel::Guesses,
        }
    }
}

/// Solve banner countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Celebration {
    pub ticks_left: u32,
}

/// TUI application state.
pub struct App {
    pub should_quit: bool,
    pub active_panel: Panel,
    pub keymap: KeyMapper,
    pub session: Session,
    pub puzzle: PuzzlePanel,
    pub guesses: GuessesPanel,
    pub logs: LogsPanel,
    /// Displayed document render, last write wins.
    pub rendered: RenderSlot<Vec<TextLine>>,
    pub celebration: Option<Celebration>,
    pub status: String,
    render_tx: mpsc::UnboundedSender<Rendered<Vec<TextLine>>>,
}

impl App {
    /// Render results are sent to `render_tx`; feed them back through
    /// [`App::on_rendered`].
    pub fn new(
        config: AppConfig,
        log_reader: ActivityReader,
        render_tx: mpsc::UnboundedSender<Rendered<Vec<TextLine>>>,
    ) -> Self {
        Self {
            should_quit: false,
            active_panel: Panel::Puzzle,
            keymap: KeyMapper::new(),
            session: Session::new(config),
            puzzle: PuzzlePanel::new(),
            guesses: GuessesPanel::new(),
            logs: LogsPanel::new(log_reader),
            rendered: RenderSlot::new(),
            celebration: None,
            status: "Type a word and press Enter".to_string(),
            render_tx,
        }
    }

    /// Start a puzzle on `documents[index]`.
    pub fn load(&mut self, documents: &[Document], index: usize) {
        self.rendered.clear();
        self.celebration = None;
        match self.session.load(documents, index) {
            Ok(_) => self.status = format!("Puzzle #{index} loaded"),
            Err(e) => {
                warn!(index, error = %e, "failed to start puzzle");
                self.status = e.to_string();
            }
        }
        self.guesses.update(self.session.revealed_words());
        self.after_state_change();
    }

    /// Process a resolved action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::NextPanel => self.active_panel = self.active_panel.next(),
            Action::PrevPanel => self.active_panel = self.active_panel.prev(),
            Action::ScrollDown => self.active_panel_state_mut().scroll_down(1),
            Action::ScrollUp => self.active_panel_state_mut().scroll_up(1),
            Action::PageDown => self.active_panel_state_mut().scroll_down(PAGE),
            Action::PageUp => self.active_panel_state_mut().scroll_up(PAGE),
            Action::ScrollToTop => self.active_panel_state_mut().scroll_to_top(),
            Action::ScrollToBottom => self.active_panel_state_mut().scroll_to_bottom(),
            Action::Input(c) => {
                let mut guess = self.session.guess().to_string();
                guess.push(c);
                self.session.set_guess(guess);
            }
            Action::Backspace => {
                let mut guess = self.session.guess().to_string();
                guess.pop();
                self.session.set_guess(guess);
            }
            Action::ClearInput => self.session.set_guess(String::new()),
            Action::Submit => self.submit(),
            Action::None => {}
        }
    }

    fn submit(&mut self) {
        match self.session.submit_guess() {
            GuessOutcome::Revealed { word, count } => {
                self.status = format!("'{word}' appears {count} time(s)");
                self.guesses.update(self.session.revealed_words());
                self.after_state_change();
            }
            GuessOutcome::AlreadyRevealed { word } => {
                self.status = format!("'{word}' is already revealed");
            }
            GuessOutcome::Rejected => self.status = "Enter a single word".to_string(),
            GuessOutcome::Disabled => {}
        }
    }

    /// Fire the solve banner and request a fresh render.
    fn after_state_change(&mut self) {
        if self.session.take_solve_event() {
            let guesses = self.session.revealed_words().len();
            self.status = format!("Solved in {guesses} guesses!");
            self.celebration = Some(Celebration {
                ticks_left: CELEBRATION_TICKS,
            });
        }
        self.request_render();
    }

    /// Dispatch a background render of the current state. Must run inside a
    /// tokio runtime.
    pub fn request_render(&mut self) {
        let Ok(snapshot) = self.session.snapshot() else {
            return;
        };
        let ticket = self.rendered.issue();
        pipeline::dispatch(snapshot, ticket, |s| s.text(), self.render_tx.clone());
    }

    /// Accept a finished render unless a newer one has been requested.
    pub fn on_rendered(&mut self, rendered: Rendered<Vec<TextLine>>) {
        let len = rendered.value.len();
        if self.rendered.accept(rendered.ticket, rendered.value) {
            self.puzzle.set_line_count(len);
        }
    }

    /// Periodic refresh: logs and the banner countdown.
    pub fn tick(&mut self) {
        self.logs.refresh();
        if let Some(c) = &mut self.celebration {
            c.ticks_left = c.ticks_left.saturating_sub(1);
            if c.ticks_left == 0 {
                self.celebration = None;
            }
        }
    }

    pub fn input_enabled(&self) -> bool {
        self.session.phase() == Phase::Ready
    }

    fn active_panel_state_mut(&mut self) -> &mut dyn PanelState {
        match self.active_panel {
            Panel::Puzzle => &mut self.puzzle,
            Panel::Guesses => &mut self.guesses,
            Panel::Logs => &mut self.logs,
        }
    }

    pub fn status_line(&self) -> String {
        format!(
            " Esc:quit  Enter:guess  Tab:next panel  ↑↓/PgUp/PgDn:scroll  [{panel}]  {status}",
            panel = self.active_panel.title(),
            status = self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use redactle_core::ActivityLog;
    use redactle_test_utils::fixtures::{NO_TITLE, PARIS};

    fn make_app() -> (App, mpsc::UnboundedReceiver<Rendered<Vec<TextLine>>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(AppConfig::default(), ActivityLog::new(100).reader(), tx);
        (app, rx)
    }

    fn type_word(app: &mut App, word: &str) {
        for c in word.chars() {
            app.handle_action(Action::Input(c));
        }
        app.handle_action(Action::Submit);
    }

    async fn drain(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Rendered<Vec<TextLine>>>) {
        while app.rendered.is_pending() {
            let rendered = rx.recv().await.unwrap();
            app.on_rendered(rendered);
        }
    }

    // ── Panels ──────────────────────────────────────────────────────

    #[test]
    fn test_panel_cycle() {
        assert_eq!(Panel::Puzzle.next(), Panel::Guesses);
        assert_eq!(Panel::Logs.next(), Panel::Puzzle);
        assert_eq!(Panel::Puzzle.prev(), Panel::Logs);
        assert_eq!(Panel::Guesses.prev(), Panel::Puzzle);
        assert_eq!(Panel::Guesses.title(), "Guesses");
    }

    #[test]
    fn test_quit_and_panel_actions() {
        let (mut app, _rx) = make_app();
        app.handle_action(Action::NextPanel);
        assert_eq!(app.active_panel, Panel::Guesses);
        app.handle_action(Action::PrevPanel);
        assert_eq!(app.active_panel, Panel::Puzzle);
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_scroll_actions_no_panic() {
        let (mut app, _rx) = make_app();
        for _ in 0..3 {
            app.handle_action(Action::NextPanel);
            app.handle_action(Action::ScrollDown);
            app.handle_action(Action::ScrollUp);
            app.handle_action(Action::PageDown);
            app.handle_action(Action::PageUp);
            app.handle_action(Action::ScrollToTop);
            app.handle_action(Action::ScrollToBottom);
        }
    }

    // ── Guess buffer ────────────────────────────────────────────────

    #[test_log::test(tokio::test)]
    async fn test_editing_the_guess() {
        let (mut app, _rx) = make_app();
        app.load(&[Document::from(PARIS)], 0);
        for c in "nicx".chars() {
            app.handle_action(Action::Input(c));
        }
        app.handle_action(Action::Backspace);
        app.handle_action(Action::Input('e'));
        assert_eq!(app.session.guess(), "nice");
        app.handle_action(Action::ClearInput);
        assert_eq!(app.session.guess(), "");
    }

    // ── Rendering and solving ───────────────────────────────────────

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_guesses_update_render_and_list() {
        let (mut app, mut rx) = make_app();
        app.load(&[Document::from(PARIS)], 0);
        drain(&mut app, &mut rx).await;
        let lines = app.rendered.current().unwrap();
        assert_eq!(lines.last().unwrap().plain(), "█████ ██ ████.");

        type_word(&mut app, "nice");
        drain(&mut app, &mut rx).await;
        assert_eq!(
            app.rendered.current().unwrap().last().unwrap().plain(),
            "█████ ██ nice."
        );
        assert_eq!(app.guesses.entries()[0].word, "nice");
        assert_eq!(app.status, "'nice' appears 1 time(s)");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_solve_starts_celebration_and_disables_input() {
        let (mut app, mut rx) = make_app();
        app.load(&[Document::from(PARIS)], 0);
        type_word(&mut app, "paris");
        assert!(app.celebration.is_none());
        type_word(&mut app, "facts");
        assert_eq!(
            app.celebration,
            Some(Celebration {
                ticks_left: CELEBRATION_TICKS
            })
        );
        assert!(!app.input_enabled());

        app.handle_action(Action::Input('x'));
        assert_eq!(app.session.guess(), "");

        drain(&mut app, &mut rx).await;
        assert_eq!(
            app.rendered.current().unwrap().last().unwrap().plain(),
            "Paris is nice."
        );

        for _ in 0..CELEBRATION_TICKS {
            app.tick();
        }
        assert!(app.celebration.is_none());
    }

    #[test_log::test(tokio::test)]
    async fn test_error_document_shows_error() {
        let (mut app, _rx) = make_app();
        app.load(&[Document::from(NO_TITLE)], 0);
        assert_eq!(app.session.phase(), Phase::Error);
        assert_eq!(app.status, "Could not find page title");
        assert!(app.rendered.latest().is_none());
    }

    #[test_log::test]
    fn test_stale_render_is_ignored() {
        let (mut app, _rx) = make_app();
        let old = app.rendered.issue();
        let new = app.rendered.issue();
        app.on_rendered(Rendered {
            ticket: new,
            value: vec![TextLine::default(); 3],
        });
        app.on_rendered(Rendered {
            ticket: old,
            value: vec![TextLine::default(); 8],
        });
        assert_eq!(app.rendered.current().unwrap().len(), 3);
    }

    #[test]
    fn test_status_line_names_panel() {
        let (mut app, _rx) = make_app();
        assert!(app.status_line().contains("[Puzzle]"));
        app.handle_action(Action::NextPanel);
        assert!(app.status_line().contains("[Guesses]"));
    }
}
