#![deny(unsafe_code)]

//! Redactle TUI: play a puzzle in the terminal.

mod app;
mod keymap;
mod panels;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use redactle_config::AppConfig;
use redactle_core::pipeline::Rendered;
use redactle_core::render::TextLine;
use redactle_core::{ActivityLog, CorpusProvider, DirectoryCorpus, pick_index};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::app::{App, Panel};
use crate::panels::PuzzleContent;

const TICK: Duration = Duration::from_millis(100);
const LOG_CAPACITY: usize = 500;

/// Interactive Redactle puzzle.
#[derive(Parser, Debug)]
#[command(name = "redactle-tui", version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, default_value = "redactle.toml")]
    config: PathBuf,

    /// Directory of markdown documents, overriding `corpus.docs_dir`.
    #[arg(long)]
    docs: Option<PathBuf>,

    /// Document index. Random when omitted.
    #[arg(long)]
    index: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = if args.config.exists() {
        AppConfig::load(&args.config)
            .await
            .with_context(|| format!("invalid config at '{}'", args.config.display()))?
    } else {
        AppConfig::default()
    };
    if let Some(docs) = &args.docs {
        config.corpus.docs_dir = docs.display().to_string();
    }

    let activity = ActivityLog::new(LOG_CAPACITY);
    let reader = activity.reader();
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(activity)
        .init();

    let corpus = DirectoryCorpus::from_config(&config.corpus);
    let documents = corpus
        .documents()
        .await
        .with_context(|| format!("failed to load corpus from {}", corpus.describe()))?;
    let index = match args.index {
        Some(i) if i < documents.len() => i,
        Some(i) => bail!("document index {i} is out of range for a corpus of {}", documents.len()),
        None => pick_index(documents.len(), &mut rand::thread_rng()).context("corpus is empty")?,
    };
    info!(documents = documents.len(), index, "starting puzzle");

    let (render_tx, mut render_rx) = mpsc::unbounded_channel();
    let mut app = App::new(config, reader, render_tx);
    app.load(&documents, index);

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = run(&mut terminal, &mut app, &mut render_rx);

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}

type RenderRx = mpsc::UnboundedReceiver<Rendered<Vec<TextLine>>>;

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    render_rx: &mut RenderRx,
) -> Result<()> {
    while !app.should_quit {
        while let Ok(rendered) = render_rx.try_recv() {
            app.on_rendered(rendered);
        }
        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                let action = app.keymap.resolve(key.code, key.modifiers);
                app.handle_action(action);
            }
        } else {
            app.tick();
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(rows[1]);
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    let content = match (app.session.error(), app.rendered.current()) {
        (Some(error), _) => PuzzleContent::Error(error),
        (None, Some(lines)) => PuzzleContent::Lines {
            lines,
            stale: app.rendered.is_pending(),
        },
        (None, None) => PuzzleContent::Loading,
    };
    app.puzzle
        .render(frame, columns[0], content, app.active_panel == Panel::Puzzle);
    app.guesses
        .render(frame, side[0], app.active_panel == Panel::Guesses);
    app.logs
        .render(frame, side[1], app.active_panel == Panel::Logs);

    let (prompt, style) = if app.input_enabled() {
        (
            format!("{}_", app.session.guess()),
            Style::default().fg(Color::White),
        )
    } else {
        ("(input closed)".to_string(), Style::default().fg(Color::DarkGray))
    };
    let input = Paragraph::new(prompt)
        .style(style)
        .block(Block::default().title(" Guess ").borders(Borders::ALL));
    frame.render_widget(input, rows[2]);

    let status = Paragraph::new(app.status_line()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, rows[3]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let header = match app.celebration {
        Some(c) => {
            let color = if c.ticks_left % 2 == 0 {
                Color::Yellow
            } else {
                Color::Magenta
            };
            Paragraph::new(format!("★ {} ★", app.status)).style(
                Style::default()
                    .fg(color)
                    .add_modifier(Modifier::BOLD),
            )
        }
        None => {
            let label = match app.session.index() {
                Some(i) => format!("Redactle · puzzle #{i}"),
                None => "Redactle".to_string(),
            };
            Paragraph::new(label).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        }
    };
    frame.render_widget(header, area);
}
