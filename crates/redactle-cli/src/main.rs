#![deny(unsafe_code)]

//! Redactle CLI: play, render, and check puzzles from a docs directory.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use redactle_config::AppConfig;
use redactle_core::{
    CorpusProvider, DirectoryCorpus, Document, GuessOutcome, Session, Title, pick_index,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Redactle: guess the words of a hidden document until its title is revealed.
#[derive(Parser, Debug)]
#[command(name = "redactle", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "redactle.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory of markdown documents, overriding `corpus.docs_dir`.
    #[arg(long)]
    docs: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play interactively, one guess per line.
    Play {
        /// Document index. Random when omitted.
        #[arg(long)]
        index: Option<usize>,
    },

    /// Render a puzzle once and exit.
    Render {
        /// Document index. Random when omitted.
        #[arg(long)]
        index: Option<usize>,

        /// Words to reveal before rendering.
        #[arg(long, value_delimiter = ',')]
        reveal: Vec<String>,

        /// Reveal the title so the puzzle renders as solved.
        #[arg(long)]
        solved: bool,

        /// Print the whole derived view as JSON instead of markup.
        #[arg(long)]
        json: bool,
    },

    /// Report documents that cannot be played.
    Check,

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, from_file) = load_config(&cli.config).await?;
    init_tracing(cli.verbose, &config.logging.level);
    if !from_file {
        info!(path = %cli.config.display(), "config file not found, using defaults");
    }
    if let Some(docs) = &cli.docs {
        config.corpus.docs_dir = docs.display().to_string();
    }

    match cli.command {
        Commands::Play { index } => cmd_play(config, index).await,
        Commands::Render {
            index,
            reveal,
            solved,
            json,
        } => cmd_render(config, index, &reveal, solved, json).await,
        Commands::Check => cmd_check(&config).await,
        Commands::Config { show } => cmd_config(&cli.config, &config, show),
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the configured level.
fn init_tracing(verbose: u8, configured: &str) {
    let level = match verbose {
        0 => configured,
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn cmd_play(config: AppConfig, index: Option<usize>) -> Result<()> {
    let documents = load_documents(&config).await?;
    let mut session = start_session(config, &documents, index)?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    play(&mut session, stdin.lock(), &mut stdout)
}

async fn cmd_render(
    config: AppConfig,
    index: Option<usize>,
    reveal: &[String],
    solved: bool,
    json: bool,
) -> Result<()> {
    let documents = load_documents(&config).await?;
    let mut session = start_session(config, &documents, index)?;
    apply_reveals(&mut session, reveal, solved);

    if json {
        println!("{}", serde_json::to_string_pretty(&session.derive_view())?);
    } else {
        print!("{}", session.render_html()?);
    }
    Ok(())
}

async fn cmd_check(config: &AppConfig) -> Result<()> {
    let entries = DirectoryCorpus::from_config(&config.corpus).scan().await?;
    let mut defects = 0;
    for entry in &entries {
        if let Some(problem) = check_document(&entry.document) {
            println!("{}: {problem}", entry.path.display());
            defects += 1;
        }
    }
    if defects > 0 {
        bail!("{defects} of {} documents cannot be played", entries.len());
    }
    println!("All {} documents are playable.", entries.len());
    Ok(())
}

fn cmd_config(config_path: &Path, config: &AppConfig, show: bool) -> Result<()> {
    if show {
        let toml_str = toml::to_string_pretty(config).context("failed to serialize config")?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

/// Returns the config and whether it came from `path`.
async fn load_config(path: &Path) -> Result<(AppConfig, bool)> {
    if path.exists() {
        let config = AppConfig::load(path)
            .await
            .with_context(|| format!("invalid config at '{}'", path.display()))?;
        Ok((config, true))
    } else {
        Ok((AppConfig::default(), false))
    }
}

async fn load_documents(config: &AppConfig) -> Result<Vec<Document>> {
    let corpus = DirectoryCorpus::from_config(&config.corpus);
    corpus
        .documents()
        .await
        .with_context(|| format!("failed to load corpus from {}", corpus.describe()))
}

fn start_session(
    config: AppConfig,
    documents: &[Document],
    index: Option<usize>,
) -> Result<Session> {
    let index = resolve_index(index, documents.len(), &mut rand::thread_rng())?;
    debug!(index, "selected document");
    let mut session = Session::new(config);
    session.load(documents, index)?;
    Ok(session)
}

fn resolve_index<R: rand::Rng + ?Sized>(
    requested: Option<usize>,
    len: usize,
    rng: &mut R,
) -> Result<usize> {
    match requested {
        Some(index) if index < len => Ok(index),
        Some(index) => bail!("document index {index} is out of range for a corpus of {len}"),
        None => pick_index(len, rng).context("corpus is empty"),
    }
}

fn apply_reveals(session: &mut Session, reveal: &[String], solved: bool) {
    for word in reveal {
        session.submit(word);
    }
    if solved {
        let title_words: Vec<String> = session
            .title()
            .map(|t| t.words().to_vec())
            .unwrap_or_default();
        for word in &title_words {
            session.submit(word);
        }
    }
}

/// Why a document cannot be played, if it cannot.
fn check_document(document: &Document) -> Option<String> {
    let processed = match document.process() {
        Ok(p) => p,
        Err(e) => return Some(e.to_string()),
    };
    Title::find(processed.body()).err().map(|e| e.to_string())
}

/// Run the guess loop until EOF or until the puzzle is solved.
fn play<R: BufRead, W: Write>(session: &mut Session, input: R, out: &mut W) -> Result<()> {
    print_puzzle(session, out)?;
    for line in input.lines() {
        let line = line?;
        match session.submit(&line) {
            GuessOutcome::Revealed { word, count } => {
                writeln!(out, "'{word}' appears {count} time(s).")?;
            }
            GuessOutcome::AlreadyRevealed { word } => {
                writeln!(out, "'{word}' is already revealed.")?;
            }
            GuessOutcome::Rejected => {
                writeln!(out, "Enter a single word.")?;
                continue;
            }
            GuessOutcome::Disabled => break,
        }

        if session.take_solve_event() {
            print_puzzle(session, out)?;
            let guesses = session.revealed_words().len();
            writeln!(out, "Solved in {guesses} guesses!")?;
            break;
        }
        print_puzzle(session, out)?;
        print_guesses(session, out)?;
    }
    Ok(())
}

fn print_puzzle<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    let snapshot = session.snapshot()?;
    writeln!(out)?;
    for line in snapshot.text() {
        writeln!(out, "{}", line.plain())?;
    }
    writeln!(out)?;
    Ok(())
}

fn print_guesses<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    for w in session.revealed_words() {
        writeln!(out, "  {:>4}  {}", w.count, w.word)?;
    }
    Ok(())
}
