use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use connect_four::config::{AppConfig, ConfigSource};
use connect_four::game::{Snapshot, COLS, ROWS};
use connect_four::persistence::{FsStorage, Records, TextStorage};
use connect_four::session::Session;
use connect_four::ui::App;

const LOG_FILE: &str = "connect_four.log";

/// Play Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "connect-four", about = "Play Connect Four in the terminal")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect_four.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a new match
    Play {
        /// Name of player one (X, moves first)
        #[arg(long)]
        player1: String,

        /// Name of player two (O); defaults to the computer's name
        #[arg(long)]
        player2: Option<String>,

        /// Let the computer play O
        #[arg(long)]
        vs_computer: bool,
    },
    /// Continue a saved match by its number (see `saves`)
    Resume { index: usize },
    /// List saved matches
    Saves {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show total wins per player and the number of recorded games
    Scores,
    /// Print the default configuration
    DefaultConfig,
}

#[derive(Serialize)]
struct SaveEntry {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<Snapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::DefaultConfig => {
            print!("{}", AppConfig::default_toml());
            Ok(())
        }
        Command::Play {
            player1,
            player2,
            vs_computer,
        } => {
            let (config, records) = open_records(&cli.config)?;
            let player2 = match player2 {
                Some(name) => name,
                None if vs_computer => config.automated.name.clone(),
                None => bail!("--player2 is required unless --vs-computer is given"),
            };
            let session = Session::new(records, &player1, &player2, vs_computer)
                .context("starting a new match")?;
            run_tui(App::new(session, config.automated))
        }
        Command::Resume { index } => {
            let (config, records) = open_records(&cli.config)?;
            let session = Session::resume(records, index)
                .with_context(|| format!("loading save #{index}"))?;
            run_tui(App::new(session, config.automated))
        }
        Command::Saves { json } => {
            let (_, records) = open_records(&cli.config)?;
            list_saves(&records, json)
        }
        Command::Scores => {
            let (_, records) = open_records(&cli.config)?;
            let totals = records.win_totals().context("reading win totals")?;
            if totals.is_empty() {
                println!("No wins recorded yet.");
            }
            for (name, wins) in &totals {
                println!("{name}: {wins} total win(s)");
            }
            println!(
                "Total historical games recorded: {}",
                records.history_count().context("reading history")?
            );
            Ok(())
        }
    }
}

/// Load the config, open its storage directory and start logging there.
fn open_records(config_path: &Path) -> Result<(AppConfig, Records<FsStorage>)> {
    let (config, source) = AppConfig::load_or_default(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    let storage = FsStorage::new(&config.storage.dir)
        .with_context(|| format!("opening storage in {}", config.storage.dir.display()))?;
    init_logging(&config)?;
    if source == ConfigSource::Defaults {
        warn!(path = %config_path.display(), "config file not found, using defaults");
    }

    let records = Records::new(storage, &config.storage);
    Ok((config, records))
}

/// Log to a file next to the saves so output never lands on the UI.
fn init_logging(config: &AppConfig) -> Result<()> {
    let path = config.storage.dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn list_saves(records: &Records<FsStorage>, json: bool) -> Result<()> {
    let saves = records.list_snapshots().context("reading saves")?;

    if json {
        let entries: Vec<SaveEntry> = saves
            .into_iter()
            .map(|(index, result)| match result {
                Ok(snapshot) => SaveEntry {
                    index,
                    snapshot: Some(snapshot),
                    error: None,
                },
                Err(e) => SaveEntry {
                    index,
                    snapshot: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if saves.is_empty() {
        println!("No saved games found.");
    }
    for (index, result) in saves {
        match result {
            Ok(snapshot) => {
                let [one, two] = &snapshot.players;
                let pieces = snapshot.cells.iter().flatten().filter(|c| !c.is_empty()).count();
                println!(
                    "{index}. {} vs {} ({} to move, {pieces}/{} cells, {} round(s) completed)",
                    one.name,
                    two.name,
                    snapshot.current_turn,
                    COLS * ROWS,
                    snapshot.rounds_completed
                );
            }
            Err(e) => println!("{index}. unreadable: {e}"),
        }
    }
    Ok(())
}

fn run_tui<S: TextStorage>(mut app: App<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal — always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    Ok(res?)
}
