//! Mediq binary: terminal session, logging, and the frame loop.
//!
//! The engine owns all conversation state; this crate only wires it to a
//! terminal. Each 8ms frame drains the input queue, advances the engine's
//! deadlines via [`mediq_engine::App::tick`], and redraws.

use std::{
    fs::{self, OpenOptions},
    io::{Stdout, stdout},
    path::PathBuf,
    sync::Mutex,
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::{Backend, CrosstermBackend, Terminal};
use tokio::sync::oneshot;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use mediq_engine::{App, DEFAULT_KNOWLEDGE_PATH, KnowledgeStore, MediqConfig};
use mediq_tui::{InputPump, draw, handle_events};

const FRAME_DURATION: Duration = Duration::from_millis(8);

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match open_log_file() {
        Some((log_path, file)) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(filter)
                .init();
            tracing::info!(log = %log_path.display(), "mediq starting");
        }
        None => {
            // Stdout belongs to the TUI; with no usable log file, events
            // are dropped rather than written over the interface.
            tracing_subscriber::registry().with(filter).init();
        }
    }
}

/// First writable log file out of `~/.mediq/logs/` and `./.mediq/logs/`.
fn open_log_file() -> Option<(PathBuf, fs::File)> {
    let mut log_dirs = Vec::new();
    if let Some(config_dir) = MediqConfig::path().and_then(|p| p.parent().map(PathBuf::from)) {
        log_dirs.push(config_dir.join("logs"));
    }
    log_dirs.push(PathBuf::from(".mediq").join("logs"));

    for dir in log_dirs {
        if fs::create_dir_all(&dir).is_err() {
            continue;
        }
        let path = dir.join("mediq.log");
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
            return Some((path, file));
        }
    }
    None
}

/// Resolve the knowledge document path: config override, then the bundled
/// document in the working directory, then `~/.mediq/conditions.json`.
fn knowledge_path(config: &MediqConfig) -> PathBuf {
    if let Some(path) = &config.knowledge_path {
        return path.clone();
    }

    let bundled = PathBuf::from(DEFAULT_KNOWLEDGE_PATH);
    if bundled.exists() {
        return bundled;
    }

    if let Some(config_path) = MediqConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        let installed = config_dir.join("conditions.json");
        if installed.exists() {
            return installed;
        }
    }

    // Nothing found; let the loader fail and the app degrade.
    bundled
}

/// Puts the terminal into raw mode + alternate screen, and restores both
/// (plus bracketed paste) on drop, including panics and early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        match Self::enter_screen() {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen, DisableBracketedPaste);
                Err(err)
            }
        }
    }

    fn enter_screen() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, EnableBracketedPaste)?;
        Ok(Terminal::new(CrosstermBackend::new(out))?)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        );
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = match MediqConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            tracing::warn!("Ignoring config: {err}");
            MediqConfig::default()
        }
    };

    // Single load attempt; the app degrades if it fails.
    let (load_tx, load_rx) = oneshot::channel();
    let path = knowledge_path(&config);
    tokio::spawn(async move {
        let _ = load_tx.send(KnowledgeStore::load(&path).await);
    });

    let mut app = App::new(&config, load_rx);

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app).await
    };

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        let quit_requested = match handle_events(app, &mut input) {
            Ok(quit) => quit,
            Err(err) => break Err(err),
        };
        if quit_requested || app.should_quit() {
            break Ok(());
        }

        app.tick(Instant::now());

        if let Err(err) = terminal.draw(|frame| draw(frame, app)) {
            break Err(err.into());
        }
    };

    input.shutdown().await;
    result
}
