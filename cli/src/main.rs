//! Taskdesk CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`taskdesk_engine`] (application state) and
//! [`taskdesk_tui`] (rendering), providing RAII-based terminal management
//! with guaranteed cleanup.
//!
//! ```text
//! main() -> Settings + SessionContext -> TerminalSession::new() -> run_app() -> App + TUI
//! ```
//!
//! # Event Loop
//!
//! A fixed 8ms render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`taskdesk_tui::InputPump`])
//! 3. Advance application state (`app.tick()`): apply finished requests,
//!    settle the search box, start fetches
//! 4. Render frame

use anyhow::Result;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, File, OpenOptions},
    io::{Stdout, Write, stdout},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use taskdesk_client::{FileStore, SessionContext};
use taskdesk_config::{Settings, TaskdeskConfig, data_dir};
use taskdesk_engine::App;
use taskdesk_tui::{InputPump, draw, handle_events};

const STORAGE_FILE: &str = "storage.json";
const LOG_FILE: &str = "taskdesk.log";
/// Used in place of `~/.taskdesk` when there is no home directory.
const LOCAL_DIR: &str = ".taskdesk";

/// Route `tracing` output to a log file. The TUI owns stdout and stderr, so
/// when no log file can be opened logging is dropped entirely.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let mut problems = Vec::new();
    let opened = log_file_candidates()
        .into_iter()
        .find_map(|path| match open_append(&path) {
            Ok(file) => Some((path, file)),
            Err(problem) => {
                problems.push(problem);
                None
            }
        });

    let Some((path, file)) = opened else {
        tracing_subscriber::registry().with(filter).init();
        return;
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(filter)
        .init();
    tracing::info!(path = %path.display(), "Logging to file");
    for problem in problems {
        tracing::warn!("{problem}");
    }
}

fn open_append(path: &Path) -> Result<File, String> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .map_err(|e| format!("Cannot create log directory {}: {e}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("Cannot open log file {}: {e}", path.display()))
}

/// `~/.taskdesk/logs/taskdesk.log`, then `./.taskdesk/logs/taskdesk.log`.
fn log_file_candidates() -> Vec<PathBuf> {
    let relative = Path::new("logs").join(LOG_FILE);
    data_dir()
        .map(|dir| dir.join(&relative))
        .into_iter()
        .chain(std::iter::once(PathBuf::from(LOCAL_DIR).join(&relative)))
        .collect()
}

fn storage_path() -> PathBuf {
    data_dir()
        .unwrap_or_else(|| PathBuf::from(LOCAL_DIR))
        .join(STORAGE_FILE)
}

/// Settings from the config file and environment. A broken config file is
/// logged and ignored.
fn load_settings() -> Result<Settings> {
    let config = match TaskdeskConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring config file: {e}");
            None
        }
    };
    match Settings::resolve(config.as_ref()) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            tracing::warn!("Invalid configuration, using defaults: {e}");
            Ok(Settings::defaults()?)
        }
    }
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Enables raw mode, bracketed paste and the alternate screen. On drop, all
/// terminal state is restored, so the terminal remains usable even after
/// panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnableBracketedPaste, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            let _ = execute!(out, LeaveAlternateScreen, DisableBracketedPaste);
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen, DisableBracketedPaste);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
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

    let settings = load_settings()?;
    let session = SessionContext::new(Arc::new(FileStore::new(storage_path())));
    let mut app = App::new(&settings, session)?;
    tracing::info!(api = %settings.api_url, auth = %settings.auth_url, "Starting");

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app).await
    };

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

const FRAME_DURATION: Duration = Duration::from_millis(8);

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend + Write,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let quit_now = match handle_events(app, &mut input) {
            Ok(q) => q,
            Err(e) => break Err(e),
        };
        if quit_now {
            break Ok(());
        }

        app.tick();

        if let Err(e) = terminal.draw(|frame| draw(frame, app)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
