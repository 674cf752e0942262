//! library-manager binary entry point.
//!
//! Parses flags, sets up file logging, initializes the terminal in raw mode,
//! runs the TUI event loop, and restores the terminal state on exit.
//!
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use library_manager::app::{self, AppState, config::ConfigPaths};
use library_manager::catalog::BorrowPolicy;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding theme.conf, keybinds.conf and the log file
    #[arg(long, env = "LIBRARY_MANAGER_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Write logs here instead of <config-dir>/library-manager.log
    #[arg(long, env = "LIBRARY_MANAGER_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (e.g. "debug" or "library_manager=trace")
    #[arg(long, env = "LIBRARY_MANAGER_LOG", default_value = "info")]
    log_level: String,

    /// Only let registered user ids borrow books
    #[arg(long)]
    strict_users: bool,
}

/// Log to a file; the terminal belongs to the UI.
fn init_tracing(path: &Path, level: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log filter {level:?}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("tracing init failed: {e}"))
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
///
/// Raw mode and the alternate screen are left again if any later step fails.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    rollback_on_err(
        || {
            let mut stdout = std::io::stdout();
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
            Ok(Terminal::new(CrosstermBackend::new(stdout))?)
        },
        || {
            execute!(std::io::stdout(), LeaveAlternateScreen, DisableMouseCapture).ok();
            disable_raw_mode().ok();
        },
    )
}

/// Run `setup`; call `undo` before handing back its error.
fn rollback_on_err<T>(setup: impl FnOnce() -> Result<T>, undo: impl FnOnce()) -> Result<T> {
    setup().inspect_err(|_| undo())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let paths = ConfigPaths::resolve(args.config_dir.as_deref());
    paths
        .ensure_dir()
        .with_context(|| format!("create config dir {}", paths.dir().display()))?;
    let log_path = args.log_file.clone().unwrap_or_else(|| paths.log_file());
    init_tracing(&log_path, &args.log_level)?;

    let policy = if args.strict_users {
        BorrowPolicy::RegisteredUsersOnly
    } else {
        BorrowPolicy::AnyUser
    };
    info!(config_dir = %paths.dir().display(), ?policy, "starting");
    let mut app = AppState::from_config(&paths, policy);

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        error!(error = %err, "application error");
        eprintln!("application error: {err:#}");
    }
    Ok(())
}
