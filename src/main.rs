//! Ghotidle - daily phonetic word puzzle in your terminal.
//!
//! The clue is a respelling of how the word sounds (GHOTI -> FISH); the
//! server scores every guess. This binary just draws the board and talks
//! to the backend.

mod admin;
mod api;
mod app;
mod clipboard;
mod config;
mod game;
mod session;
mod toast;
mod ui;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use app::App;
use config::Config;

#[derive(Parser)]
#[command(name = "ghotidle")]
#[command(about = "Daily phonetic word puzzle in your terminal", long_about = None)]
struct Cli {
    /// Server base URL (overrides the config file)
    #[arg(short, long, value_name = "URL")]
    server: Option<String>,

    /// Custom data directory (overrides GHOTIDLE_DIR)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Open the password reset form with this emailed link
    #[arg(long, value_name = "URL")]
    reset_link: Option<String>,
}

/// Terminal guard. Raw mode and the alternate screen are restored on drop,
/// so a panic or early return does not leave the shell unusable.
struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Tui {
    fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        // Bracketed paste lets reset links arrive as one Paste event
        // instead of a burst of keystrokes.
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
            .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor()?;

        Ok(Self { terminal })
    }

    fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Ensure the terminal is restored even if cleanup() wasn't called
        let _ = self.cleanup();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The data directory override must land before any path lookups.
    if let Some(data_dir) = &cli.data_dir {
        std::env::set_var("GHOTIDLE_DIR", data_dir);
    }

    // A TUI can't log to stdout, so everything goes to a file. Control the
    // level with RUST_LOG, e.g. RUST_LOG=debug.
    std::fs::create_dir_all(Config::config_dir()?)?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(Config::log_path()?)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();

    let mut config = Config::load()?;
    if let Some(server) = cli.server {
        config.server.base_url = server;
    }

    // Use a tokio runtime for async backend I/O
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(config, cli.reset_link))
}

async fn run(config: Config, reset_link: Option<String>) -> Result<()> {
    let mut app = App::new(config)?;
    let mut tui = Tui::new()?;
    let result = app.run(&mut tui.terminal, reset_link).await;
    drop(tui);
    result
}
