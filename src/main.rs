// main.rs

use anyhow::Context;
use clap::Parser;
use dayplanner::app::App;
use dayplanner::clock::SystemClock;
use dayplanner::config::{self, Config};
use dayplanner::poll::ReminderEngine;
use dayplanner::{logging, tui};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self};
use std::path::PathBuf;
use tracing::{error, info};

/// Terminal day planner: add tasks with a due time, get a reminder before
/// the deadline, and see what you missed.
#[derive(Parser, Debug)]
#[command(name = "dayplanner", version, about)]
struct Cli {
    /// Path to the JSON config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the log.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let config = Config::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    let log_path = cli.log_file.unwrap_or_else(config::default_log_path);
    let _log_guard = logging::init(&log_path, &config.log_filter)?;
    info!(path = %config_path.display(), ?config, "starting");

    let mut app = App::new(
        ReminderEngine::new(config.reminder_window_secs),
        Box::new(SystemClock),
    );

    enable_raw_mode()?;
    let mut terminal = tui::setup_or_restore(
        || -> io::Result<_> {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Terminal::new(CrosstermBackend::new(stdout))
        },
        || {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        },
    )?;

    // Blocks until the user quits
    let res = tui::run_app(&mut terminal, &mut app, config.tick_interval());

    // Restore terminal state
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(%err, "event loop failed");
        return Err(err).context("running the event loop");
    }

    info!(tasks = app.store().len(), "exiting; tasks are not saved");
    Ok(())
}
