mod app;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use maze_chase_core::config::GameConfig;
use ratatui::{
    crossterm::{
        self,
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
};
use std::{
    io::{self, Stdout},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Upper bound on how long the loop waits for input before redrawing.
const FRAME_BUDGET: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(version, about = "Escape the maze before the Empire catches you", long_about = None)]
struct Args {
    /// Level file to play
    #[arg(short, long, value_name = "LEVEL_FILE", default_value = "levels/level01.txt")]
    level: PathBuf,

    /// TOML file overriding the movement interval and level layout
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Directory for the log file
    #[arg(long, value_name = "DIR", default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    let _log_guard = setup_logging(&args.log_dir)?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    tracing::info!(level = %args.level.display(), ?config, "starting");

    // Set up the terminal
    let mut terminal = setup_terminal()?;

    // The level is loaded when a session starts, so a bad file only bounces
    // back to the menu.
    let mut app = App::new(args.level, config);
    let result = run_app(&mut terminal, &mut app);

    // Restore the terminal state even if the loop failed
    restore_terminal(&mut terminal)?;

    result
}

/// Routes `tracing` output to `<log_dir>/maze_chase.log`; the terminal
/// belongs to the UI.
fn setup_logging(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, "maze_chase.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop: draw, wait for input, then let the app advance.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = app.poll_timeout(Instant::now()).min(FRAME_BUDGET);
        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key.code);
                }
            }
        }

        app.update(Instant::now());

        if app.should_quit() {
            break;
        }
    }
    Ok(())
}
