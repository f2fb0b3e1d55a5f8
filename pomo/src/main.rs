use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use futures::StreamExt;
use pomo_core::{Firing, SessionController};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info, warn, Level};

mod app;
mod cli;
mod config;
mod scheduler;
mod ui;

use app::{App, Controller, SettingsView};
use cli::Cli;
use scheduler::TokioScheduler;

/// Redraw cadence; fast enough for the tachyonfx effects to animate.
const FRAME_INTERVAL: Duration = Duration::from_millis(50);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = init_logging(cli.verbose, cli.log_file.clone())?;

    let mut config = config::load_config(cli.config.as_deref())?;
    cli.apply(&mut config);
    let session_config = config
        .timer
        .validate()
        .context("Invalid timer configuration")?;
    info!(log = ?log_path, ?session_config, "starting pomo");

    let (scheduler, firings) = TokioScheduler::new();
    let mut controller = SessionController::new(session_config, App::new(config), scheduler);
    controller.announce();

    let guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let res = run_app(&mut terminal, &mut controller, firings).await;
    drop(guard);

    if let Err(err) = res {
        error!("pomo exited with error: {:?}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app<B: Backend + io::Write>(
    terminal: &mut Terminal<B>,
    controller: &mut Controller<TokioScheduler>,
    mut firings: UnboundedReceiver<Firing>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    let mut last_frame = Instant::now();
    let mut title = String::new();

    loop {
        let delta = last_frame.elapsed();
        last_frame = Instant::now();
        let settings = SettingsView::capture(controller);
        terminal.draw(|f| ui::draw(f, controller.presenter_mut(), &settings, delta))?;

        let window_title = controller.window_title();
        if window_title != title {
            execute!(terminal.backend_mut(), SetTitle(&window_title))?;
            title = window_title;
        }

        tokio::select! {
            Some(firing) = firings.recv() => controller.fire(firing),
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    app::handle_key(controller, key);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                None => return Ok(()),
            },
            _ = frames.tick() => {}
        }

        if controller.presenter().should_quit {
            info!(
                completed = controller.state().completed_work_sessions,
                "quitting"
            );
            return Ok(());
        }
    }
}

/// Raw mode and the alternate screen for the lifetime of the UI. Dropping
/// the guard restores the terminal, also when setup fails half way or the
/// loop bails out with an error.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen)
            .context("Failed to enter alternate screen")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to disable raw mode: {}", e);
        }
        if let Err(e) = restore_screen(&mut io::stdout()) {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}

/// Leaves the alternate screen, clears the window title and shows the cursor.
fn restore_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, LeaveAlternateScreen, SetTitle(""), Show)
}

/// Sends logs to a file; the terminal belongs to the UI.
fn init_logging(verbose: bool, path: Option<PathBuf>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path,
        None => {
            let dir = config::project_dirs()
                .map(|dirs| dirs.data_local_dir().to_path_buf())
                .unwrap_or_else(std::env::temp_dir);
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory {:?}", dir))?;
            dir.join("pomo.log")
        }
    };
    let file =
        File::create(&path).with_context(|| format!("Failed to create log file {:?}", path))?;
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(path)
}
