//! TSORDER - Terminal Order Form
//!
//! A terminal order form: pick menu items, adjust quantities and watch the
//! summary and total update as you go. Placing the order hands it off as
//! JSON on stdout.

use std::fs::OpenOptions;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tsorder::application::{App, AppMode};
use tsorder::domain::Menu;
use tsorder::infrastructure::{load_settings, MenuRepository, Settings};
use tsorder::presentation::{menu_viewport_rows, render_ui, InputHandler};

#[derive(Debug, Parser)]
#[command(name = "tsorder", version, about = "Terminal order form with live totals")]
struct Cli {
    /// Menu catalog (.json or .csv); the builtin menu when omitted
    #[arg(long)]
    menu: Option<PathBuf>,
    /// Settings file (default: ./tsorder.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where to write logs
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Entry point for the tsorder terminal order form.
///
/// Loads settings and the menu, sets up the terminal, and runs the event
/// loop until the user quits or places an order.
///
/// # Errors
///
/// Returns an error if settings or the menu cannot be loaded, or if
/// terminal setup fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    settings.apply_cli(cli.menu, cli.log_file);

    init_logging(&settings)?;

    let menu = match &settings.menu_path {
        Some(path) => MenuRepository::load_menu(path)?,
        None => Menu::default(),
    };
    info!(items = menu.len(), "starting order form");
    let mut app = App::new(menu).with_notification_timeout(settings.notification_timeout());

    let mut terminal = setup_terminal()?;

    let res = run_app(&mut terminal, &mut app, &settings);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    if let Some(submission) = &app.submission {
        println!("{}", serde_json::to_string_pretty(submission)?);
    }

    Ok(())
}

/// Enters raw mode and the alternate screen. If a later step fails the
/// terminal is put back the way it was before the error is returned.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let result = execute!(io::stdout(), EnterAlternateScreen)
        .and_then(|_| Terminal::new(CrosstermBackend::new(io::stdout())));
    if result.is_err() {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
    result
}

/// Sends `tracing` output to the configured log file, since the terminal
/// belongs to the UI.
fn init_logging(settings: &Settings) -> io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Main application event loop.
///
/// Polls for key events with the configured tick so timed notifications
/// expire on an idle screen. Stops on 'q' in normal mode or once the
/// order has been handed off.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, settings: &Settings) -> io::Result<()> {
    loop {
        let size = terminal.size()?;
        app.viewport_rows = menu_viewport_rows(size.height, app);
        app.ensure_cursor_visible();
        terminal.draw(|f| render_ui(f, app))?;

        if app.mode == AppMode::Submitted {
            return Ok(());
        }

        if event::poll(settings.tick_rate())? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.mode == AppMode::Normal => return Ok(()),
                        _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                    }
                }
            }
        }

        app.tick(Instant::now());
    }
}
