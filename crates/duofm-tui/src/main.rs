//! duofm: a two-pane terminal file manager built with ratatui.
//!
//! This binary loads the config, initialises the terminal, runs the main
//! event loop, and restores the terminal on exit or panic.

mod input;
mod render;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use directories::UserDirs;
use duofm_core::{
    default_config_path, detect_platform, Config, ConfigOrigin, Dispatcher, Keymap, Outcome,
    Session,
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};

use crate::input::{translate_key, InputAction};
use crate::render::{render, ScreenLayout};
use crate::ui::panel::PanelStyle;
use crate::ui::statusbar::paint_progress;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// Two-pane terminal file manager.
#[derive(Debug, Parser)]
#[command(name = "duofm", version, about)]
struct Cli {
    /// Directory for the left panel.
    left: Option<PathBuf>,
    /// Directory for the right panel.
    right: Option<PathBuf>,
    /// Config file to use instead of the platform default.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn setup_terminal() -> anyhow::Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Term) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Logs to a file so output never lands on the alternate screen. Logging
/// is skipped if the file cannot be opened.
fn init_logging(log_path: &Path, verbose: bool) {
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("duofm: cannot open log file {}: {e}", log_path.display());
            return;
        }
    };
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(default_config_path);
    let log_path = config_path
        .as_deref()
        .and_then(Path::parent)
        .map(|dir| dir.join("duofm.log"))
        .unwrap_or_else(|| std::env::temp_dir().join("duofm.log"));
    init_logging(&log_path, cli.verbose);

    let (config, origin) = match &config_path {
        Some(path) => Config::load_or_default(path),
        None => {
            tracing::warn!("no config directory on this platform, session will not be saved");
            (Config::default(), ConfigOrigin::Missing)
        }
    };

    let home = UserDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    let session = initial_session(&cli, &config, home.as_deref());
    tracing::info!(left = %session.left.display(), right = %session.right.display(), "starting");

    let keymap = Keymap::with_overrides(&config.keys);
    let platform = detect_platform(config.shell_program());
    let mut dispatcher = Dispatcher::new(session, keymap, platform).with_home(home);

    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let style = PanelStyle {
        show_details: config.ui.show_details,
        date_format: &config.ui.date_format,
    };
    let result = run_app(&mut terminal, &mut dispatcher, style);

    if let Err(e) = restore_terminal(&mut terminal) {
        tracing::error!(error = %e, "failed to restore terminal");
    }

    shutdown(result, config_path.as_deref(), |path| {
        save_session(config.clone(), &dispatcher, path, origin)
    })
}

/// Saves the session only after a clean exit from the main loop; a failed
/// loop is logged and returned as is.
fn shutdown(
    result: anyhow::Result<()>,
    config_path: Option<&Path>,
    save: impl FnOnce(&Path),
) -> anyhow::Result<()> {
    match result {
        Ok(()) => {
            if let Some(path) = config_path {
                save(path);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "main loop failed, session not saved");
            Err(e)
        }
    }
}

/// Panel paths come from the command line, then the saved session, then
/// the working directory (left) and home directory (right).
fn initial_session(cli: &Cli, config: &Config, home: Option<&Path>) -> Session {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let left = cli
        .left
        .clone()
        .or_else(|| config.left_path.clone())
        .unwrap_or_else(|| cwd.clone());
    let right = cli
        .right
        .clone()
        .or_else(|| config.right_path.clone())
        .or_else(|| home.map(Path::to_path_buf))
        .unwrap_or_else(|| cwd.clone());

    Session {
        left: absolute(left),
        right: absolute(right),
        cursor_cache: config.cursor_cache.clone(),
        bookmarks: config.bookmarks.clone(),
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

fn save_session(mut config: Config, dispatcher: &Dispatcher, path: &Path, origin: ConfigOrigin) {
    if !origin.may_overwrite() {
        tracing::warn!(path = %path.display(), "config was unreadable, not saving session");
        return;
    }
    let session = dispatcher.session();
    config.left_path = Some(session.left);
    config.right_path = Some(session.right);
    config.cursor_cache = session.cursor_cache;
    config.bookmarks = session.bookmarks;
    if let Err(e) = config.save(path) {
        tracing::error!(path = %path.display(), error = %e, "failed to save session");
    }
}

fn run_app(terminal: &mut Term, dispatcher: &mut Dispatcher, style: PanelStyle<'_>) -> anyhow::Result<()> {
    loop {
        let size = terminal.size()?;
        let layout = ScreenLayout::new(Rect::new(0, 0, size.width, size.height));
        dispatcher.clamp_panels(layout.list_height());

        let status = dispatcher.take_status();
        terminal.draw(|f| render(f, dispatcher, style, status.as_deref()))?;

        let Event::Key(key_event) = event::read()? else {
            continue;
        };
        let key = match translate_key(key_event) {
            InputAction::Key(key) => key,
            InputAction::Quit => return Ok(()),
            InputAction::None => continue,
        };

        let mut painted = false;
        let outcome = {
            let backend = terminal.backend_mut();
            let mut progress = |line: &str| {
                painted = true;
                if let Err(e) = paint_progress(&mut *backend, layout.status.y, layout.status.width, line) {
                    tracing::debug!(error = %e, "progress paint failed");
                }
            };
            dispatcher.handle_key(key, &mut progress)
        };
        if painted {
            terminal.clear()?;
        }

        match outcome {
            Outcome::Continue => {}
            Outcome::Quit => return Ok(()),
            Outcome::Shell => run_shell(terminal, dispatcher)?,
        }
    }
}

/// Hands the terminal to an interactive shell and takes it back afterwards.
fn run_shell(terminal: &mut Term, dispatcher: &mut Dispatcher) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    dispatcher.run_shell();

    // Re-enter alternate screen regardless of the shell result
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(())
}
