//! Quotes TUI
//!
//! Terminal user interface for browsing and collecting quotes.
//!
//! ## Layout
//!
//! - Top: category filter tabs ("all" first)
//! - Middle: a random quote, or the quotes of the selected category
//! - Bottom: status bar, or the import path prompt
//!
//! ## Keys
//!
//! - n: Show a new random quote
//! - a: Add quote (Tab switches field, Enter adds, Esc cancels)
//! - ←/→ or c: Change category filter
//! - e: Export to ./quotes.json
//! - i: Import from a JSON file
//! - s: Sync now
//! - ?: Help
//! - q: Quit
//!
//! The session's last shown quote is forgotten when the TUI starts and
//! again when it exits.

mod app;
mod sync;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use quotes_core::sync::{SyncCommand, SyncHandle};
use quotes_core::{Config, Store};

use app::{App, InputMode};

/// Run the TUI application
pub async fn run(config: Config) -> Result<()> {
    // Initialize TUI logging (file-based, only if QUOTES_LOG is set)
    init_tui_logging(&config);

    let mut store = Store::open_with_config(config.clone())?;
    store.clear_session()?;

    let mut app = App::new(&mut store)?;
    let store = Arc::new(Mutex::new(store));

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let sync_handle = sync::spawn_sync(&config, store.clone());

    let result = run_app(&mut terminal, &mut app, &store, sync_handle).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    store.lock().await.clear_session()?;

    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &Mutex<Store>,
    mut sync_handle: Option<SyncHandle>,
) -> Result<()> {
    loop {
        app.check_status_timeout();

        terminal.draw(|frame| ui::draw(frame, app))?;

        let sync_event = tokio::select! {
            biased;
            event = sync::next_event(&mut sync_handle) => event,
            _ = tokio::time::sleep(Duration::from_millis(50)) => None,
        };

        if let Some(event) = sync_event {
            if app.apply_sync_event(&event) {
                // Remote quotes replaced the collection
                app.refresh(&*store.lock().await);
            }
        }

        // Check for terminal events (non-blocking)
        if event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // If error modal is showing, any key dismisses it
                if app.has_error() {
                    app.clear_error();
                    continue;
                }

                // If help is showing, any key dismisses it
                if app.show_help {
                    app.show_help = false;
                    continue;
                }

                let mut store = store.lock().await;
                let sync_requested = match app.input_mode {
                    InputMode::Normal => {
                        handle_normal_mode(app, &mut store, key.code, key.modifiers)
                    }
                    InputMode::AddQuote => {
                        handle_add_mode(app, &mut store, key.code);
                        false
                    }
                    InputMode::ImportPath => {
                        handle_import_mode(app, &mut store, key.code);
                        false
                    }
                };
                drop(store);

                if sync_requested {
                    request_sync(app, sync_handle.as_ref()).await;
                }
            }
        }

        if app.should_quit {
            if let Some(handle) = sync_handle.take() {
                let _ = handle.command_tx.send(SyncCommand::Shutdown).await;
            }
            break;
        }
    }

    Ok(())
}

/// Handle key events in normal mode
///
/// Returns true if a sync was requested.
fn handle_normal_mode(
    app: &mut App,
    store: &mut Store,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> bool {
    match code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        KeyCode::Char('n') => {
            if let Err(e) = app.show_random(store) {
                app.report_error(&e);
            }
        }

        KeyCode::Right | KeyCode::Char('c') => {
            if let Err(e) = app.next_category(store) {
                app.report_error(&e);
            }
        }
        KeyCode::Left => {
            if let Err(e) = app.prev_category(store) {
                app.report_error(&e);
            }
        }

        KeyCode::Char('a') => {
            app.enter_add_mode();
        }
        KeyCode::Char('i') => {
            app.enter_import_mode();
        }
        KeyCode::Char('e') => {
            if let Err(e) = app.export(store) {
                app.report_error(&e);
            }
        }

        KeyCode::Char('s') => return true,

        KeyCode::Char('?') => {
            app.toggle_help();
        }

        _ => {}
    }

    false
}

/// Handle key events while the add form is open
fn handle_add_mode(app: &mut App, store: &mut Store, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.exit_input_mode();
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.form.toggle_focus();
        }
        KeyCode::Enter => {
            // Validation errors keep the form and its contents
            if let Err(e) = app.submit_add(store) {
                app.report_error(&e);
            }
        }
        KeyCode::Char(c) => {
            app.insert_char(c);
        }
        KeyCode::Backspace => {
            app.delete_char();
        }
        _ => {}
    }
}

/// Handle key events in the import path prompt
fn handle_import_mode(app: &mut App, store: &mut Store, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.exit_input_mode();
        }
        KeyCode::Enter => {
            if let Err(e) = app.submit_import(store) {
                app.report_error(&e);
            }
        }
        KeyCode::Char(c) => {
            app.insert_char(c);
        }
        KeyCode::Backspace => {
            app.delete_char();
        }
        _ => {}
    }
}

/// Ask the sync agent for an immediate cycle
async fn request_sync(app: &mut App, handle: Option<&SyncHandle>) {
    let Some(handle) = handle else {
        app.set_status("Sync is disabled");
        return;
    };

    if handle.command_tx.send(SyncCommand::SyncNow).await.is_err() {
        warn!("Sync agent is no longer running");
        app.set_status("Sync is not running");
    }
}

/// Initialize logging for TUI mode
///
/// Only initializes if QUOTES_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_tui_logging(config: &Config) {
    let Ok(log_level) = std::env::var("QUOTES_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!("quotes_core={},quotes={}", log_level, log_level));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
