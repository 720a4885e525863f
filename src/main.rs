//! Dados - a two-round dice score tracker for the table
//!
//! Roll real dice. Keep the sheet here.

mod app;
mod game;
mod storage;
mod tui;

use app::{AppCoordinator, Phase, Screen};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::io;
use std::time::Duration;
use storage::Storage;
use tui::Tui;

/// Where a key press should be routed, captured before mutating the app.
enum KeyTarget {
    Setup,
    Table { round1: bool },
    Entry,
    Winner,
    Result,
    History,
}

fn key_target(app: &AppCoordinator) -> KeyTarget {
    match &app.screen {
        Screen::Setup { .. } => KeyTarget::Setup,
        Screen::History { .. } => KeyTarget::History,
        Screen::Playing { game, view } => {
            if view.winner.is_some() {
                KeyTarget::Winner
            } else if view.entry.is_some() {
                KeyTarget::Entry
            } else if game.is_finished() {
                KeyTarget::Result
            } else {
                KeyTarget::Table {
                    round1: matches!(game.phase(), Phase::Round1),
                }
            }
        }
    }
}

fn handle_key(app: &mut AppCoordinator, code: KeyCode) {
    match key_target(app) {
        KeyTarget::Setup => match code {
            KeyCode::Up => app.setup_up(),
            KeyCode::Down => app.setup_down(),
            KeyCode::Char(c) => app.setup_char(c),
            KeyCode::Backspace => app.setup_backspace(),
            KeyCode::Tab => app.add_player(),
            KeyCode::BackTab => app.remove_player(),
            KeyCode::Enter => app.start_game(),
            KeyCode::F(5) => app.resume_game(),
            KeyCode::F(2) => app.open_history(),
            KeyCode::Esc => app.quit(),
            _ => {}
        },
        KeyTarget::Table { round1 } => match code {
            KeyCode::Up if round1 => app.row_up(),
            KeyCode::Down if round1 => app.row_down(),
            KeyCode::Enter => app.select_row(),
            KeyCode::F(8) => app.quick_fill(),
            KeyCode::Esc => app.exit_to_setup(),
            _ => {}
        },
        KeyTarget::Entry => match code {
            KeyCode::Char(c) => app.entry_char(c),
            KeyCode::Backspace => app.entry_backspace(),
            KeyCode::Enter => app.entry_submit(),
            KeyCode::Esc => app.entry_cancel(),
            _ => {}
        },
        KeyTarget::Winner => match code {
            KeyCode::Enter | KeyCode::Esc => app.dismiss_winner(),
            _ => {}
        },
        KeyTarget::Result => match code {
            KeyCode::Enter | KeyCode::Char('n') => app.exit_to_setup(),
            KeyCode::Esc => app.quit(),
            _ => {}
        },
        KeyTarget::History => match code {
            KeyCode::Up => app.history_up(),
            KeyCode::Down => app.history_down(),
            KeyCode::Esc | KeyCode::Backspace => app.history_back(),
            _ => {}
        },
    }
}

fn main() -> io::Result<()> {
    // Open storage; the app still runs without it
    let (storage, open_warning) = match Storage::open() {
        Ok(storage) => (Some(storage), None),
        Err(e) => (None, Some(e.to_string())),
    };

    // Initialize terminal
    let mut terminal = Tui::new()?;
    terminal.enter()?;

    let mut app = AppCoordinator::new(storage);
    app.storage_warning = open_warning;

    // Main event loop
    loop {
        // Render
        terminal.draw(|frame| tui::render(frame, &app))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut app, key.code);
                }
            }
        }

        // Check for quit
        if app.should_quit {
            break;
        }
    }

    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}
