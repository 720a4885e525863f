//! Application screen state management
//!
//! Handles transitions between the application screens:
//! - Setup: player roster editing, resume, history shortcut
//! - Playing: the score table, entry box, round-winner overlay, final result
//! - History: past games
//!
//! The coordinator also drives the persistence collaborator: the session is
//! saved after every transition and the history appended when a game
//! finishes. Storage failures are recorded for display and never interrupt
//! the in-memory session.

use rand::Rng;

use crate::app::state::{GameSession, Phase, SubmitError, TurnEvent};
use crate::game::validation::{build_roster, MAX_NAME_LENGTH, MIN_PLAYERS};
use crate::game::{Category, Round};
use crate::storage::{HistoryEntry, Storage, StorageError};

/// An open score-entry box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryBox {
    pub category: Category,
    pub buffer: String,
}

impl EntryBox {
    fn new(category: Category) -> Self {
        EntryBox {
            category,
            buffer: String::new(),
        }
    }
}

/// Per-screen UI state while playing.
#[derive(Debug, Clone, Default)]
pub struct PlayView {
    /// Row cursor for round-1 free selection
    pub cursor: usize,
    /// Open score-entry box, if any
    pub entry: Option<EntryBox>,
    /// Round-winner overlay shown after a round completes
    pub winner: Option<Round>,
    /// Feedback from the last rejected action
    pub notice: Option<String>,
}

/// The current application screen
pub enum Screen {
    /// Roster editing before a game
    Setup {
        names: Vec<String>,
        selected: usize,
        error: Option<String>,
        can_resume: bool,
    },
    /// A running (or finished) game
    Playing { game: GameSession, view: PlayView },
    /// Past games
    History {
        entries: Vec<HistoryEntry>,
        selected: usize,
    },
}

/// Main application coordinator
pub struct AppCoordinator {
    /// Current screen
    pub screen: Screen,
    /// Whether the application should quit
    pub should_quit: bool,
    /// Last storage failure, shown in the footer; cleared on the next success
    pub storage_warning: Option<String>,
    storage: Option<Storage>,
}

fn best_effort<T>(result: Result<T, StorageError>, warning: &mut Option<String>) {
    match result {
        Ok(_) => *warning = None,
        Err(e) => *warning = Some(e.to_string()),
    }
}

fn setup_screen(storage: Option<&Storage>) -> Screen {
    let can_resume = storage
        .map(|s| s.has_saved_state().unwrap_or(false))
        .unwrap_or(false);
    Screen::Setup {
        names: vec![String::new(); MIN_PLAYERS],
        selected: 0,
        error: None,
        can_resume,
    }
}

impl AppCoordinator {
    /// Create a coordinator starting at the setup screen.
    ///
    /// `storage` is optional so the coordinator keeps working (without
    /// resume or history) when the database cannot be opened.
    pub fn new(storage: Option<Storage>) -> Self {
        let screen = setup_screen(storage.as_ref());
        AppCoordinator {
            screen,
            should_quit: false,
            storage_warning: None,
            storage,
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // --- Setup screen ---

    pub fn setup_up(&mut self) {
        if let Screen::Setup { selected, .. } = &mut self.screen {
            *selected = selected.saturating_sub(1);
        }
    }

    pub fn setup_down(&mut self) {
        if let Screen::Setup {
            selected, names, ..
        } = &mut self.screen
        {
            if *selected + 1 < names.len() {
                *selected += 1;
            }
        }
    }

    /// Type into the selected name field.
    pub fn setup_char(&mut self, c: char) {
        if let Screen::Setup {
            names,
            selected,
            error,
            ..
        } = &mut self.screen
        {
            let name = &mut names[*selected];
            if name.chars().count() < MAX_NAME_LENGTH {
                name.push(c);
            }
            *error = None;
        }
    }

    pub fn setup_backspace(&mut self) {
        if let Screen::Setup {
            names,
            selected,
            error,
            ..
        } = &mut self.screen
        {
            names[*selected].pop();
            *error = None;
        }
    }

    /// Add an empty name row and select it.
    pub fn add_player(&mut self) {
        if let Screen::Setup {
            names, selected, ..
        } = &mut self.screen
        {
            names.push(String::new());
            *selected = names.len() - 1;
        }
    }

    /// Remove the selected name row. The roster never shrinks below the
    /// minimum player count.
    pub fn remove_player(&mut self) {
        if let Screen::Setup {
            names, selected, ..
        } = &mut self.screen
        {
            if names.len() > MIN_PLAYERS {
                names.remove(*selected);
                if *selected >= names.len() {
                    *selected = names.len() - 1;
                }
            }
        }
    }

    /// Validate the roster and start a new game.
    pub fn start_game(&mut self) {
        let Self {
            screen,
            storage,
            storage_warning,
            ..
        } = self;
        let Screen::Setup { names, error, .. } = screen else {
            return;
        };
        match build_roster(names) {
            Ok(players) => {
                let game = GameSession::new(players);
                if let Some(storage) = storage.as_ref() {
                    best_effort(storage.save_state(&game), storage_warning);
                }
                *screen = Screen::Playing {
                    game,
                    view: PlayView::default(),
                };
            }
            Err(e) => {
                *error = Some(e.message());
            }
        }
    }

    /// Resume the saved game, if one loads.
    pub fn resume_game(&mut self) {
        let Self {
            screen,
            storage,
            storage_warning,
            ..
        } = self;
        if !matches!(screen, Screen::Setup { .. }) {
            return;
        }
        let Some(storage) = storage.as_ref() else {
            return;
        };
        match storage.load_state() {
            Ok(Some(game)) => {
                let mut view = PlayView::default();
                // Drop the player straight back into the active row
                if let Phase::Round2 { current_row } = game.phase() {
                    view.entry = Some(EntryBox::new(current_row));
                }
                *screen = Screen::Playing { game, view };
            }
            Ok(None) => {}
            Err(e) => *storage_warning = Some(e.to_string()),
        }
    }

    /// Open the history screen.
    pub fn open_history(&mut self) {
        let Self {
            screen,
            storage,
            storage_warning,
            ..
        } = self;
        let entries = match storage.as_ref() {
            Some(storage) => match storage.load_history() {
                Ok(entries) => entries,
                Err(e) => {
                    *storage_warning = Some(e.to_string());
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        *screen = Screen::History {
            entries,
            selected: 0,
        };
    }

    // --- History screen ---

    pub fn history_up(&mut self) {
        if let Screen::History { selected, .. } = &mut self.screen {
            *selected = selected.saturating_sub(1);
        }
    }

    pub fn history_down(&mut self) {
        if let Screen::History { selected, entries } = &mut self.screen {
            if *selected + 1 < entries.len() {
                *selected += 1;
            }
        }
    }

    /// Leave the history screen.
    pub fn history_back(&mut self) {
        if matches!(self.screen, Screen::History { .. }) {
            self.screen = setup_screen(self.storage.as_ref());
        }
    }

    // --- Playing screen ---

    pub fn row_up(&mut self) {
        if let Screen::Playing { view, .. } = &mut self.screen {
            if view.entry.is_none() && view.winner.is_none() {
                view.cursor = view.cursor.saturating_sub(1);
            }
        }
    }

    pub fn row_down(&mut self) {
        if let Screen::Playing { view, .. } = &mut self.screen {
            if view.entry.is_none()
                && view.winner.is_none()
                && view.cursor + 1 < Category::ALL.len()
            {
                view.cursor += 1;
            }
        }
    }

    /// Open the entry box for the category under the cursor (round 1) or the
    /// active row (round 2).
    pub fn select_row(&mut self) {
        let Screen::Playing { game, view } = &mut self.screen else {
            return;
        };
        if view.entry.is_some() || view.winner.is_some() {
            return;
        }
        match game.phase() {
            Phase::Round1 => {
                let Some(category) = Category::from_index(view.cursor) else {
                    return;
                };
                if game.cards()[game.current_player_index()].is_filled(Round::Round1, category) {
                    view.notice = Some(SubmitError::CategoryFilled.message());
                    return;
                }
                view.notice = None;
                view.entry = Some(EntryBox::new(category));
            }
            Phase::Round2 { current_row } => {
                view.notice = None;
                view.entry = Some(EntryBox::new(current_row));
            }
            Phase::Finished => {}
        }
    }

    /// Type a digit into the entry buffer.
    pub fn entry_char(&mut self, c: char) {
        if let Screen::Playing { view, .. } = &mut self.screen {
            if let Some(entry) = &mut view.entry {
                if c.is_ascii_digit() && entry.buffer.len() < 3 {
                    entry.buffer.push(c);
                }
            }
        }
    }

    pub fn entry_backspace(&mut self) {
        if let Screen::Playing { view, .. } = &mut self.screen {
            if let Some(entry) = &mut view.entry {
                entry.buffer.pop();
            }
        }
    }

    pub fn entry_cancel(&mut self) {
        if let Screen::Playing { view, .. } = &mut self.screen {
            view.entry = None;
        }
    }

    /// Submit the entry buffer as the current player's score.
    pub fn entry_submit(&mut self) {
        let Self {
            screen,
            storage,
            storage_warning,
            ..
        } = self;
        let Screen::Playing { game, view } = screen else {
            return;
        };
        let Some(entry) = &mut view.entry else {
            return;
        };
        let Ok(value) = entry.buffer.parse::<u32>() else {
            // Empty or non-numeric buffer; keep the box open
            return;
        };
        let category = entry.category;

        match game.submit(category, value) {
            Ok(event) => {
                view.entry = None;
                view.notice = None;
                if let Some(storage) = storage.as_ref() {
                    best_effort(storage.save_state(game), storage_warning);
                }
                match event {
                    TurnEvent::Advanced => {
                        // Round 2 chains straight to the next player on the
                        // same (or next) row
                        if let Phase::Round2 { current_row } = game.phase() {
                            view.entry = Some(EntryBox::new(current_row));
                        }
                    }
                    TurnEvent::RoundOneComplete => {
                        view.winner = Some(Round::Round1);
                    }
                    TurnEvent::GameFinished => {
                        view.winner = Some(Round::Round2);
                        if let Some(storage) = storage.as_ref() {
                            let entry = HistoryEntry::now(game.standings());
                            best_effort(storage.append_history(&entry), storage_warning);
                        }
                    }
                }
            }
            Err(e) => {
                // Rejection leaves the session untouched; clear the buffer
                // so the player can retype
                view.notice = Some(e.message());
                entry.buffer.clear();
            }
        }
    }

    /// Dismiss the round-winner overlay and carry on.
    pub fn dismiss_winner(&mut self) {
        let Screen::Playing { game, view } = &mut self.screen else {
            return;
        };
        if view.winner.take().is_none() {
            return;
        }
        // Round 2 starts immediately with the first row's entry box
        if let Phase::Round2 { current_row } = game.phase() {
            view.entry = Some(EntryBox::new(current_row));
        }
    }

    /// Debug quick-fill of the running round (all cells but one).
    pub fn quick_fill(&mut self) {
        self.quick_fill_with_rng(&mut rand::rng());
    }

    /// Quick-fill using a specific RNG (for testing/seeding).
    pub fn quick_fill_with_rng<R: Rng>(&mut self, rng: &mut R) {
        let Self {
            screen,
            storage,
            storage_warning,
            ..
        } = self;
        let Screen::Playing { game, view } = screen else {
            return;
        };
        if view.winner.is_some() {
            return;
        }
        if let Some((_, category)) = game.fill_randomly(rng) {
            view.cursor = category.index();
            view.entry = Some(EntryBox::new(category));
            view.notice = None;
            if let Some(storage) = storage.as_ref() {
                best_effort(storage.save_state(game), storage_warning);
            }
        }
    }

    /// Abandon (or conclude) the game and return to setup. Clears the saved
    /// session.
    pub fn exit_to_setup(&mut self) {
        let Self {
            screen,
            storage,
            storage_warning,
            ..
        } = self;
        if !matches!(screen, Screen::Playing { .. }) {
            return;
        }
        if let Some(storage) = storage.as_ref() {
            best_effort(storage.clear_state(), storage_warning);
        }
        *screen = setup_screen(storage.as_ref());
    }
}
