//! Setup and score-entry validation
//!
//! Roster validation runs before a session is created: at least two players,
//! no empty or overlong names, names unique ignoring case. Value validation
//! enforces the per-category ceiling before a submission reaches the session.

use super::{Category, Player};

/// Maximum player name length accepted at setup.
pub const MAX_NAME_LENGTH: usize = 12;

/// Minimum number of players for a session.
pub const MIN_PLAYERS: usize = 2;

/// Why a roster was rejected at setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// Fewer than the required number of players
    TooFewPlayers { count: usize },
    /// A name was empty (or whitespace only)
    EmptyName { position: usize },
    /// A name exceeded the length bound
    NameTooLong { name: String },
    /// Two names collide ignoring case
    DuplicateName { name: String },
}

impl SetupError {
    /// Returns a user-facing failure reason.
    pub fn message(&self) -> String {
        match self {
            SetupError::TooFewPlayers { count } => {
                format!("Need at least {} players (have {})", MIN_PLAYERS, count)
            }
            SetupError::EmptyName { position } => {
                format!("Player {} has no name", position + 1)
            }
            SetupError::NameTooLong { name } => {
                format!("Name '{}' is too long (max {})", name, MAX_NAME_LENGTH)
            }
            SetupError::DuplicateName { name } => {
                format!("Name '{}' is used more than once", name)
            }
        }
    }
}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SetupError {}

/// Validate raw name inputs and build the session roster.
///
/// Names are trimmed; ids are assigned in entry order starting at 1. No
/// roster is produced on failure.
pub fn build_roster(names: &[String]) -> Result<Vec<Player>, SetupError> {
    if names.len() < MIN_PLAYERS {
        return Err(SetupError::TooFewPlayers { count: names.len() });
    }

    let mut players: Vec<Player> = Vec::with_capacity(names.len());
    for (position, raw) in names.iter().enumerate() {
        let name = raw.trim();
        if name.is_empty() {
            return Err(SetupError::EmptyName { position });
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(SetupError::NameTooLong {
                name: name.to_string(),
            });
        }
        let lower = name.to_lowercase();
        if players.iter().any(|p| p.name.to_lowercase() == lower) {
            return Err(SetupError::DuplicateName {
                name: name.to_string(),
            });
        }
        players.push(Player {
            id: position as u32 + 1,
            name: name.to_string(),
        });
    }

    Ok(players)
}

/// Check a submitted score value against the category ceiling.
///
/// Returns the ceiling that was exceeded, if any. Values are already
/// non-negative by type.
pub fn check_value(category: Category, value: u32) -> Result<(), u32> {
    let max = category.max_value();
    if value > max {
        Err(max)
    } else {
        Ok(())
    }
}
