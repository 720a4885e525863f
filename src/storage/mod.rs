//! Persistent storage using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - The saved-session blob (resume support)
//! - The append-only game history
//!
//! Persistence is best-effort from the session's point of view: callers
//! record or ignore failures, and the in-memory game is never rolled back
//! because a write failed.

use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::app::state::GameSession;
use crate::game::ranking::Standing;

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: Initial schema with meta, session and history tables
const SCHEMA_VERSION: u32 = 1;

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// Database error from SQLite
    Database(rusqlite::Error),
    /// Could not determine data directory
    NoDataDirectory,
    /// Failed to create data directory
    CreateDirFailed(std::io::Error),
    /// Schema version mismatch (future version)
    FutureSchemaVersion { found: u32, supported: u32 },
    /// A stored payload could not be encoded or decoded
    Encoding(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Database(e) => write!(f, "database error: {}", e),
            StorageError::NoDataDirectory => write!(f, "could not determine data directory"),
            StorageError::CreateDirFailed(e) => write!(f, "failed to create data directory: {}", e),
            StorageError::FutureSchemaVersion { found, supported } => {
                write!(
                    f,
                    "database schema version {} is newer than supported version {}",
                    found, supported
                )
            }
            StorageError::Encoding(e) => write!(f, "payload encoding error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Encoding(e)
    }
}

/// One finished game in the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// RFC 3339 timestamp of when the game finished
    pub date: String,
    /// Final lines, sorted descending by total at write time
    pub players: Vec<Standing>,
}

impl HistoryEntry {
    /// Build an entry stamped with the current UTC time.
    pub fn now(players: Vec<Standing>) -> Self {
        let date = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        HistoryEntry { date, players }
    }
}

/// The storage handle for saved sessions and game history.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the storage database.
    ///
    /// Uses OS-standard directories:
    /// - Linux: `$XDG_DATA_HOME/dados/` or `~/.local/share/dados/`
    /// - macOS: `~/Library/Application Support/dados/`
    pub fn open() -> Result<Self, StorageError> {
        let data_dir = Self::data_dir()?;

        // Ensure directory exists
        std::fs::create_dir_all(&data_dir).map_err(StorageError::CreateDirFailed)?;

        let db_path = data_dir.join("dados.db");
        let conn = Connection::open(&db_path)?;

        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Get the OS-standard data directory.
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "dados")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    /// Save (or overwrite) the active session blob.
    pub fn save_state(&self, session: &GameSession) -> Result<(), StorageError> {
        let payload = serde_json::to_string(session)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO session (id, payload, saved_at) VALUES (1, ?1, ?2)",
            params![payload, now_millis()],
        )?;
        Ok(())
    }

    /// Load the saved session, or None if there is none.
    pub fn load_state(&self) -> Result<Option<GameSession>, StorageError> {
        let payload: Option<String> = self
            .conn
            .query_row("SELECT payload FROM session WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Whether a saved session exists.
    pub fn has_saved_state(&self) -> Result<bool, StorageError> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM session WHERE id = 1", [], |row| {
                    row.get(0)
                })?;
        Ok(count > 0)
    }

    /// Remove the saved session.
    pub fn clear_state(&self) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM session WHERE id = 1", [])?;
        Ok(())
    }

    /// Append a finished game to the history log.
    ///
    /// Players are (re)sorted descending by total before the write so the
    /// stored shape is uniform regardless of the caller.
    pub fn append_history(&self, entry: &HistoryEntry) -> Result<(), StorageError> {
        let mut players = entry.players.clone();
        players.sort_by(|a, b| b.total.cmp(&a.total));
        let payload = serde_json::to_string(&players)?;
        self.conn.execute(
            "INSERT INTO history (played_at, payload) VALUES (?1, ?2)",
            params![entry.date, payload],
        )?;
        Ok(())
    }

    /// All history entries in insertion order.
    pub fn load_history(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT played_at, payload FROM history ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            let date: String = row.get(0)?;
            let payload: String = row.get(1)?;
            Ok((date, payload))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (date, payload) = row?;
            let players: Vec<Standing> = serde_json::from_str(&payload)?;
            entries.push(HistoryEntry { date, players });
        }
        Ok(entries)
    }

    // Private helper methods

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema_v1()?;
        } else if current_version > SCHEMA_VERSION {
            // Database is from a newer build
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        // Check if meta table exists
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: u32 = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema_v1(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Meta table: schema version
            CREATE TABLE meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- Session table: single-row saved game blob
            CREATE TABLE session (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                payload TEXT NOT NULL,
                saved_at INTEGER NOT NULL
            );

            -- History table: append-only finished games
            CREATE TABLE history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                played_at TEXT NOT NULL,
                payload TEXT NOT NULL
            );
            "#,
        )?;

        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, now_millis()],
        )?;

        Ok(())
    }
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
