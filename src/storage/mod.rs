//! Persistent storage using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - Numbered save slots holding a JSON session snapshot
//! - A bounded hi-score table

use derive_more::{Display, Error, From};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::game::Snapshot;

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: meta and saves tables
/// - v2: added hi_scores table
const SCHEMA_VERSION: u32 = 2;

/// Errors that can occur during storage operations.
#[derive(Debug, Display, Error, From)]
pub enum StorageError {
    /// Database error from SQLite
    #[display("database error: {_0}")]
    #[from]
    Database(rusqlite::Error),
    /// Could not determine data directory
    #[display("could not determine data directory")]
    NoDataDirectory,
    /// Schema version mismatch (future version)
    #[display("database schema version {found} is newer than supported version {supported}")]
    FutureSchemaVersion { found: u32, supported: u32 },
    /// Failed to create data directory
    #[display("failed to create data directory: {_0}")]
    CreateDirFailed(std::io::Error),
    /// Slot number past the configured slot count
    #[display("there is no save slot {slot}")]
    NoSuchSlot { slot: u32 },
    /// Nothing saved in the slot
    #[display("save slot {slot} is empty")]
    EmptySlot { slot: u32 },
    /// Saved payload did not parse
    #[display("save slot {slot} is corrupt: {source}")]
    CorruptSave { slot: u32, source: serde_json::Error },
}

/// Summary of an occupied save slot, for the slot picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInfo {
    pub slot: u32,
    pub player: String,
    pub score: u64,
    pub level: u32,
    /// Unix timestamp (milliseconds)
    pub saved_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiScore {
    pub player: String,
    pub level: u32,
    pub score: u64,
    /// Unix timestamp (milliseconds)
    pub achieved_at: i64,
}

/// The main storage handle for saved games and hi-scores.
pub struct Storage {
    conn: Connection,
    slot_count: u32,
    hi_score_len: usize,
}

impl Storage {
    /// Open or create the storage database.
    ///
    /// Uses OS-standard directories:
    /// - Linux: `$XDG_DATA_HOME/booksnek/` or `~/.local/share/booksnek/`
    /// - macOS: `~/Library/Application Support/booksnek/`
    pub fn open() -> Result<Self, StorageError> {
        let data_dir = Self::data_dir()?;

        // Ensure directory exists
        std::fs::create_dir_all(&data_dir).map_err(StorageError::CreateDirFailed)?;

        let db_path = data_dir.join("booksnek.db");
        let conn = Connection::open(&db_path)?;
        debug!(path = %db_path.display(), "database opened");
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        let storage = Storage {
            conn,
            slot_count: 5,
            hi_score_len: 10,
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Set the number of save slots and hi-score entries kept.
    pub fn with_limits(mut self, slot_count: u32, hi_score_len: usize) -> Self {
        self.slot_count = slot_count;
        self.hi_score_len = hi_score_len;
        self
    }

    /// Get the OS-standard data directory.
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "booksnek")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    pub fn slot_count(&self) -> u32 {
        self.slot_count
    }

    /// Write a snapshot into a slot, replacing whatever was there.
    pub fn save_slot(&self, slot: u32, snapshot: &Snapshot) -> Result<(), StorageError> {
        self.check_slot(slot)?;
        let payload = serde_json::to_string(snapshot)
            .map_err(|source| StorageError::CorruptSave { slot, source })?;
        self.conn.execute(
            "INSERT OR REPLACE INTO saves (slot, player, score, level, saved_at, payload) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                slot,
                &snapshot.player,
                snapshot.score as i64,
                snapshot.level,
                now_millis(),
                payload
            ],
        )?;
        info!(
            slot,
            player = %snapshot.player,
            score = snapshot.score,
            level_best = snapshot.level_best(),
            "game saved"
        );
        Ok(())
    }

    /// Read the snapshot stored in a slot.
    pub fn load_slot(&self, slot: u32) -> Result<Snapshot, StorageError> {
        self.check_slot(slot)?;
        let payload: String = self
            .conn
            .query_row(
                "SELECT payload FROM saves WHERE slot = ?1",
                params![slot],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(StorageError::EmptySlot { slot })?;
        let snapshot = serde_json::from_str(&payload)
            .map_err(|source| StorageError::CorruptSave { slot, source })?;
        info!(slot, "game loaded");
        Ok(snapshot)
    }

    pub fn delete_slot(&self, slot: u32) -> Result<(), StorageError> {
        self.check_slot(slot)?;
        self.conn
            .execute("DELETE FROM saves WHERE slot = ?1", params![slot])?;
        info!(slot, "save deleted");
        Ok(())
    }

    /// One entry per slot, `None` for empty ones.
    pub fn list_slots(&self) -> Result<Vec<Option<SlotInfo>>, StorageError> {
        let mut slots: Vec<Option<SlotInfo>> = vec![None; self.slot_count as usize];
        let mut stmt = self
            .conn
            .prepare("SELECT slot, player, score, level, saved_at FROM saves ORDER BY slot")?;
        let rows = stmt.query_map([], |row| {
            let slot: u32 = row.get(0)?;
            let player: String = row.get(1)?;
            let score: i64 = row.get(2)?;
            let level: u32 = row.get(3)?;
            let saved_at: i64 = row.get(4)?;
            Ok(SlotInfo {
                slot,
                player,
                score: score.max(0) as u64,
                level,
                saved_at,
            })
        })?;
        for row in rows {
            let info = row?;
            if let Some(entry) = slots.get_mut(info.slot as usize) {
                *entry = Some(info);
            }
        }
        Ok(slots)
    }

    /// Record a finished game. Only the best `hi_score_len` entries are kept.
    ///
    /// Returns true if the score made the table.
    pub fn record_hi_score(&self, player: &str, level: u32, score: u64) -> Result<bool, StorageError> {
        self.conn.execute(
            "INSERT INTO hi_scores (player, level, score, achieved_at) VALUES (?1, ?2, ?3, ?4)",
            params![player, level, score as i64, now_millis()],
        )?;
        let id = self.conn.last_insert_rowid();
        self.conn.execute(
            "DELETE FROM hi_scores WHERE id NOT IN (SELECT id FROM hi_scores ORDER BY score DESC, achieved_at ASC, id ASC LIMIT ?1)",
            params![self.hi_score_len as i64],
        )?;
        let kept: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM hi_scores WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        if kept {
            info!(player, score, level, "new hi-score");
        }
        Ok(kept)
    }

    /// The hi-score table, best first.
    pub fn hi_scores(&self) -> Result<Vec<HiScore>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT player, level, score, achieved_at FROM hi_scores ORDER BY score DESC, achieved_at ASC, id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            let player: String = row.get(0)?;
            let level: u32 = row.get(1)?;
            let score: i64 = row.get(2)?;
            let achieved_at: i64 = row.get(3)?;
            Ok(HiScore {
                player,
                level,
                score: score.max(0) as u64,
                achieved_at,
            })
        })?;
        let mut scores = Vec::new();
        for row in rows {
            scores.push(row?);
        }
        Ok(scores)
    }

    // Private helper methods

    fn check_slot(&self, slot: u32) -> Result<(), StorageError> {
        if slot < self.slot_count {
            Ok(())
        } else {
            Err(StorageError::NoSuchSlot { slot })
        }
    }

    fn initialize_schema(&self) -> Result<(), StorageError> {
        // Check current schema version
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            // Fresh database, create schema
            self.create_schema()?;
        } else if current_version < SCHEMA_VERSION {
            // Need to migrate
            self.migrate_schema(current_version)?;
        } else if current_version > SCHEMA_VERSION {
            // Database is from a newer version of the game
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

    fn create_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Meta table: stores schema version
            CREATE TABLE meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- Saves table: one JSON snapshot per slot
            CREATE TABLE saves (
                slot INTEGER PRIMARY KEY,
                player TEXT NOT NULL,
                score INTEGER NOT NULL,
                level INTEGER NOT NULL,
                saved_at INTEGER NOT NULL,
                payload TEXT NOT NULL
            );
            "#,
        )?;
        self.create_hi_scores_table()?;

        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, now_millis()],
        )?;

        Ok(())
    }

    fn create_hi_scores_table(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS hi_scores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                player TEXT NOT NULL,
                level INTEGER NOT NULL,
                score INTEGER NOT NULL,
                achieved_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_hi_scores_score ON hi_scores (score DESC);
            "#,
        )?;
        Ok(())
    }

    fn migrate_schema(&self, from_version: u32) -> Result<(), StorageError> {
        let mut current_version = from_version;

        // Apply migrations sequentially
        while current_version < SCHEMA_VERSION {
            if current_version == 1 {
                self.create_hi_scores_table()?;
            }
            current_version += 1;
            debug!(version = current_version, "schema migrated");
        }

        self.conn.execute(
            "UPDATE meta SET schema_version = ?1",
            params![SCHEMA_VERSION],
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rules;
    use crate::game::{Dictionary, Game};

    fn snapshot(player: &str, seed: u64) -> Snapshot {
        let game = Game::with_seed(Dictionary::embedded(), Rules::default(), player, seed);
        Snapshot::capture(&game)
    }

    #[test]
    fn test_storage_creation() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.slot_count(), 5);
        assert!(storage.hi_scores().unwrap().is_empty());
    }

    #[test]
    fn test_schema_version_is_current() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.get_schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_future_schema_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE meta (schema_version INTEGER NOT NULL, created_at INTEGER NOT NULL);
             INSERT INTO meta VALUES (99, 0);",
        )
        .unwrap();
        let err = Storage::from_connection(conn).err().unwrap();
        assert!(matches!(
            err,
            StorageError::FutureSchemaVersion {
                found: 99,
                supported: SCHEMA_VERSION
            }
        ));
    }

    #[test]
    fn test_migrates_v1_database() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE meta (schema_version INTEGER NOT NULL, created_at INTEGER NOT NULL);
             INSERT INTO meta VALUES (1, 0);
             CREATE TABLE saves (slot INTEGER PRIMARY KEY, player TEXT NOT NULL, score INTEGER NOT NULL,
                                 level INTEGER NOT NULL, saved_at INTEGER NOT NULL, payload TEXT NOT NULL);",
        )
        .unwrap();
        let storage = Storage::from_connection(conn).unwrap();
        assert_eq!(storage.get_schema_version().unwrap(), SCHEMA_VERSION);
        assert!(storage.record_hi_score("ann", 2, 500).unwrap());
    }

    #[test]
    fn test_save_and_load_slot() {
        let storage = Storage::open_in_memory().unwrap();
        let snap = snapshot("ann", 1);
        storage.save_slot(2, &snap).unwrap();
        assert_eq!(storage.load_slot(2).unwrap(), snap);
    }

    #[test]
    fn test_save_overwrites_slot() {
        let storage = Storage::open_in_memory().unwrap();
        storage.save_slot(0, &snapshot("ann", 1)).unwrap();
        let second = snapshot("bob", 2);
        storage.save_slot(0, &second).unwrap();
        assert_eq!(storage.load_slot(0).unwrap(), second);
    }

    #[test]
    fn test_empty_slot() {
        let storage = Storage::open_in_memory().unwrap();
        let err = storage.load_slot(3).unwrap_err();
        assert!(matches!(err, StorageError::EmptySlot { slot: 3 }));
        assert_eq!(err.to_string(), "save slot 3 is empty");
    }

    #[test]
    fn test_slot_out_of_range() {
        let storage = Storage::open_in_memory().unwrap();
        let err = storage.save_slot(5, &snapshot("ann", 1)).unwrap_err();
        assert!(matches!(err, StorageError::NoSuchSlot { slot: 5 }));
    }

    #[test]
    fn test_corrupt_save() {
        let storage = Storage::open_in_memory().unwrap();
        storage
            .conn
            .execute(
                "INSERT INTO saves (slot, player, score, level, saved_at, payload) VALUES (1, 'x', 0, 1, 0, '{not json')",
                [],
            )
            .unwrap();
        let err = storage.load_slot(1).unwrap_err();
        assert!(matches!(err, StorageError::CorruptSave { slot: 1, .. }));
    }

    #[test]
    fn test_list_slots() {
        let storage = Storage::open_in_memory().unwrap();
        storage.save_slot(1, &snapshot("ann", 1)).unwrap();
        storage.save_slot(4, &snapshot("bob", 2)).unwrap();
        let slots = storage.list_slots().unwrap();
        assert_eq!(slots.len(), 5);
        assert!(slots[0].is_none());
        assert_eq!(slots[1].as_ref().unwrap().player, "ann");
        assert_eq!(slots[4].as_ref().unwrap().player, "bob");
        assert_eq!(slots[4].as_ref().unwrap().level, 1);

        storage.delete_slot(1).unwrap();
        assert!(storage.list_slots().unwrap()[1].is_none());
    }

    #[test]
    fn test_hi_scores_keep_top_entries() {
        let storage = Storage::open_in_memory().unwrap().with_limits(5, 3);
        assert!(storage.record_hi_score("ann", 1, 100).unwrap());
        assert!(storage.record_hi_score("bob", 2, 300).unwrap());
        assert!(storage.record_hi_score("cy", 1, 200).unwrap());
        assert!(storage.record_hi_score("dee", 4, 400).unwrap());
        assert!(!storage.record_hi_score("eve", 1, 50).unwrap());

        let scores = storage.hi_scores().unwrap();
        let names: Vec<&str> = scores.iter().map(|s| s.player.as_str()).collect();
        assert_eq!(names, vec!["dee", "bob", "cy"]);
        assert_eq!(scores[0].level, 4);
        assert_eq!(scores[0].score, 400);
    }

    #[test]
    fn test_data_dir() {
        // Should return a path (may fail in weird CI environments)
        if let Ok(dir) = Storage::data_dir() {
            assert!(dir.to_string_lossy().contains("booksnek"));
        }
    }
}
