//! SQLite-backed history store
//!
//! Every committed field value is kept in a single `history` table keyed by
//! the field's tag. The store provides:
//! - Insert-or-refresh with deduplication on `(tag, text)`
//! - Most-recent-first retrieval per tag
//! - Clearing a single tag or the whole log
//!
//! The store never holds a connection between calls. Each operation opens
//! its own handle and drops it before returning, on success and on error.

use crate::error::Result;
use crate::types::{EntryId, Tag};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Current on-disk schema version, stored in `PRAGMA user_version`
pub const SCHEMA_VERSION: i64 = 1;

/// Represents a stored history entry
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub tag: Tag,
    pub text: String,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
}

impl HistoryEntry {
    /// Timestamp as a UTC date-time
    pub fn timestamp(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp_ms).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// Statistics about the store
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    pub total_entries: usize,
    pub total_tags: usize,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}

/// Durable per-tag log of committed text values
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Open (and if needed create) the history database at `db_path`
    ///
    /// A database written with a different schema version has its table
    /// dropped and recreated.
    #[must_use = "History store must be used"]
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = Self {
            path: db_path.to_path_buf(),
        };

        let conn = store.connect()?;
        Self::initialize_schema(&conn)?;

        Ok(store)
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }

    fn initialize_schema(conn: &Connection) -> Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version == SCHEMA_VERSION {
            return Ok(());
        }

        if version != 0 {
            warn!(
                found = version,
                expected = SCHEMA_VERSION,
                "history schema version changed, discarding stored history"
            );
        }

        conn.execute_batch(&format!(
            "BEGIN;
             DROP TABLE IF EXISTS history;
             CREATE TABLE history (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 tag TEXT NOT NULL,
                 text TEXT NOT NULL,
                 time INTEGER NOT NULL
             );
             CREATE INDEX idx_history_tag_time ON history(tag, time DESC);
             PRAGMA user_version = {SCHEMA_VERSION};
             COMMIT;"
        ))?;

        Ok(())
    }

    /// Schema version recorded in the database file
    pub fn schema_version(&self) -> Result<i64> {
        let conn = self.connect()?;
        Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    /// Record `text` for `tag` at the current time
    ///
    /// The text is trimmed first; blank text is ignored. Re-submitting a
    /// value already stored for the tag refreshes its timestamp instead of
    /// adding a row. Timestamps never go backwards: a commit landing in the
    /// same millisecond as the latest stored one is recorded one
    /// millisecond later.
    pub fn insert(&self, tag: &str, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            debug!(tag, "ignoring blank history value");
            return Ok(());
        }

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let latest: Option<i64> =
            tx.query_row("SELECT MAX(time) FROM history", [], |row| row.get(0))?;
        let now = Utc::now().timestamp_millis();
        let time = match latest {
            Some(latest) if latest >= now => latest + 1,
            _ => now,
        };

        Self::upsert(&tx, tag, text, time)?;
        tx.commit()?;

        Ok(())
    }

    /// Record `text` for `tag` with an explicit timestamp
    pub fn insert_at(&self, tag: &str, text: &str, timestamp: DateTime<Utc>) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            debug!(tag, "ignoring blank history value");
            return Ok(());
        }

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        Self::upsert(&tx, tag, text, timestamp.timestamp_millis())?;
        tx.commit()?;

        Ok(())
    }

    fn upsert(conn: &Connection, tag: &str, text: &str, time: i64) -> Result<()> {
        let existing: Option<EntryId> = conn
            .query_row(
                "SELECT id FROM history WHERE tag = ?1 AND text = ?2 LIMIT 1",
                params![tag, text],
                |row| row.get(0),
            )
            .optional()?;

        match existing {
            Some(id) => {
                conn.execute(
                    "UPDATE history SET time = ?1 WHERE id = ?2",
                    params![time, id],
                )?;
                debug!(tag, %id, "refreshed history entry");
            }
            None => {
                conn.execute(
                    "INSERT INTO history (tag, text, time) VALUES (?1, ?2, ?3)",
                    params![tag, text, time],
                )?;
                debug!(tag, id = conn.last_insert_rowid(), "inserted history entry");
            }
        }

        Ok(())
    }

    /// All stored values for `tag`, most recent first
    ///
    /// No cap is applied here; the caller decides how many to show.
    #[must_use = "Query results should be used"]
    pub fn query_by_tag(&self, tag: &str) -> Result<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT text FROM history
             WHERE tag = ?1
             ORDER BY time DESC, id DESC",
        )?;

        let texts = stmt
            .query_map(params![tag], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        debug!(tag, count = texts.len(), "read history");
        Ok(texts)
    }

    /// Full entries for `tag`, most recent first
    #[must_use = "Query results should be used"]
    pub fn entries_for_tag(&self, tag: &str) -> Result<Vec<HistoryEntry>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, tag, text, time FROM history
             WHERE tag = ?1
             ORDER BY time DESC, id DESC",
        )?;

        let entries = stmt
            .query_map(params![tag], |row| {
                Ok(HistoryEntry {
                    id: row.get(0)?,
                    tag: row.get(1)?,
                    text: row.get(2)?,
                    timestamp_ms: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }

    /// Delete the history of one tag, or of every tag when `tag` is `None`
    ///
    /// Returns the number of removed entries.
    pub fn clear(&self, tag: Option<&str>) -> Result<usize> {
        let conn = self.connect()?;
        let removed = match tag {
            Some(tag) => conn.execute("DELETE FROM history WHERE tag = ?1", params![tag])?,
            None => conn.execute("DELETE FROM history", [])?,
        };

        debug!(tag = tag.unwrap_or("*"), removed, "cleared history");
        Ok(removed)
    }

    /// Delete a single value from a tag's history
    ///
    /// Returns whether an entry was removed.
    pub fn remove(&self, tag: &str, text: &str) -> Result<bool> {
        let conn = self.connect()?;
        let removed = conn.execute(
            "DELETE FROM history WHERE tag = ?1 AND text = ?2",
            params![tag, text.trim()],
        )?;
        Ok(removed > 0)
    }

    /// Number of entries stored for `tag`
    pub fn count(&self, tag: &str) -> Result<usize> {
        let conn = self.connect()?;
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM history WHERE tag = ?1",
            params![tag],
            |row| row.get(0),
        )?)
    }

    /// Every tag with stored history and its entry count, ordered by tag
    pub fn tags(&self) -> Result<Vec<(Tag, usize)>> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT tag, COUNT(*) FROM history GROUP BY tag ORDER BY tag")?;

        let tags = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(tags)
    }

    /// Get store statistics
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.connect()?;

        let (total_entries, oldest, newest): (usize, Option<i64>, Option<i64>) = conn
            .query_row(
                "SELECT COUNT(*), MIN(time), MAX(time) FROM history",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;

        let total_tags: usize =
            conn.query_row("SELECT COUNT(DISTINCT tag) FROM history", [], |row| {
                row.get(0)
            })?;

        Ok(StoreStats {
            total_entries,
            total_tags,
            oldest_entry: oldest.and_then(DateTime::from_timestamp_millis),
            newest_entry: newest.and_then(DateTime::from_timestamp_millis),
        })
    }
}
