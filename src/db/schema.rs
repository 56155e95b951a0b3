//! Database schema definitions and initialization.
//!
//! This module defines the SQLite schema for diary entries, analysis
//! snapshots, and scheduler metadata.

use crate::errors::{AppResult, DatabaseError};
use rusqlite::Connection;
use tracing::debug;

/// Current schema version.
///
/// Increment this whenever schema changes are made to support future migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Creates all database tables and indexes.
///
/// This function is idempotent - it uses `CREATE TABLE IF NOT EXISTS`
/// so it's safe to call multiple times.
///
/// # Tables
///
/// - `entries`: Diary entries (date, text, optional image)
/// - `snapshots`: One analysis snapshot per day, serialized as a single
///   composite payload
/// - `meta`: Key-value scheduler state (e.g. the next background trigger)
///
/// # Errors
///
/// Returns an error if any DDL statement fails.
pub fn create_tables(conn: &Connection) -> AppResult<()> {
    debug!("Creating database tables");

    // Entries table: one row per diary entry. Dates are compact yyyyMMdd
    // strings and are not unique (multiple entries can share a day).
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            text TEXT NOT NULL DEFAULT '',
            image BLOB,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date DESC);
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    // Snapshots table: the joined result of one day's analyses, written as
    // one row so a partially written snapshot cannot be observed. The row
    // with the greatest day is the current snapshot; its day is the
    // freshness marker.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS snapshots (
            day TEXT PRIMARY KEY,
            version INTEGER NOT NULL,
            complete INTEGER NOT NULL DEFAULT 0,
            payload TEXT NOT NULL,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    // Meta table: scheduler state such as the persisted next trigger time.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    debug!("Database tables created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();

        // All three tables exist
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('entries', 'snapshots', 'meta')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }
}
