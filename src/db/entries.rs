//! Entry CRUD operations.
//!
//! This module provides functions for creating, reading, updating, and
//! deleting diary entries. The repository is the exclusive owner of entry
//! rows; the orchestrator consumes them read-only.

use crate::errors::{AppResult, DatabaseError};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;
use uuid::Uuid;

/// Represents a diary entry.
///
/// The `date` is a compact `yyyyMMdd` string and is not unique - multiple
/// entries can share a day. At most one embedded image is persisted per
/// entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DiaryEntry {
    pub id: Uuid,
    pub date: String,
    pub text: String,
    pub image: Option<Vec<u8>>,
}

/// Inserts a new diary entry and returns it.
///
/// The entry id is generated here and is immutable for the entry's lifetime.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `date` - Compact `yyyyMMdd` date string
/// * `text` - Entry content (may be empty)
/// * `image` - Optional embedded image bytes
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn create_entry(
    conn: &Connection,
    date: &str,
    text: &str,
    image: Option<Vec<u8>>,
) -> AppResult<DiaryEntry> {
    let id = Uuid::new_v4();
    debug!("Creating entry {} for date {}", id, date);

    conn.execute(
        r#"
        INSERT INTO entries (id, date, text, image)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![id.to_string(), date, text, image],
    )
    .map_err(DatabaseError::Sqlite)?;

    Ok(DiaryEntry {
        id,
        date: date.to_string(),
        text: text.to_string(),
        image,
    })
}

/// Retrieves all diary entries sorted by date descending.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn fetch_all_entries(conn: &Connection) -> AppResult<Vec<DiaryEntry>> {
    debug!("Fetching all entries");

    let mut stmt = conn
        .prepare(
            r#"
            SELECT id, date, text, image
            FROM entries
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .map_err(DatabaseError::Sqlite)?;

    let entries = stmt
        .query_map([], row_to_entry)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    debug!("Fetched {} entries", entries.len());
    Ok(entries)
}

/// Retrieves a single entry by id.
///
/// Returns `Ok(None)` if no entry exists with the given id.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn get_entry(conn: &Connection, id: Uuid) -> AppResult<Option<DiaryEntry>> {
    let result = conn
        .query_row(
            r#"
            SELECT id, date, text, image
            FROM entries
            WHERE id = ?1
            "#,
            params![id.to_string()],
            row_to_entry,
        )
        .optional()
        .map_err(DatabaseError::Sqlite)?;

    Ok(result)
}

/// Updates an entry's text and image in place.
///
/// The id and date are immutable once created.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if no entry exists with the given id.
pub fn update_entry(conn: &Connection, entry: &DiaryEntry) -> AppResult<()> {
    debug!("Updating entry {}", entry.id);

    let changed = conn
        .execute(
            r#"
            UPDATE entries
            SET text = ?2, image = ?3, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?1
            "#,
            params![entry.id.to_string(), entry.text, entry.image],
        )
        .map_err(DatabaseError::Sqlite)?;

    if changed == 0 {
        return Err(DatabaseError::NotFound(entry.id.to_string()).into());
    }

    Ok(())
}

/// Deletes an entry by id.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if no entry exists with the given id.
pub fn delete_entry(conn: &Connection, id: Uuid) -> AppResult<()> {
    debug!("Deleting entry {}", id);

    let changed = conn
        .execute("DELETE FROM entries WHERE id = ?1", params![id.to_string()])
        .map_err(DatabaseError::Sqlite)?;

    if changed == 0 {
        return Err(DatabaseError::NotFound(id.to_string()).into());
    }

    Ok(())
}

/// Reports whether any entry exists for the given compact date.
///
/// Used by the reminder check to decide whether today still needs an entry.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn has_entry_for_date(conn: &Connection, date: &str) -> AppResult<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM entries WHERE date = ?1",
            params![date],
            |row| row.get(0),
        )
        .map_err(DatabaseError::Sqlite)?;

    Ok(count > 0)
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<DiaryEntry> {
    let id_str: String = row.get(0)?;
    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(DiaryEntry {
        id,
        date: row.get(1)?,
        text: row.get(2)?,
        image: row.get(3)?,
    })
}
