//! Analysis snapshot persistence and the freshness marker.
//!
//! A snapshot is the joined result of one day's five analyses. It is
//! serialized into a single composite payload and written with one
//! statement, so no reader can observe a freshness marker without its
//! snapshot or a half-updated snapshot. The row with the greatest day is the
//! current snapshot; its `day` column is the freshness marker.

use crate::ai::parse::{DailyHappiness, EmotionData, WordCount};
use crate::errors::{AppError, AppResult, DatabaseError};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Version of the serialized snapshot payload.
///
/// Rows carrying a different version are treated as absent, which makes the
/// next trigger recompute rather than misread an old shape.
pub const SNAPSHOT_VERSION: i32 = 1;

/// The joined result of one orchestrator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Calendar day (compact `yyyyMMdd`) the snapshot was computed for.
    pub day: String,
    /// Counselor-style feedback text, or the fixed fallback on failure.
    pub feedback: String,
    /// Per-day happiness scores parsed from the weekly analysis.
    pub happiness: Vec<DailyHappiness>,
    /// Emotion proportions parsed from the weekly analysis.
    pub emotions: Vec<EmotionData>,
    /// Most frequent words as judged by the model.
    pub top_words: Vec<WordCount>,
    /// Entry picked as the most positive of the month, if any.
    pub selected_entry_id: Option<Uuid>,
    /// Whether all five sub-analyses produced a successful call.
    ///
    /// An empty-but-successful parse still counts as success; only
    /// credential/transport failures clear this flag.
    pub complete: bool,
}

impl Snapshot {
    /// Aligns the weekly happiness values to a week-date list, oldest first.
    ///
    /// Days the model did not score are filled with 0. The parser never
    /// substitutes values; gap filling is this display-side concern.
    pub fn weekly_happiness_aligned(&self, week_dates: &[String]) -> Vec<DailyHappiness> {
        week_dates
            .iter()
            .map(|date| {
                self.happiness
                    .iter()
                    .find(|point| &point.date == date)
                    .cloned()
                    .unwrap_or_else(|| DailyHappiness {
                        date: date.clone(),
                        happiness: 0.0,
                    })
            })
            .collect()
    }
}

/// Writes a snapshot as the record for its day.
///
/// A single `INSERT OR REPLACE` persists the whole composite value - the
/// payload, completeness flag, and the day that doubles as the freshness
/// marker - atomically.
///
/// # Errors
///
/// Returns an error if serialization or the database operation fails.
pub fn upsert_snapshot(conn: &Connection, snapshot: &Snapshot) -> AppResult<()> {
    debug!("Persisting snapshot for day {}", snapshot.day);

    let payload = serde_json::to_string(snapshot)
        .map_err(|e| AppError::Diary(format!("Failed to serialize snapshot: {}", e)))?;

    conn.execute(
        r#"
        INSERT OR REPLACE INTO snapshots (day, version, complete, payload)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![snapshot.day, SNAPSHOT_VERSION, snapshot.complete, payload],
    )
    .map_err(DatabaseError::Sqlite)?;

    Ok(())
}

/// Returns the current snapshot: the row with the greatest day.
///
/// Returns `Ok(None)` when no snapshot exists or the stored version does not
/// match [`SNAPSHOT_VERSION`].
///
/// # Errors
///
/// Returns an error if the database operation or deserialization fails.
pub fn latest_snapshot(conn: &Connection) -> AppResult<Option<Snapshot>> {
    let row = conn
        .query_row(
            r#"
            SELECT version, payload
            FROM snapshots
            ORDER BY day DESC
            LIMIT 1
            "#,
            [],
            |row| Ok((row.get::<_, i32>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()
        .map_err(DatabaseError::Sqlite)?;

    let (version, payload) = match row {
        Some(row) => row,
        None => return Ok(None),
    };

    if version != SNAPSHOT_VERSION {
        debug!("Ignoring snapshot with version {}", version);
        return Ok(None);
    }

    let snapshot = serde_json::from_str(&payload)
        .map_err(|e| AppError::Diary(format!("Failed to deserialize snapshot: {}", e)))?;

    Ok(Some(snapshot))
}

/// Sets a scheduler metadata value.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn set_meta(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
        params![key, value],
    )
    .map_err(DatabaseError::Sqlite)?;

    Ok(())
}

/// Gets a scheduler metadata value.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn get_meta(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM meta WHERE key = ?1", params![key], |row| {
            row.get(0)
        })
        .optional()
        .map_err(DatabaseError::Sqlite)?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::parse::Emotion;
    use crate::db::schema::create_tables;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    fn sample_snapshot(day: &str) -> Snapshot {
        Snapshot {
            day: day.to_string(),
            feedback: "辛苦了，繼續加油！".to_string(),
            happiness: vec![DailyHappiness {
                date: day.to_string(),
                happiness: 80.0,
            }],
            emotions: vec![EmotionData {
                emotion: Emotion::Happy,
                percentage: 60.0,
            }],
            top_words: vec![WordCount {
                word: "開心".to_string(),
                count: 3,
            }],
            selected_entry_id: Some(Uuid::new_v4()),
            complete: true,
        }
    }

    #[test]
    fn test_upsert_and_latest_round_trip() {
        let conn = test_conn();

        let snapshot = sample_snapshot("20250310");
        upsert_snapshot(&conn, &snapshot).unwrap();

        let loaded = latest_snapshot(&conn).unwrap().unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_latest_snapshot_picks_greatest_day() {
        let conn = test_conn();

        upsert_snapshot(&conn, &sample_snapshot("20250309")).unwrap();
        upsert_snapshot(&conn, &sample_snapshot("20250310")).unwrap();
        upsert_snapshot(&conn, &sample_snapshot("20250301")).unwrap();

        let loaded = latest_snapshot(&conn).unwrap().unwrap();
        assert_eq!(loaded.day, "20250310");
    }

    #[test]
    fn test_replacing_same_day_keeps_one_row() {
        let conn = test_conn();

        let mut snapshot = sample_snapshot("20250310");
        upsert_snapshot(&conn, &snapshot).unwrap();
        snapshot.feedback = "updated".to_string();
        upsert_snapshot(&conn, &snapshot).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);

        let loaded = latest_snapshot(&conn).unwrap().unwrap();
        assert_eq!(loaded.feedback, "updated");
    }

    #[test]
    fn test_version_mismatch_is_absent() {
        let conn = test_conn();

        upsert_snapshot(&conn, &sample_snapshot("20250310")).unwrap();
        conn.execute("UPDATE snapshots SET version = 0", []).unwrap();

        assert!(latest_snapshot(&conn).unwrap().is_none());
    }

    #[test]
    fn test_weekly_happiness_aligned_fills_gaps_with_zero() {
        let snapshot = Snapshot {
            happiness: vec![
                DailyHappiness {
                    date: "20250305".to_string(),
                    happiness: 70.0,
                },
                DailyHappiness {
                    date: "20250307".to_string(),
                    happiness: 55.0,
                },
            ],
            ..sample_snapshot("20250310")
        };

        let week: Vec<String> = vec![
            "20250304", "20250305", "20250306", "20250307", "20250308", "20250309", "20250310",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let aligned = snapshot.weekly_happiness_aligned(&week);
        assert_eq!(aligned.len(), 7);
        assert_eq!(aligned[0].happiness, 0.0);
        assert_eq!(aligned[1].happiness, 70.0);
        assert_eq!(aligned[3].happiness, 55.0);
        assert_eq!(aligned[6].happiness, 0.0);

        // Order follows the week list, not the parse order
        let dates: Vec<_> = aligned.iter().map(|p| p.date.clone()).collect();
        assert_eq!(dates, week);
    }

    #[test]
    fn test_meta_round_trip() {
        let conn = test_conn();

        assert!(get_meta(&conn, "next_refresh_at").unwrap().is_none());
        set_meta(&conn, "next_refresh_at", "20250311T00:00").unwrap();
        assert_eq!(
            get_meta(&conn, "next_refresh_at").unwrap().as_deref(),
            Some("20250311T00:00")
        );

        set_meta(&conn, "next_refresh_at", "20250312T00:00").unwrap();
        assert_eq!(
            get_meta(&conn, "next_refresh_at").unwrap().as_deref(),
            Some("20250312T00:00")
        );
    }
}
