//! Integration tests for the database layer through the pooled handle.

use riji::ai::parse::{DailyHappiness, Emotion, EmotionData, WordCount};
use riji::db::entries::{create_entry, delete_entry, fetch_all_entries, get_entry, update_entry};
use riji::db::snapshots::{get_meta, latest_snapshot, set_meta, upsert_snapshot, Snapshot};
use riji::db::Database;
use tempfile::TempDir;
use uuid::Uuid;

fn test_db(temp_dir: &TempDir) -> Database {
    let db = Database::open(&temp_dir.path().join("riji.db")).unwrap();
    db.initialize_schema().unwrap();
    db
}

#[test]
fn test_entry_lifecycle_through_pool() {
    let temp_dir = TempDir::new().unwrap();
    let db = test_db(&temp_dir);

    // Create through one connection
    let conn = db.get_conn().unwrap();
    let entry = create_entry(&conn, "20250310", "第一篇日記", Some(vec![1, 2, 3])).unwrap();
    drop(conn);

    // Read through another
    let conn = db.get_conn().unwrap();
    let fetched = get_entry(&conn, entry.id).unwrap().unwrap();
    assert_eq!(fetched, entry);

    // Update, then delete
    let mut updated = fetched;
    updated.text = "改寫後".to_string();
    update_entry(&conn, &updated).unwrap();
    assert_eq!(
        get_entry(&conn, entry.id).unwrap().unwrap().text,
        "改寫後"
    );

    delete_entry(&conn, entry.id).unwrap();
    assert!(get_entry(&conn, entry.id).unwrap().is_none());
}

#[test]
fn test_fetch_all_orders_newest_first() {
    let temp_dir = TempDir::new().unwrap();
    let db = test_db(&temp_dir);

    let conn = db.get_conn().unwrap();
    create_entry(&conn, "20250301", "old", None).unwrap();
    create_entry(&conn, "20250310", "new", None).unwrap();
    create_entry(&conn, "20250305", "middle", None).unwrap();

    let dates: Vec<String> = fetch_all_entries(&conn)
        .unwrap()
        .into_iter()
        .map(|entry| entry.date)
        .collect();
    assert_eq!(dates, vec!["20250310", "20250305", "20250301"]);
}

#[test]
fn test_snapshot_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("riji.db");

    let snapshot = Snapshot {
        day: "20250310".to_string(),
        feedback: "很棒的一天".to_string(),
        happiness: vec![DailyHappiness {
            date: "20250310".to_string(),
            happiness: 90.0,
        }],
        emotions: vec![EmotionData {
            emotion: Emotion::Calm,
            percentage: 100.0,
        }],
        top_words: vec![WordCount {
            word: "放鬆".to_string(),
            count: 2,
        }],
        selected_entry_id: Some(Uuid::new_v4()),
        complete: true,
    };

    {
        let db = Database::open(&db_path).unwrap();
        db.initialize_schema().unwrap();
        let conn = db.get_conn().unwrap();
        upsert_snapshot(&conn, &snapshot).unwrap();
    }

    // Reopen: the snapshot comes back whole, including the emotion enum
    let db = Database::open(&db_path).unwrap();
    let conn = db.get_conn().unwrap();
    let loaded = latest_snapshot(&conn).unwrap().unwrap();
    assert_eq!(loaded, snapshot);
}

#[test]
fn test_meta_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("riji.db");

    {
        let db = Database::open(&db_path).unwrap();
        db.initialize_schema().unwrap();
        let conn = db.get_conn().unwrap();
        set_meta(&conn, "next_refresh_at", "2025-03-11T00:00:00+08:00").unwrap();
    }

    let db = Database::open(&db_path).unwrap();
    let conn = db.get_conn().unwrap();
    assert_eq!(
        get_meta(&conn, "next_refresh_at").unwrap().as_deref(),
        Some("2025-03-11T00:00:00+08:00")
    );
}
