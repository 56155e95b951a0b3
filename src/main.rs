/*!
# riji - A Personal Diary with AI Insights

riji is a command-line diary. You write dated entries (text plus an
optional photo), browse them, and view a daily-refreshed set of
AI-generated insights produced by a remote chat-completion API.

This file contains the main application flow, coordinating the various
components to implement the diary functionality.

## Usage

```
riji <COMMAND>

Commands:
  add       Write a new diary entry
  list      List all entries, newest first
  show      Show one entry in full
  edit      Edit an entry's text or photo in place
  delete    Delete an entry
  insights  Show today's AI insights, refreshing them if stale
  today     Fetch a short encouragement message for today
  daemon    Run the background daily-refresh and reminder loops
```

## Configuration

The application is configured with environment variables; see
`riji::config` for the full list (`RIJI_DIR`, `RIJI_API_KEY`,
`RIJI_REFRESH_TIME`, ...).
*/

use chrono::Local;
use clap::Parser;
use riji::ai::ChatClient;
use riji::cli::{parse_entry_date, Cli, Commands};
use riji::config::Config;
use riji::constants::{DATE_FORMAT_COMPACT, FALLBACK_FEEDBACK, WELCOME_MESSAGE};
use riji::dates::all_week_dates;
use riji::db::entries::{
    create_entry, delete_entry, fetch_all_entries, get_entry, update_entry, DiaryEntry,
};
use riji::db::snapshots::Snapshot;
use riji::db::Database;
use riji::errors::{AppError, AppResult};
use riji::ops::daily_message;
use riji::ops::refresh::{force_refresh, refresh_if_stale, RefreshOutcome};
use std::fs;
use tracing::warn;
use uuid::Uuid;

/// The main entry point for the riji application.
///
/// This function coordinates the overall application flow:
/// 1. Parses command-line arguments
/// 2. Initializes logging
/// 3. Loads configuration and opens the database
/// 4. Dispatches the requested command
///
/// # Errors
///
/// This function can return various types of errors, including:
/// - Configuration errors (missing or invalid configuration)
/// - Database errors (cannot open or query the diary database)
/// - Diary logic errors (invalid dates or entry ids)
#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = Config::load()?;
    config.ensure_data_dir()?;

    let db = Database::open(&config.db_path())?;
    db.initialize_schema()?;

    match cli.command {
        Commands::Add { date, text, image } => {
            let date = match date {
                Some(raw) => parse_entry_date(&raw)?,
                None => Local::now()
                    .date_naive()
                    .format(DATE_FORMAT_COMPACT)
                    .to_string(),
            };
            let image = image.map(fs::read).transpose()?;

            let conn = db.get_conn()?;
            let entry = create_entry(&conn, &date, &text, image)?;
            println!("已儲存 {} 的日記（id: {}）", entry.date, entry.id);
        }

        Commands::List => {
            let conn = db.get_conn()?;
            let entries = fetch_all_entries(&conn)?;
            if entries.is_empty() {
                println!("目前還沒有日記");
            }
            for entry in entries {
                println!("{}", entry_summary(&entry));
            }
        }

        Commands::Show { id } => {
            let conn = db.get_conn()?;
            let entry = get_entry(&conn, parse_id(&id)?)?
                .ok_or_else(|| AppError::Diary(format!("No entry with id {}", id)))?;
            println!("{}", entry.date);
            println!("{}", entry.text);
            if let Some(image) = &entry.image {
                println!("[附圖 {} bytes]", image.len());
            }
        }

        Commands::Edit { id, text, image } => {
            let conn = db.get_conn()?;
            let mut entry = get_entry(&conn, parse_id(&id)?)?
                .ok_or_else(|| AppError::Diary(format!("No entry with id {}", id)))?;

            if let Some(text) = text {
                entry.text = text;
            }
            if let Some(path) = image {
                entry.image = Some(fs::read(path)?);
            }

            update_entry(&conn, &entry)?;
            println!("已更新 {} 的日記", entry.date);
        }

        Commands::Delete { id } => {
            let conn = db.get_conn()?;
            delete_entry(&conn, parse_id(&id)?)?;
            println!("已刪除");
        }

        Commands::Insights { force } => {
            let client = build_client(&config)?;
            let today = Local::now().date_naive();

            let snapshot = if force {
                force_refresh(&db, &client, today).await?
            } else {
                match refresh_if_stale(&db, &client, today, config.refresh_policy).await? {
                    RefreshOutcome::Refreshed(snapshot)
                    | RefreshOutcome::AlreadyFresh(snapshot) => snapshot,
                    RefreshOutcome::NoEntries => {
                        println!("{}", WELCOME_MESSAGE);
                        return Ok(());
                    }
                }
            };

            render_snapshot(&db, &snapshot)?;
        }

        Commands::Today => {
            let client = build_client(&config)?;
            match daily_message(&client).await {
                Ok(message) => println!("{}", message),
                Err(e) => {
                    warn!("Daily message failed: {}", e);
                    println!("{}", FALLBACK_FEEDBACK);
                }
            }
        }

        Commands::Daemon => {
            let client = build_client(&config)?;
            tokio::try_join!(
                riji::scheduler::run_refresh_loop(&db, &client, &config),
                riji::scheduler::run_reminder_loop(&db, &config),
            )?;
        }
    }

    Ok(())
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level defaults to `info`, or
/// `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_client(config: &Config) -> AppResult<ChatClient> {
    ChatClient::new(
        &config.api_base_url,
        config.api_key.clone(),
        &config.model,
        config.timeout_seconds,
    )
}

fn parse_id(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::Diary(format!("Invalid entry id '{}'", id)))
}

/// One-line summary of an entry for the list view.
fn entry_summary(entry: &DiaryEntry) -> String {
    let first_line = entry.text.lines().next().unwrap_or("");
    let marker = if entry.image.is_some() { " [附圖]" } else { "" };
    format!("{}  {}  {}{}", entry.id, entry.date, first_line, marker)
}

/// Prints the analysis snapshot.
fn render_snapshot(db: &Database, snapshot: &Snapshot) -> AppResult<()> {
    println!("=== {} 的 AI 分析 ===", snapshot.day);
    println!();
    println!("AI 回饋：");
    println!("{}", snapshot.feedback);

    // Align happiness values to the snapshot's week, filling gaps with 0
    let week = match riji::dates::parse_compact(&snapshot.day) {
        Some(day) => all_week_dates(day),
        None => Vec::new(),
    };
    if !week.is_empty() {
        println!();
        println!("一週快樂指數：");
        for point in snapshot.weekly_happiness_aligned(&week) {
            println!("  {}  {:>3.0}", point.date, point.happiness);
        }
    }

    if !snapshot.emotions.is_empty() {
        println!();
        println!("情緒比例：");
        for data in &snapshot.emotions {
            println!("  {}: {:.0}%", data.emotion.label(), data.percentage);
        }
    }

    if !snapshot.top_words.is_empty() {
        println!();
        println!("常用詞：");
        for word in &snapshot.top_words {
            println!("  {} {}次", word.word, word.count);
        }
    }

    if let Some(id) = snapshot.selected_entry_id {
        let conn = db.get_conn()?;
        if let Some(entry) = get_entry(&conn, id)? {
            println!();
            println!("重點回顧（{}）：", entry.date);
            println!("{}", entry.text);
        }
    }

    Ok(())
}
