//! Background daily triggers for the analysis refresh and the entry
//! reminder check.
//!
//! Each loop sleeps until its configured HH:MM local time, then performs a
//! two-phase wake-up: (1) persist the next trigger time, (2) do the work.
//! Rescheduling happens before any work so a crash or termination mid-run
//! never cancels future runs. Failures inside a run are logged and the loop
//! continues; the next day's trigger is the de-facto retry.

use crate::ai::client::ChatClient;
use crate::config::{parse_hhmm, Config};
use crate::constants::REMINDER_MESSAGE;
use crate::dates::format_compact;
use crate::db::entries::has_entry_for_date;
use crate::db::snapshots::set_meta;
use crate::db::Database;
use crate::errors::{AppError, AppResult};
use crate::ops::refresh::{refresh_if_stale, RefreshOutcome};
use chrono::{DateTime, Duration as ChronoDuration, Local, LocalResult, NaiveTime, TimeZone};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Meta key holding the persisted next analysis trigger time.
pub const META_NEXT_REFRESH_AT: &str = "next_refresh_at";
/// Meta key holding the persisted next reminder trigger time.
pub const META_NEXT_REMINDER_AT: &str = "next_reminder_at";

/// Computes the next local occurrence of a daily HH:MM trigger after `now`.
fn next_occurrence(now: DateTime<Local>, time: NaiveTime) -> AppResult<DateTime<Local>> {
    let today = now.date_naive();

    let candidate_today = match Local.from_local_datetime(&today.and_time(time)) {
        LocalResult::Single(datetime) => datetime,
        // The trigger time doesn't exist today (DST gap); fall through to
        // tomorrow's occurrence.
        _ => now - ChronoDuration::seconds(1),
    };

    if candidate_today > now {
        return Ok(candidate_today);
    }

    let tomorrow = today + ChronoDuration::days(1);
    Local
        .from_local_datetime(&tomorrow.and_time(time))
        .single()
        .ok_or_else(|| AppError::Schedule("Failed to convert next trigger time".to_string()))
}

/// Computes the delay until the next occurrence of a daily HH:MM trigger.
///
/// # Errors
///
/// Returns an error if the trigger string is not valid HH:MM or the local
/// time conversion fails.
pub fn next_run_delay(trigger_time: &str) -> AppResult<Duration> {
    let time = parse_hhmm(trigger_time)?;
    let now = Local::now();
    let next = next_occurrence(now, time)?;

    (next - now)
        .to_std()
        .map_err(|e| AppError::Schedule(format!("Failed to compute trigger delay: {}", e)))
}

/// Persists the next occurrence of a trigger under the given meta key.
///
/// This is phase one of every wake-up and runs before any work.
fn persist_next_trigger(db: &Database, key: &str, trigger_time: &str) -> AppResult<()> {
    let time = parse_hhmm(trigger_time)?;
    let next = next_occurrence(Local::now(), time)?;

    let conn = db.get_conn()?;
    set_meta(&conn, key, &next.to_rfc3339())?;

    info!("Next '{}' trigger persisted for {}", key, next.to_rfc3339());
    Ok(())
}

/// Runs the daily analysis-refresh loop.
///
/// Never returns under normal operation; errors inside a wake-up are logged
/// and the loop continues.
///
/// # Errors
///
/// Returns an error only if the configured trigger time is invalid.
pub async fn run_refresh_loop(
    db: &Database,
    client: &ChatClient,
    config: &Config,
) -> AppResult<()> {
    loop {
        let delay = next_run_delay(&config.refresh_time)?;
        info!(
            "Next analysis refresh in {} seconds (at {} local)",
            delay.as_secs(),
            config.refresh_time
        );
        sleep(delay).await;

        // Phase 1: reschedule first so a crash mid-run cannot cancel
        // future runs.
        if let Err(e) = persist_next_trigger(db, META_NEXT_REFRESH_AT, &config.refresh_time) {
            error!("Failed to persist next refresh trigger: {}", e);
        }

        // Phase 2: run the analysis.
        let today = Local::now().date_naive();
        match refresh_if_stale(db, client, today, config.refresh_policy).await {
            Ok(RefreshOutcome::Refreshed(_)) => {
                info!("Background analysis completed for {}", format_compact(today));
            }
            Ok(RefreshOutcome::AlreadyFresh(_)) => {
                info!("Background analysis skipped; snapshot already fresh");
            }
            Ok(RefreshOutcome::NoEntries) => {
                warn!("Background analysis aborted; no entries available");
            }
            Err(e) => {
                error!("Background analysis failed: {}", e);
            }
        }

        // Guard against re-firing within the same scheduled second
        sleep(Duration::from_secs(1)).await;
    }
}

/// Runs the daily reminder-check loop.
///
/// When no entry exists for the day the reminder is reported through the
/// log; actual notification delivery is an external concern.
///
/// # Errors
///
/// Returns an error only if the configured trigger time is invalid.
pub async fn run_reminder_loop(db: &Database, config: &Config) -> AppResult<()> {
    loop {
        let delay = next_run_delay(&config.reminder_time)?;
        info!(
            "Next reminder check in {} seconds (at {} local)",
            delay.as_secs(),
            config.reminder_time
        );
        sleep(delay).await;

        // Phase 1: reschedule tomorrow's check before doing any work.
        if let Err(e) = persist_next_trigger(db, META_NEXT_REMINDER_AT, &config.reminder_time) {
            error!("Failed to persist next reminder trigger: {}", e);
        }

        // Phase 2: check today's entry.
        let today = format_compact(Local::now().date_naive());
        match entry_missing_for(db, &today) {
            Ok(true) => warn!("{}", REMINDER_MESSAGE),
            Ok(false) => info!("Entry exists for {}; no reminder needed", today),
            Err(e) => error!("Reminder check failed: {}", e),
        }

        sleep(Duration::from_secs(1)).await;
    }
}

/// Reports whether today still needs an entry.
///
/// # Errors
///
/// Returns an error if the database cannot be read.
pub fn entry_missing_for(db: &Database, date: &str) -> AppResult<bool> {
    let conn = db.get_conn()?;
    Ok(!has_entry_for_date(&conn, date)?)
}
