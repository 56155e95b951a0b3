//! The daily refresh state machine: Stale vs Fresh.
//!
//! A snapshot is fresh when its day equals "today" (pure string equality
//! against an externally supplied date); a new calendar day implicitly makes
//! it stale. The non-forced trigger is shared by the foreground `insights`
//! command and the background wake-up; the forced override bypasses the
//! freshness check entirely.

use crate::ai::client::ChatClient;
use crate::config::RefreshPolicy;
use crate::dates::format_compact;
use crate::db::entries::fetch_all_entries;
use crate::db::snapshots::{latest_snapshot, upsert_snapshot, Snapshot};
use crate::db::Database;
use crate::errors::AppResult;
use crate::ops::analyze::analyze;
use chrono::NaiveDate;
use tracing::{info, warn};

/// Result of a refresh trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The analysis ran and its snapshot was persisted.
    Refreshed(Snapshot),
    /// Today's snapshot already exists; the cached value is returned and no
    /// remote call was made.
    AlreadyFresh(Snapshot),
    /// No entry data was available; nothing ran and the freshness marker is
    /// unchanged, so the next eligible trigger will retry.
    NoEntries,
}

/// Reports whether a snapshot is fresh for `today` under the given policy.
fn is_fresh(snapshot: &Snapshot, today: &str, policy: RefreshPolicy) -> bool {
    if snapshot.day != today {
        return false;
    }
    match policy {
        RefreshPolicy::BestEffort => true,
        RefreshPolicy::RetryIncomplete => snapshot.complete,
    }
}

/// Runs the analysis if no fresh snapshot exists for `today`.
///
/// Idempotent within a calendar day: the remote analysis runs at most once,
/// and subsequent calls return the cached snapshot. With
/// [`RefreshPolicy::RetryIncomplete`], a snapshot carrying defaulted slots
/// does not count as fresh and the whole analysis re-runs.
///
/// # Errors
///
/// Returns an error if the database cannot be read or the snapshot cannot
/// be persisted. Remote failures do not surface here; they are downgraded
/// inside the barrier.
pub async fn refresh_if_stale(
    db: &Database,
    client: &ChatClient,
    today: NaiveDate,
    policy: RefreshPolicy,
) -> AppResult<RefreshOutcome> {
    let today_str = format_compact(today);

    let conn = db.get_conn()?;
    if let Some(snapshot) = latest_snapshot(&conn)? {
        if is_fresh(&snapshot, &today_str, policy) {
            info!("Snapshot for {} is fresh; skipping analysis", today_str);
            return Ok(RefreshOutcome::AlreadyFresh(snapshot));
        }
    }

    let entries = fetch_all_entries(&conn)?;
    if entries.is_empty() {
        warn!("No entries available; refresh aborted");
        return Ok(RefreshOutcome::NoEntries);
    }
    // Release the pooled connection before suspending on remote calls
    drop(conn);

    info!("Running analysis for {} ({} entries)", today_str, entries.len());
    let snapshot = analyze(client, &entries, today).await;

    let conn = db.get_conn()?;
    upsert_snapshot(&conn, &snapshot)?;
    info!("Snapshot for {} persisted", today_str);

    Ok(RefreshOutcome::Refreshed(snapshot))
}

/// Runs the analysis unconditionally, ignoring the freshness marker.
///
/// Used for manual refresh and debugging. Unlike the non-forced trigger, an
/// empty diary does not abort: the orchestrator's welcome short-circuit
/// produces the snapshot instead.
///
/// # Errors
///
/// Returns an error if the database cannot be read or the snapshot cannot
/// be persisted.
pub async fn force_refresh(
    db: &Database,
    client: &ChatClient,
    today: NaiveDate,
) -> AppResult<Snapshot> {
    let conn = db.get_conn()?;
    let entries = fetch_all_entries(&conn)?;
    drop(conn);

    info!(
        "Forced analysis for {} ({} entries)",
        format_compact(today),
        entries.len()
    );
    let snapshot = analyze(client, &entries, today).await;

    let conn = db.get_conn()?;
    upsert_snapshot(&conn, &snapshot)?;

    Ok(snapshot)
}
