//! Date handling for diary entries and analysis windows.
//!
//! Entry dates are compact `yyyyMMdd` strings throughout the application: in
//! the database, in prompts sent to the model, in the model's replies, and in
//! the snapshot freshness marker. This module provides the conversions and
//! the two analysis windows (trailing week, current calendar month).

use crate::constants::{DATE_FORMAT_COMPACT, WEEK_WINDOW_DAYS};
use chrono::{Datelike, Duration, NaiveDate};

/// Formats a date as a compact `yyyyMMdd` string.
pub fn format_compact(date: NaiveDate) -> String {
    date.format(DATE_FORMAT_COMPACT).to_string()
}

/// Parses a compact `yyyyMMdd` string into a date.
///
/// Returns `None` for strings that are not valid compact dates.
pub fn parse_compact(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT_COMPACT).ok()
}

/// Returns the trailing 7 calendar days ending at `today`, oldest first.
///
/// This is the membership list for the weekly analysis window: an entry is in
/// the window when its date string appears in this list. The display layer
/// also uses it to align happiness values and fill missing days.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use riji::dates::all_week_dates;
///
/// let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
/// let week = all_week_dates(today);
/// assert_eq!(week.len(), 7);
/// assert_eq!(week.first().unwrap(), "20250304");
/// assert_eq!(week.last().unwrap(), "20250310");
/// ```
pub fn all_week_dates(today: NaiveDate) -> Vec<String> {
    (0..WEEK_WINDOW_DAYS)
        .rev()
        .map(|offset| format_compact(today - Duration::days(offset)))
        .collect()
}

/// Reports whether a compact date string falls in the same calendar month as
/// `today`.
///
/// The monthly window is calendar-component equality (year and month), not a
/// rolling 30-day window; on the 1st of a month it contains only that day's
/// entries. Unparseable date strings are never in the window.
pub fn in_current_month(date_str: &str, today: NaiveDate) -> bool {
    match parse_compact(date_str) {
        Some(date) => date.year() == today.year() && date.month() == today.month(),
        None => false,
    }
}
