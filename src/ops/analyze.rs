//! The analysis orchestrator: five concurrent sub-analyses joined into one
//! snapshot.
//!
//! Each sub-analysis builds its prompt from a window of entries, makes one
//! remote call, and parses the reply. [`analyze`] issues all five
//! concurrently and assembles the combined snapshot only after every one has
//! completed - a fan-out/fan-in barrier. An individual failure contributes
//! an empty or default value for its slot; it never fails the barrier.

use crate::ai::client::{ChatClient, Message};
use crate::ai::parse::{
    parse_emotion_proportion, parse_selected_date, parse_top_words, parse_weekly_happiness,
    DailyHappiness, EmotionData, WordCount,
};
use crate::ai::prompts;
use crate::constants::{ANALYSIS_TEMPERATURE, FALLBACK_FEEDBACK, WELCOME_MESSAGE};
use crate::dates::{all_week_dates, format_compact, in_current_month};
use crate::db::entries::DiaryEntry;
use crate::db::snapshots::Snapshot;
use crate::errors::AppResult;
use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Serializes entries as `日期<date>：<text>` lines for the analysis prompts.
fn combined_lines(entries: &[DiaryEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("日期{}：{}", entry.date, entry.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serializes entries as `日期: <date>，內容: <text>` lines for the
/// selection prompt.
fn combined_selection_lines(entries: &[DiaryEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("日期: {}，內容: {}", entry.date, entry.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serializes entry texts joined by spaces for the top-words prompt.
fn combined_texts(entries: &[DiaryEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

async fn complete(
    client: &ChatClient,
    messages: Vec<Message>,
    max_tokens: u32,
) -> AppResult<String> {
    client
        .complete(&messages, max_tokens, ANALYSIS_TEMPERATURE)
        .await
}

/// Generates the counselor-style feedback for the given entries.
///
/// # Errors
///
/// Returns an error if the remote call fails.
pub async fn analyze_feedback(client: &ChatClient, entries: &[DiaryEntry]) -> AppResult<String> {
    let messages = prompts::feedback_prompt(&combined_lines(entries));
    complete(client, messages, prompts::MAX_TOKENS_FEEDBACK).await
}

/// Scores each day's happiness for the given entries.
///
/// A reply with zero parseable lines is a successful empty result, distinct
/// from a failed call.
///
/// # Errors
///
/// Returns an error if the remote call fails.
pub async fn analyze_weekly_happiness(
    client: &ChatClient,
    entries: &[DiaryEntry],
) -> AppResult<Vec<DailyHappiness>> {
    let messages = prompts::weekly_happiness_prompt(&combined_lines(entries));
    let reply = complete(client, messages, prompts::MAX_TOKENS_HAPPINESS).await?;
    Ok(parse_weekly_happiness(&reply))
}

/// Computes the overall emotion proportions for the given entries.
///
/// # Errors
///
/// Returns an error if the remote call fails.
pub async fn analyze_emotion_proportion(
    client: &ChatClient,
    entries: &[DiaryEntry],
) -> AppResult<Vec<EmotionData>> {
    let messages = prompts::emotion_proportion_prompt(&combined_lines(entries));
    let reply = complete(client, messages, prompts::MAX_TOKENS_EMOTION).await?;
    Ok(parse_emotion_proportion(&reply))
}

/// Extracts the three most frequent words for the given entries.
///
/// # Errors
///
/// Returns an error if the remote call fails.
pub async fn analyze_top_words(
    client: &ChatClient,
    entries: &[DiaryEntry],
) -> AppResult<Vec<WordCount>> {
    let messages = prompts::top_words_prompt(&combined_texts(entries));
    let reply = complete(client, messages, prompts::MAX_TOKENS_TOP_WORDS).await?;
    Ok(parse_top_words(&reply))
}

/// Picks the most positive entry among the given entries.
///
/// The model replies with a bare date token; the matching entry is looked up
/// by exact date-string equality. No match yields `None`, not an error.
///
/// # Errors
///
/// Returns an error if the remote call fails.
pub async fn select_most_positive(
    client: &ChatClient,
    entries: &[DiaryEntry],
) -> AppResult<Option<Uuid>> {
    if entries.is_empty() {
        return Ok(None);
    }

    let messages = prompts::selection_prompt(&combined_selection_lines(entries));
    let reply = complete(client, messages, prompts::MAX_TOKENS_SELECTION).await?;
    let selected_date = parse_selected_date(&reply);

    let selected = entries
        .iter()
        .find(|entry| entry.date == selected_date)
        .map(|entry| entry.id);

    if selected.is_none() {
        debug!("Selection reply '{}' matched no entry", selected_date);
    }

    Ok(selected)
}

/// Runs all five sub-analyses concurrently and joins them into a snapshot.
///
/// # Windowing
///
/// Weekly happiness and emotion proportion consume the trailing 7 calendar
/// days (membership in the precomputed week-date list); feedback, top words,
/// and selection consume the current calendar month (component equality, not
/// a rolling 30 days).
///
/// # Failure semantics
///
/// The five calls are issued concurrently and the combined snapshot is
/// produced only after all five have completed. A failed call contributes an
/// empty or default value for its slot and clears the snapshot's `complete`
/// flag; the barrier itself never fails. With no entries at all, the fixed
/// welcome snapshot is returned without contacting the remote service.
pub async fn analyze(client: &ChatClient, entries: &[DiaryEntry], today: NaiveDate) -> Snapshot {
    let day = format_compact(today);

    if entries.is_empty() {
        info!("No entries yet; returning welcome snapshot");
        return Snapshot {
            day,
            feedback: WELCOME_MESSAGE.to_string(),
            happiness: Vec::new(),
            emotions: Vec::new(),
            top_words: Vec::new(),
            selected_entry_id: None,
            complete: true,
        };
    }

    let week_dates = all_week_dates(today);
    let week_entries: Vec<DiaryEntry> = entries
        .iter()
        .filter(|entry| week_dates.contains(&entry.date))
        .cloned()
        .collect();
    let month_entries: Vec<DiaryEntry> = entries
        .iter()
        .filter(|entry| in_current_month(&entry.date, today))
        .cloned()
        .collect();

    debug!(
        "Analyzing {} entries ({} in week window, {} in month window)",
        entries.len(),
        week_entries.len(),
        month_entries.len()
    );

    let (feedback, happiness, emotions, top_words, selected) = futures::join!(
        analyze_feedback(client, &month_entries),
        analyze_weekly_happiness(client, &week_entries),
        analyze_emotion_proportion(client, &week_entries),
        analyze_top_words(client, &month_entries),
        select_most_positive(client, &month_entries),
    );

    let complete = feedback.is_ok()
        && happiness.is_ok()
        && emotions.is_ok()
        && top_words.is_ok()
        && selected.is_ok();

    if !complete {
        warn!("One or more sub-analyses failed; snapshot will carry defaults");
    }

    Snapshot {
        day,
        feedback: feedback.unwrap_or_else(|e| {
            warn!("Feedback analysis failed: {}", e);
            FALLBACK_FEEDBACK.to_string()
        }),
        happiness: happiness.unwrap_or_else(|e| {
            warn!("Happiness analysis failed: {}", e);
            Vec::new()
        }),
        emotions: emotions.unwrap_or_else(|e| {
            warn!("Emotion analysis failed: {}", e);
            Vec::new()
        }),
        top_words: top_words.unwrap_or_else(|e| {
            warn!("Top-words analysis failed: {}", e);
            Vec::new()
        }),
        selected_entry_id: selected.unwrap_or_else(|e| {
            warn!("Selection failed: {}", e);
            None
        }),
        complete,
    }
}
