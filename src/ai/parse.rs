//! Defensive parsers for the model's free-text replies.
//!
//! The remote model's output format is not contractually guaranteed, so
//! every parser here is total: malformed lines are skipped, never turned
//! into errors, and a reply that parses to zero rows is a successful empty
//! result. A single garbled line must not abort the whole analysis.

use serde::{Deserialize, Serialize};

/// A per-day happiness score parsed from the weekly analysis reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyHappiness {
    /// Compact `yyyyMMdd` date token as emitted by the model.
    pub date: String,
    /// Score in the intended 0-100 range (not validated).
    pub happiness: f64,
}

/// An emotion category in the proportion analysis.
///
/// The model is instructed to use five fixed labels; anything else is
/// passed through unmodified rather than dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Emotion {
    Happy,
    Angry,
    Anxious,
    Sad,
    Calm,
    Other(String),
}

impl Emotion {
    /// Maps a reply label to its category.
    pub fn from_label(label: &str) -> Self {
        match label {
            "快樂" => Emotion::Happy,
            "生氣" => Emotion::Angry,
            "焦慮" => Emotion::Anxious,
            "悲傷" => Emotion::Sad,
            "平靜" => Emotion::Calm,
            other => Emotion::Other(other.to_string()),
        }
    }

    /// Returns the display label for the category.
    pub fn label(&self) -> &str {
        match self {
            Emotion::Happy => "快樂",
            Emotion::Angry => "生氣",
            Emotion::Anxious => "焦慮",
            Emotion::Sad => "悲傷",
            Emotion::Calm => "平靜",
            Emotion::Other(label) => label,
        }
    }
}

/// An emotion-proportion value parsed from the reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionData {
    pub emotion: Emotion,
    /// Intended to sum to ~100 across the set (not validated).
    pub percentage: f64,
}

/// A `(word, count)` pair as judged by the model, not locally computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u32,
}

/// Parses the weekly happiness reply.
///
/// A line matches when it contains exactly one `快樂指數:` delimiter
/// followed by a numeric value. The date token before the delimiter is
/// stripped of its literal `日期:` label and trailing comma. Lines that
/// don't parse are dropped, not substituted; input order is preserved.
pub fn parse_weekly_happiness(reply: &str) -> Vec<DailyHappiness> {
    reply
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split("快樂指數:").collect();
            if parts.len() != 2 {
                return None;
            }

            let happiness: f64 = parts[1].trim().parse().ok()?;

            let date_part = parts[0].replace("日期:", "");
            let date = date_part.trim().trim_matches(',').trim().to_string();

            Some(DailyHappiness { date, happiness })
        })
        .collect()
}

/// Parses the emotion-proportion reply.
///
/// A line matches when it is `<label>: <value>%` with exactly one colon;
/// the percent sign is stripped before the numeric parse. Unparseable lines
/// are dropped without affecting their siblings.
pub fn parse_emotion_proportion(reply: &str) -> Vec<EmotionData> {
    reply
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split(':').collect();
            if parts.len() != 2 {
                return None;
            }

            let label = parts[0].trim();
            let percentage: f64 = parts[1].trim().replace('%', "").parse().ok()?;

            Some(EmotionData {
                emotion: Emotion::from_label(label),
                percentage,
            })
        })
        .collect()
}

/// Parses the top-words reply.
///
/// A line matches when it has exactly two whitespace-separated tokens and
/// the second token is an integer count after stripping `次`.
pub fn parse_top_words(reply: &str) -> Vec<WordCount> {
    reply
        .lines()
        .filter_map(|line| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != 2 {
                return None;
            }

            let count: u32 = tokens[1].replace('次', "").parse().ok()?;

            Some(WordCount {
                word: tokens[0].to_string(),
                count,
            })
        })
        .collect()
}

/// Parses the selection reply: the whole trimmed text is the selected date.
///
/// Matching the token against actual entries (and yielding "no selection"
/// when nothing matches) is the orchestrator's concern.
pub fn parse_selected_date(reply: &str) -> String {
    reply.trim().to_string()
}
