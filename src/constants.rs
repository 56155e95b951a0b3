//! Constants used throughout the application.
//!
//! This module contains all constants used in the riji application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "riji";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A personal diary with AI-generated insights";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the riji data directory.
pub const ENV_VAR_RIJI_DIR: &str = "RIJI_DIR";
/// Environment variable for the chat-completion API base URL.
pub const ENV_VAR_API_BASE_URL: &str = "RIJI_API_BASE_URL";
/// Environment variable for the bearer API credential.
pub const ENV_VAR_API_KEY: &str = "RIJI_API_KEY";
/// Environment variable pointing at a file holding the bearer API credential.
pub const ENV_VAR_API_KEY_FILE: &str = "RIJI_API_KEY_FILE";
/// Environment variable for the chat-completion model name.
pub const ENV_VAR_MODEL: &str = "RIJI_MODEL";
/// Environment variable for the per-request timeout in seconds.
pub const ENV_VAR_TIMEOUT_SECONDS: &str = "RIJI_TIMEOUT_SECONDS";
/// Environment variable for the daily analysis trigger time (HH:MM).
pub const ENV_VAR_REFRESH_TIME: &str = "RIJI_REFRESH_TIME";
/// Environment variable for the daily reminder-check time (HH:MM).
pub const ENV_VAR_REMINDER_TIME: &str = "RIJI_REMINDER_TIME";
/// Environment variable for the refresh policy (best-effort | retry-incomplete).
pub const ENV_VAR_REFRESH_POLICY: &str = "RIJI_REFRESH_POLICY";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory name for diary data within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".riji";
/// Filename of the SQLite database inside the data directory.
pub const DATABASE_FILENAME: &str = "riji.db";

// Remote API Defaults
/// Default base URL of the chat-completion API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
/// Default chat-completion model.
pub const DEFAULT_MODEL: &str = "gpt-4";
/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;
/// Sampling temperature used for all analysis calls.
pub const ANALYSIS_TEMPERATURE: f32 = 0.7;

// Scheduling Defaults
/// Default local time at which the daily analysis runs.
pub const DEFAULT_REFRESH_TIME: &str = "00:00";
/// Default local time at which the entry-presence reminder check runs.
pub const DEFAULT_REMINDER_TIME: &str = "22:00";

// Date/Time Logic
/// Date format string for compact date format (YYYYMMDD) used throughout
/// entry dates, prompts, and the freshness marker.
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";
/// Number of days in the weekly analysis window.
pub const WEEK_WINDOW_DAYS: i64 = 7;

// Fixed User-Facing Strings
/// Feedback shown when the diary has no entries yet.
pub const WELCOME_MESSAGE: &str = "妳好，歡迎使用我們的日記！";
/// Feedback fallback when the remote analysis fails.
pub const FALLBACK_FEEDBACK: &str = "AI 回應失敗，請稍後再試";
/// Reminder text reported when no entry exists for today.
pub const REMINDER_MESSAGE: &str = "今天還沒有寫日記，記得記錄一下今天的心情！";
