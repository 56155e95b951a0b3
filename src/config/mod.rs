//! Configuration management for the riji application.
//!
//! This module handles loading and validating configuration settings from
//! environment variables, with sensible defaults. It covers the data
//! directory, the chat-completion API endpoint and credential, and the daily
//! trigger times for the background scheduler.
//!
//! # Environment Variables
//!
//! - `RIJI_DIR`: Path to the data directory (defaults to ~/.riji)
//! - `RIJI_API_BASE_URL`: Chat-completion API base URL
//! - `RIJI_API_KEY`: Bearer credential for the API
//! - `RIJI_API_KEY_FILE`: File holding the bearer credential (fallback)
//! - `RIJI_MODEL`: Chat-completion model name
//! - `RIJI_TIMEOUT_SECONDS`: Per-request timeout
//! - `RIJI_REFRESH_TIME`: Daily analysis trigger time, HH:MM local
//! - `RIJI_REMINDER_TIME`: Daily reminder-check time, HH:MM local
//! - `RIJI_REFRESH_POLICY`: `best-effort` or `retry-incomplete`

use crate::constants::{
    DATABASE_FILENAME, DEFAULT_API_BASE_URL, DEFAULT_DATA_SUBDIR, DEFAULT_MODEL,
    DEFAULT_REFRESH_TIME, DEFAULT_REMINDER_TIME, DEFAULT_TIMEOUT_SECONDS, ENV_VAR_API_BASE_URL,
    ENV_VAR_API_KEY, ENV_VAR_API_KEY_FILE, ENV_VAR_HOME, ENV_VAR_MODEL, ENV_VAR_REFRESH_POLICY,
    ENV_VAR_REFRESH_TIME, ENV_VAR_REMINDER_TIME, ENV_VAR_RIJI_DIR, ENV_VAR_TIMEOUT_SECONDS,
};
use crate::errors::{AppError, AppResult};
use chrono::NaiveTime;
use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

/// Policy for treating a partially failed analysis snapshot.
///
/// The orchestrator never fails the whole barrier when individual
/// sub-analyses fail; this policy decides whether such a partial snapshot
/// still counts as "fresh" for the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// A partial snapshot is fresh; the user is never re-blocked. This is
    /// the default.
    BestEffort,
    /// A snapshot with any defaulted slot is stale; the next non-forced
    /// trigger re-runs the whole analysis.
    RetryIncomplete,
}

impl FromStr for RefreshPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "best-effort" => Ok(RefreshPolicy::BestEffort),
            "retry-incomplete" => Ok(RefreshPolicy::RetryIncomplete),
            other => Err(AppError::Config(format!(
                "Unknown refresh policy '{}'. Expected 'best-effort' or 'retry-incomplete'",
                other
            ))),
        }
    }
}

/// Configuration for the riji application.
///
/// This struct holds the settings needed by every component: where the
/// database lives, how to reach the chat-completion API, and when the daily
/// background triggers fire.
#[derive(Clone)]
pub struct Config {
    /// Directory where the diary database is stored.
    pub data_dir: PathBuf,

    /// Base URL of the chat-completion API.
    pub api_base_url: String,

    /// Bearer credential for the API, resolved once at load time.
    ///
    /// `None` when neither `RIJI_API_KEY` nor `RIJI_API_KEY_FILE` yielded a
    /// value; AI calls then fail with `AIError::CredentialNotReady`.
    pub api_key: Option<String>,

    /// Chat-completion model name.
    pub model: String,

    /// Per-request timeout in seconds for remote calls.
    pub timeout_seconds: u64,

    /// Local time (HH:MM) at which the daily analysis runs.
    pub refresh_time: String,

    /// Local time (HH:MM) at which the entry-presence reminder check runs.
    pub reminder_time: String,

    /// Freshness policy for partially failed snapshots.
    pub refresh_policy: RefreshPolicy,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &self.data_dir)
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("refresh_time", &self.refresh_time)
            .field("reminder_time", &self.reminder_time)
            .field("refresh_policy", &self.refresh_policy)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The data directory path is expanded using `shellexpand` to handle `~`
    /// and environment variable references. The API credential is resolved
    /// once, preferring `RIJI_API_KEY` over `RIJI_API_KEY_FILE`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The data directory path expansion fails or is empty
    /// - The timeout is not a positive integer
    /// - A trigger time is not valid HH:MM
    /// - The refresh policy string is unrecognized
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use riji::Config;
    ///
    /// match Config::load() {
    ///     Ok(config) => println!("Loaded config for model: {}", config.model),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load() -> AppResult<Self> {
        // Get data directory from RIJI_DIR env var, fallback to ~/.riji
        let data_dir_str = env::var(ENV_VAR_RIJI_DIR).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_else(|_| "".to_string());
            format!("{}/{}", home, DEFAULT_DATA_SUBDIR)
        });

        // Expand the path (handles ~ and environment variables)
        let expanded_path = shellexpand::full(&data_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;

        let data_dir = PathBuf::from(expanded_path.into_owned());

        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        let api_base_url =
            env::var(ENV_VAR_API_BASE_URL).unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let api_key = resolve_api_key()?;

        let model = env::var(ENV_VAR_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout_seconds = match env::var(ENV_VAR_TIMEOUT_SECONDS) {
            Ok(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|&secs| secs > 0)
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "{} must be a positive integer, got '{}'",
                        ENV_VAR_TIMEOUT_SECONDS, raw
                    ))
                })?,
            Err(_) => DEFAULT_TIMEOUT_SECONDS,
        };

        let refresh_time =
            env::var(ENV_VAR_REFRESH_TIME).unwrap_or_else(|_| DEFAULT_REFRESH_TIME.to_string());
        parse_hhmm(&refresh_time)?;

        let reminder_time =
            env::var(ENV_VAR_REMINDER_TIME).unwrap_or_else(|_| DEFAULT_REMINDER_TIME.to_string());
        parse_hhmm(&reminder_time)?;

        let refresh_policy = match env::var(ENV_VAR_REFRESH_POLICY) {
            Ok(raw) => raw.parse()?,
            Err(_) => RefreshPolicy::BestEffort,
        };

        Ok(Config {
            data_dir,
            api_base_url,
            api_key,
            model,
            timeout_seconds,
            refresh_time,
            reminder_time,
            refresh_policy,
        })
    }

    /// Returns the path of the SQLite database inside the data directory.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILENAME)
    }

    /// Ensures the data directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn ensure_data_dir(&self) -> AppResult<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

/// Resolves the API credential from the environment.
///
/// Prefers `RIJI_API_KEY`; falls back to reading `RIJI_API_KEY_FILE`.
/// Whitespace-only values are treated as absent. Credential distribution is
/// an external concern; this only picks up whatever was provisioned locally.
fn resolve_api_key() -> AppResult<Option<String>> {
    if let Ok(key) = env::var(ENV_VAR_API_KEY) {
        let key = key.trim().to_string();
        if !key.is_empty() {
            return Ok(Some(key));
        }
    }

    if let Ok(path) = env::var(ENV_VAR_API_KEY_FILE) {
        let contents = fs::read_to_string(&path).map_err(|e| {
            AppError::Config(format!("Failed to read API key file '{}': {}", path, e))
        })?;
        let key = contents.trim().to_string();
        if !key.is_empty() {
            return Ok(Some(key));
        }
    }

    Ok(None)
}

/// Parses an `HH:MM` trigger time into a `NaiveTime`.
///
/// # Errors
///
/// Returns `AppError::Config` if the string is not a valid 24-hour HH:MM time.
pub fn parse_hhmm(raw: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| AppError::Config(format!("Invalid HH:MM time: '{}'", raw)))
}
