//! Command-line interface for the riji application.

use crate::constants::{APP_DESCRIPTION, APP_NAME, DATE_FORMAT_COMPACT};
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// A personal diary with AI-generated insights
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION)]
#[command(author, version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a new diary entry
    Add {
        /// Entry date (YYYY-MM-DD or YYYYMMDD); defaults to today
        #[arg(short = 'd', long)]
        date: Option<String>,
        /// Entry text
        text: String,
        /// Path of a photo to embed
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// List all entries, newest first
    List,
    /// Show one entry in full
    Show {
        /// Entry id
        id: String,
    },
    /// Edit an entry's text or photo in place
    Edit {
        /// Entry id
        id: String,
        /// Replacement text
        #[arg(long)]
        text: Option<String>,
        /// Path of a replacement photo
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete an entry
    Delete {
        /// Entry id
        id: String,
    },
    /// Show today's AI insights, refreshing them if stale
    Insights {
        /// Re-run the analysis even if today's snapshot is fresh
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Fetch a short encouragement message for today
    Today,
    /// Run the background daily-refresh and reminder loops
    Daemon,
}

/// Parses a user-supplied entry date into the compact `yyyyMMdd` form.
///
/// Accepts both `YYYY-MM-DD` and `YYYYMMDD`.
///
/// # Errors
///
/// Returns `AppError::Diary` if the string is not a valid date in either
/// format.
pub fn parse_entry_date(date_str: &str) -> AppResult<String> {
    // Try parsing in YYYY-MM-DD format first, then YYYYMMDD
    NaiveDate::from_str(date_str)
        .or_else(|_| NaiveDate::parse_from_str(date_str, DATE_FORMAT_COMPACT))
        .map(|date| date.format(DATE_FORMAT_COMPACT).to_string())
        .map_err(|_| {
            AppError::Diary(format!(
                "Invalid date '{}'. Expected YYYY-MM-DD or YYYYMMDD",
                date_str
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_command() {
        let cli = Cli::parse_from(vec!["riji", "add", "今天很開心", "--date", "20250310"]);
        match cli.command {
            Commands::Add { date, text, image } => {
                assert_eq!(date, Some("20250310".to_string()));
                assert_eq!(text, "今天很開心");
                assert!(image.is_none());
            }
            other => panic!("Expected Add, got {:?}", other),
        }
    }

    #[test]
    fn test_insights_force_flag() {
        let cli = Cli::parse_from(vec!["riji", "insights"]);
        match cli.command {
            Commands::Insights { force } => assert!(!force),
            other => panic!("Expected Insights, got {:?}", other),
        }

        let cli = Cli::parse_from(vec!["riji", "insights", "--force"]);
        match cli.command {
            Commands::Insights { force } => assert!(force),
            other => panic!("Expected Insights, got {:?}", other),
        }
    }

    #[test]
    fn test_verbose_flag_is_global() {
        let cli = Cli::parse_from(vec!["riji", "list", "-v"]);
        assert!(cli.verbose);

        let cli = Cli::parse_from(vec!["riji", "list"]);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_entry_date_both_formats() {
        assert_eq!(parse_entry_date("2025-03-10").unwrap(), "20250310");
        assert_eq!(parse_entry_date("20250310").unwrap(), "20250310");
    }

    #[test]
    fn test_parse_entry_date_invalid() {
        assert!(parse_entry_date("03/10/2025").is_err());
        assert!(parse_entry_date("20251341").is_err());
        assert!(parse_entry_date("").is_err());
    }
}
