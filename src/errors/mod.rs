//! Error handling utilities for the riji application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.

use thiserror::Error;

/// Represents specific error cases that can occur during database operations.
///
/// # Examples
///
/// ```
/// use riji::errors::DatabaseError;
///
/// let error = DatabaseError::NotFound("Entry with id 123 not found".to_string());
/// assert!(format!("{}", error).contains("not found"));
/// ```
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite database error.
    #[error("Database error: {0}\n\nIf you're seeing 'file is not a database' errors, the database file may be corrupted or not a riji database.")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}\n\nThis may indicate database connection issues. Try closing other riji instances.")]
    Pool(#[from] r2d2::Error),

    /// Requested entry not found in database.
    #[error("Entry not found: {0}")]
    NotFound(String),
}

/// Represents specific error cases that can occur during AI operations.
///
/// This enum provides detailed, contextual error information for different failure
/// modes when calling the remote chat-completion API. Per the partial-success
/// policy, a reply that parses to zero rows is *not* an error — these variants
/// cover only credential and transport/shape failures.
///
/// # Examples
///
/// ```
/// use riji::errors::AIError;
///
/// let error = AIError::InvalidResponse("HTTP 500".to_string());
/// assert!(format!("{}", error).contains("HTTP 500"));
/// ```
#[derive(Debug, Error)]
pub enum AIError {
    /// The API credential has not been resolved.
    #[error("API credential is not available. Set RIJI_API_KEY (or RIJI_API_KEY_FILE) and try again.")]
    CredentialNotReady,

    /// Transport failure, non-2xx status, or undecodable response payload.
    #[error("Invalid response from chat-completion API: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    ///
    /// This variant automatically converts from `std::io::Error` through the `From` trait.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors in diary entry logic (e.g., invalid date formats).
    #[error("Diary logic error: {0}")]
    Diary(String),

    /// Errors in refresh scheduling (e.g., invalid HH:MM trigger times).
    #[error("Schedule error: {0}")]
    Schedule(String),

    /// Errors related to database operations.
    ///
    /// This variant uses a dedicated DatabaseError type to provide detailed
    /// information about what went wrong with database operations.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Errors related to AI operations.
    ///
    /// This variant uses a dedicated AIError type to provide detailed
    /// information about what went wrong with chat-completion API interactions.
    #[error("AI error: {0}")]
    AI(#[from] AIError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// This type alias is used throughout the application to represent operations
/// that may fail with an `AppError`.
///
/// # Examples
///
/// ```
/// use riji::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     // Operation that could fail
///     if false {
///         return Err(AppError::Diary("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
