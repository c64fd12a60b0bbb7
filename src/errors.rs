/*!
 * Error types for the vocabforge application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to external provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// The provider is not configured (missing API key)
    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Errors raised by the persistence store
#[derive(Error, Debug)]
pub enum StoreError {
    /// A word already exists (case-insensitive, non-deleted)
    #[error("word already exists: {0}")]
    DuplicateWord(String),

    /// Referenced topic does not exist or is deleted
    #[error("topic not found: {0}")]
    TopicNotFound(String),

    /// Requested record does not exist
    #[error("record not found: {0}")]
    NotFound(String),

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Database(error.to_string())
    }
}

impl From<anyhow::Error> for StoreError {
    fn from(error: anyhow::Error) -> Self {
        Self::Database(error.to_string())
    }
}

/// Per-row failure reasons recorded in the import summary.
///
/// Enrichment and translation problems are deliberately absent here:
/// they degrade to missing data instead of failing the row.
#[derive(Error, Debug)]
pub enum RowFailure {
    /// A required field was missing from the row
    #[error("missing {0}")]
    Validation(&'static str),

    /// The word already exists in the store
    #[error("word already exists")]
    Duplicate,

    /// The row references a topic that does not exist
    #[error("topic not found: {0}")]
    UnknownTopic(String),

    /// The transactional create failed
    #[error("write failed: {0}")]
    Write(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error reading or parsing the input file
    #[error("Input error: {0}")]
    Input(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the persistence store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Input(error.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(error: csv::Error) -> Self {
        Self::Input(error.to_string())
    }
}
