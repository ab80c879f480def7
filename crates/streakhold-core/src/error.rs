//! Core error types for streakhold-core.
//!
//! This module defines the error hierarchy using thiserror. Validation
//! failures and store failures get their own enums; `CoreError` is the
//! top-level type callers see.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for streakhold-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Persistence errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Validation errors raised at construction or record-parsing time.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Habit name is empty after trimming
    #[error("Habit name cannot be empty")]
    EmptyHabitName,

    /// Periodicity outside the daily/weekly set
    #[error("Periodicity must be either 'daily' or 'weekly', got '{0}'")]
    InvalidPeriodicity(String),

    /// Negative point value in a record
    #[error("Points must be a non-negative number")]
    NegativePoints,

    /// User record without a username
    #[error("Username is required")]
    MissingUsername,

    /// Operation referenced a household that was never created
    #[error("Household '{0}' does not exist")]
    UnknownHousehold(String),

    /// Malformed field in a persisted record
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Persistence-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to write the data file
    #[error("Failed to write data file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the document
    #[error("Failed to serialize data document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to resolve or create the data directory
    #[error("Failed to resolve data directory: {0}")]
    DataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
