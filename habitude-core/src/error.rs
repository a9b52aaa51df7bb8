//! Error types for habitude-core

use thiserror::Error;

/// Errors that can occur in habitude-core
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// No habit with the given id
    #[error("habit not found: {0}")]
    HabitNotFound(String),

    /// No custom category with the given name
    #[error("category not found: {0}")]
    CategoryNotFound(String),

    /// A custom category with the given name already exists
    #[error("category already exists: {0}")]
    CategoryExists(String),

    /// Date string was not a valid calendar date
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Automaticity rating outside the 1-5 scale
    #[error("invalid rating {0}: must be between 1 and 5")]
    InvalidRating(u8),
}

/// Result type alias for habitude-core operations
pub type Result<T> = std::result::Result<T, Error>;
