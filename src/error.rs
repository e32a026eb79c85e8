//! Error types for Gramlite
//!
//! Every fallible operation in the crate returns `AppError`. The first five
//! variants are the write-time constraint taxonomy callers are expected to
//! match on; the rest wrap store and configuration failures.

use thiserror::Error;

/// Application-wide error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or oversized required field
    #[error("Validation error: {0}")]
    Validation(String),

    /// Reference to a nonexistent or deleted row
    #[error("Foreign key error: {0}")]
    ForeignKey(String),

    /// Duplicate username or email
    #[error("Uniqueness error: {0}")]
    Uniqueness(String),

    /// Duplicate like or follow edge
    #[error("Duplicate error: {0}")]
    Duplicate(String),

    /// A user attempted to follow themselves
    #[error("A user cannot follow themselves")]
    SelfFollow,

    /// Row not found for an explicit update
    #[error("Resource not found")]
    NotFound,

    /// Unclassified database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (migration failures and the like)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl AppError {
    /// True for the errors a caller can resolve by correcting input:
    /// validation failures and constraint violations.
    pub fn is_constraint(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::ForeignKey(_)
                | AppError::Uniqueness(_)
                | AppError::Duplicate(_)
                | AppError::SelfFollow
        )
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
