//! Core error types for sobriety-core.
//!
//! This module defines the error hierarchy using thiserror. Import errors
//! carry the user-facing notices shown when a file is rejected; storage
//! errors wrap the key-value backend.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for sobriety-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Import document rejected
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

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

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another writer
    #[error("Database is locked")]
    Locked,

    /// Backend cannot be reached at all
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Reasons an import document is rejected.
///
/// The display strings are the notices shown to the user; the store is
/// never modified when either is returned.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Parsed, but no array-valued `checkIns` (or an entry failed validation)
    #[error("Invalid file format. Please select a valid sobriety tracker export file.")]
    Format { detail: String },

    /// Not parseable as JSON at all
    #[error("Error reading file. Please make sure it's a valid JSON file.")]
    Parse(#[source] serde_json::Error),
}

impl ImportError {
    pub(crate) fn format(detail: impl Into<String>) -> Self {
        ImportError::Format {
            detail: detail.into(),
        }
    }

    /// Short machine-facing reason, used in logs.
    pub fn detail(&self) -> String {
        match self {
            ImportError::Format { detail } => detail.clone(),
            ImportError::Parse(err) => err.to_string(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors for user-supplied values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Date string not recognized as a calendar day
    #[error("Unrecognized calendar day: '{0}'")]
    InvalidDay(String),

    /// Habit name outside the closed set
    #[error("Unknown habit '{0}' (expected cigarettes, vapes, weed or alcohol)")]
    UnknownHabit(String),

    /// Mood name outside the closed set
    #[error("Unknown mood '{0}' (expected great, good, okay, bad or terrible)")]
    UnknownMood(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseBusy
                    || inner.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
