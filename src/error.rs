//! Error types for the recipe book

use thiserror::Error;

/// Failure while talking to the key-value store
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error from the on-disk store
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Could not prepare the data directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Favorites could not be encoded for storage
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why a step navigation request did nothing
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationError {
    /// The open recipe has no step-by-step instructions
    #[error("no steps")]
    NoSteps,

    /// All steps are displayed at once; indexed navigation is disabled
    #[error("showing all steps")]
    ShowingAll,
}
