//! Error types for migration-integrity

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntegrityError {
    #[error("Invalid entry point specifier '{specifier}' in group {group}: {reason}")]
    EntryPointParse {
        group: String,
        specifier: String,
        reason: String,
    },

    #[error("Entry point not found: {group}:{name}")]
    EntryPointNotFound { group: String, name: String },

    #[error("Invalid entry point reference: {0}")]
    InvalidReference(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
