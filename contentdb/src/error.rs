//! Error types for contentdb
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized for presentation layers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No such SQL query, key '{0}' was not found.")]
    UnknownQueryKey(String),

    #[error("Not valid sort order: {0}")]
    InvalidSortDirection(String),

    #[error("Not a sortable column: {0}")]
    InvalidSortColumn(String),

    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Generic(String),
}

impl serde::Serialize for ContentError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
