//! Error types for the assumptions library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for assumption-table operations.
///
/// Only structural problems are errors. Per-row validation findings are
/// attached to rows as [`RowIssue`](crate::validation::RowIssue)s and
/// unresolved lookups become [`Sentinel`](crate::model::Sentinel) values.
#[derive(Debug, Error)]
pub enum AssumptionError {
    /// A row without a key appeared before any group head.
    #[error("group does not have a key (row {index})")]
    UngroupedRow { index: usize },

    /// A continuation row was found where a group head was expected.
    #[error("continuation row {index} cannot start a group")]
    NestedGroupHead { index: usize },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error reading a configuration or fixture file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for assumption-table operations.
pub type Result<T> = std::result::Result<T, AssumptionError>;
