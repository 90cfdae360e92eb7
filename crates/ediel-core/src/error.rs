// Rust guideline compliant 2026-02-06

//! Error types for the ediel core library.

use thiserror::Error;

/// Result type alias for ediel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ediel operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file contains no rows at all.
    #[error("File is empty")]
    EmptyFile,

    /// The body markers are missing.
    #[error("Body is not clearly marked by Body Start and Body End")]
    MissingBody,

    /// A required header property is absent.
    #[error("Missing property: {0}")]
    MissingProperty(String),

    /// A header property has an unusable value.
    #[error("Invalid property {key}: {value}")]
    InvalidProperty {
        /// Property key without brackets.
        key: String,
        /// Offending value.
        value: String,
    },

    /// The path does not follow the MIG naming pattern.
    #[error("Not a valid MIG file: {0}")]
    InvalidFilename(String),

    /// No parser exists for the export number.
    #[error("Unsupported MIG export: {0}")]
    UnsupportedExport(String),

    /// A numeric field could not be parsed.
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// A body row could not be interpreted.
    #[error("Invalid row at line {line}: {reason}")]
    InvalidRow {
        /// Zero-based line number in the file.
        line: usize,
        /// What went wrong.
        reason: String,
    },

    /// The requested view is not available for this file kind.
    #[error("Operation not supported: {0}")]
    Unsupported(String),

    /// Channel names repeat while duplicates are disallowed.
    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    /// The number of values does not line up with the time index.
    #[error("Shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch {
        /// Length of the generated time index.
        expected: usize,
        /// Number of complete value slots.
        actual: usize,
    },

    /// Invalid configuration.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
