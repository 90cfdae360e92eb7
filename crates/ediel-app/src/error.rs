// Rust guideline compliant 2026-02-09

//! Error handling for ediel application services.

use ediel_core::Error as CoreError;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for application-level operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Stable error codes for command and envelope responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The file kind could not be determined.
    UnknownKind,
    /// The file name is not a recognised MIG name.
    InvalidFilename,
    /// The MIG export number has no parser.
    UnsupportedExport,
    /// The document structure is broken (no rows, no body markers).
    InvalidDocument,
    /// A header property is missing or malformed.
    InvalidProperty,
    /// A body row could not be parsed.
    InvalidRow,
    /// Values do not line up with the generated time index.
    ShapeMismatch,
    /// Channel names repeat while duplicates are disallowed.
    DuplicateName,
    /// The requested view is not available for the file kind.
    Unsupported,
    /// Configuration could not be loaded or is invalid.
    ConfigError,
    /// The request included invalid inputs.
    InvalidInput,
    /// IO failure while reading files.
    IoError,
    /// JSON serialization or parsing failed.
    JsonError,
    /// A fallback for unexpected errors.
    Unknown,
}

/// Application-level errors with stable mapping to error codes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Neither the file name nor the header identify the file.
    #[error("Cannot determine file kind of {path}. Use --kind mig or --kind two_wire.")]
    UnknownKind {
        /// Path of the unidentified file.
        path: PathBuf,
    },

    /// Invalid input was provided by the caller.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error from core library operations.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// IO error not represented by core errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Returns a stable error code for the error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::UnknownKind { .. } => ErrorCode::UnknownKind,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::Io(_) => ErrorCode::IoError,
            AppError::Core(core) => match core {
                CoreError::Io(_) => ErrorCode::IoError,
                CoreError::Json(_) => ErrorCode::JsonError,
                CoreError::EmptyFile | CoreError::MissingBody => ErrorCode::InvalidDocument,
                CoreError::MissingProperty(_) | CoreError::InvalidProperty { .. } => {
                    ErrorCode::InvalidProperty
                }
                CoreError::InvalidFilename(_) => ErrorCode::InvalidFilename,
                CoreError::UnsupportedExport(_) => ErrorCode::UnsupportedExport,
                CoreError::InvalidNumber(_) | CoreError::InvalidRow { .. } => ErrorCode::InvalidRow,
                CoreError::Unsupported(_) => ErrorCode::Unsupported,
                CoreError::DuplicateName(_) => ErrorCode::DuplicateName,
                CoreError::ShapeMismatch { .. } => ErrorCode::ShapeMismatch,
                CoreError::InvalidConfig(_) => ErrorCode::ConfigError,
            },
        }
    }

    /// Returns structured details for errors that benefit from extra context.
    #[must_use]
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::UnknownKind { path } => Some(serde_json::json!({
                "path": path,
            })),
            AppError::InvalidInput(_) => None,
            AppError::Io(_) => None,
            AppError::Core(core) => match core {
                CoreError::InvalidRow { line, reason } => Some(serde_json::json!({
                    "line": line,
                    "reason": reason,
                })),
                CoreError::InvalidProperty { key, value } => Some(serde_json::json!({
                    "key": key,
                    "value": value,
                })),
                CoreError::ShapeMismatch { expected, actual } => Some(serde_json::json!({
                    "expected": expected,
                    "actual": actual,
                })),
                _ => None,
            },
        }
    }
}
