// Rust guideline compliant 2026-02-09

//! Response envelopes for JSON command output.

use crate::error::{AppError, ErrorCode};
use serde::Serialize;
use std::path::Path;

/// Standard success envelope for command responses.
#[derive(Debug, Serialize)]
pub struct SuccessEnvelope<T> {
    /// Status indicator.
    pub status: &'static str,
    /// File the result was read from, when the command reads one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Result payload.
    pub result: T,
}

impl<T> SuccessEnvelope<T> {
    /// Creates a new success envelope.
    #[must_use]
    pub fn new(result: T) -> Self {
        Self {
            status: "ok",
            file: None,
            result,
        }
    }

    /// Creates a success envelope tagged with its source file.
    #[must_use]
    pub fn for_file(path: &Path, result: T) -> Self {
        Self {
            status: "ok",
            file: Some(path.display().to_string()),
            result,
        }
    }
}

/// Standard error envelope for command responses.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    /// Status indicator.
    pub status: &'static str,
    /// Stable error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Optional structured details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorEnvelope {
    /// Creates a new error envelope from an application error.
    #[must_use]
    pub fn from_error(error: &AppError) -> Self {
        Self {
            status: "error",
            code: error.code(),
            message: error.to_string(),
            details: error.details(),
        }
    }
}
