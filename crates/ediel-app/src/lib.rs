// Rust guideline compliant 2026-02-09

//! Shared application services for ediel.
//!
//! This crate provides reusable, non-CLI-specific helpers for detecting and
//! opening metering files, scanning directories in parallel, and
//! standardized response envelopes.

pub mod error;
pub mod open;
pub mod response;
pub mod scan;

pub use error::{AppError, ErrorCode, Result};
pub use open::{detect_kind, open_file, FileKind, MeteringFile};
pub use response::{ErrorEnvelope, SuccessEnvelope};
pub use scan::{scan_directory, scan_directory_with, ScanEntry};
