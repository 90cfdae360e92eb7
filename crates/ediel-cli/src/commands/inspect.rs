// Rust guideline compliant 2026-02-06

//! Implementation of the `ediel inspect` command.
//!
//! Shows what kind of file was detected together with its header properties.

use super::FileArgs;
use crate::OutputFormatter;
use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use ediel_app::{FileKind, MeteringFile};
use ediel_core::{Config, MeteringParser, PropertyValue};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Header-level description of a parsed file.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    /// Path as given on the command line.
    pub file: String,
    /// Detected file family.
    pub kind: FileKind,
    /// Parser layout name.
    pub layout: String,
    /// Number of parsed body records.
    pub records: usize,
    /// Declared UTC offset.
    pub time_zone: Option<String>,
    /// Declared creation timestamp.
    pub created_on: Option<DateTime<FixedOffset>>,
    /// Rows dropped as contract information.
    pub removed_lines: usize,
    /// All header and footer properties.
    pub properties: BTreeMap<String, PropertyValue>,
}

impl FileSummary {
    /// Summarizes an opened file.
    ///
    /// An unreadable time zone or creation date is left empty rather than
    /// failing the summary.
    pub fn from_file(path: &Path, file: &MeteringFile) -> Self {
        let document = file.document();
        let created_on = match document.created_on() {
            Ok(created_on) => created_on,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable creation date");
                None
            }
        };

        Self {
            file: path.display().to_string(),
            kind: file.kind(),
            layout: file.layout_name(),
            records: file.record_count(),
            time_zone: document.timezone().ok().map(|tz| tz.to_string()),
            created_on,
            removed_lines: document.removed_lines(),
            properties: document.property_map().clone(),
        }
    }
}

/// Prints the summary of a file.
///
/// # Arguments
///
/// * `path` - File to inspect
/// * `args` - Kind selection and parse flags
/// * `config` - Loaded configuration
/// * `formatter` - The output formatter to use
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed.
pub fn execute(
    path: &Path,
    args: &FileArgs,
    config: &Config,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let file = args.open(path, config)?;
    let summary = FileSummary::from_file(path, &file);
    println!("{}", formatter.format_summary(&summary));
    Ok(())
}
