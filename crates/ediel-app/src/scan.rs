// Rust guideline compliant 2026-02-09

//! Parallel directory scans over MIG exports.

use crate::error::{AppError, ErrorCode, Result};
use ediel_core::{find_files, parse_mig_file, Config, MeteringParser, MigFileName};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

/// Outcome of parsing one file found by a scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanEntry {
    /// Filename components of the match.
    pub file: MigFileName,
    /// Parser layout name, when the file parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<String>,
    /// Number of body records, when the file parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    /// Error code, when parsing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    /// Error message, when parsing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanEntry {
    /// Returns true if the file parsed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

fn scan_file(file: MigFileName, config: &Config) -> ScanEntry {
    match parse_mig_file(Path::new(&file.path), &config.parse_options()) {
        Ok(parsed) => ScanEntry {
            export: Some(parsed.layout_name()),
            rows: Some(parsed.record_count()),
            code: None,
            error: None,
            file,
        },
        Err(err) => {
            tracing::warn!(path = %file.path, error = %err, "failed to parse scanned file");
            let err = AppError::from(err);
            ScanEntry {
                export: None,
                rows: None,
                code: Some(err.code()),
                error: Some(err.to_string()),
                file,
            }
        }
    }
}

/// Finds and parses every MIG file directly inside a directory.
///
/// Files are parsed in parallel on a pool of `config.scan_threads` workers
/// (0 lets rayon pick). A file that fails to parse yields an entry carrying
/// the error instead of aborting the scan.
///
/// # Arguments
///
/// * `dir` - Directory to scan
/// * `config` - Parse settings and pool size
///
/// # Returns
///
/// One entry per matching file, sorted by path.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or the worker pool
/// cannot be created.
pub fn scan_directory(dir: &Path, config: &Config) -> Result<Vec<ScanEntry>> {
    scan_directory_with(dir, config, |_| {})
}

/// Like [`scan_directory`], calling `on_entry` from the worker threads as
/// each file finishes.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or the worker pool
/// cannot be created.
pub fn scan_directory_with<F>(dir: &Path, config: &Config, on_entry: F) -> Result<Vec<ScanEntry>>
where
    F: Fn(&ScanEntry) + Sync,
{
    let files = find_files(dir)?;
    tracing::info!(dir = %dir.display(), files = files.len(), "scanning directory");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.scan_threads)
        .build()
        .map_err(|e| AppError::InvalidInput(format!("Failed to start scan workers: {}", e)))?;

    let mut entries: Vec<ScanEntry> = pool.install(|| {
        files
            .into_par_iter()
            .map(|file| {
                let entry = scan_file(file, config);
                on_entry(&entry);
                entry
            })
            .collect()
    });
    entries.sort_by(|a, b| a.file.path.cmp(&b.file.path));

    let failed = entries.iter().filter(|entry| !entry.is_ok()).count();
    tracing::debug!(parsed = entries.len() - failed, failed, "scan finished");
    Ok(entries)
}
