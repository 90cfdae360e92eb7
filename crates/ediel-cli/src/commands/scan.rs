// Rust guideline compliant 2026-02-06

//! Implementation of the `ediel scan` command.
//!
//! Parses every MIG file in a directory and reports per-file results.

use crate::progress::ProgressReporter;
use crate::terminal::{print_warning, stderr_is_terminal};
use crate::OutputFormatter;
use anyhow::Result;
use ediel_app::scan_directory_with;
use ediel_core::Config;
use std::path::Path;

/// Scans a directory for MIG files.
///
/// Progress lines are printed to stderr when it is a terminal and output is
/// not JSON. Files that fail to parse are listed, not fatal.
///
/// # Arguments
///
/// * `dir` - Directory to scan
/// * `remove_contract_info` - Drop rows tagged CONTRACT-INFO
/// * `json` - Whether JSON output is active
/// * `config` - Loaded configuration
/// * `formatter` - The output formatter to use
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn execute(
    dir: &Path,
    remove_contract_info: bool,
    json: bool,
    config: &Config,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let mut config = config.clone();
    if remove_contract_info {
        config.remove_contract_info_lines = true;
    }

    let progress = ProgressReporter::new("Parsed", None, 50, !json && stderr_is_terminal());
    let entries = scan_directory_with(dir, &config, |_| {
        progress.tick();
    })?;
    progress.finish();

    println!("{}", formatter.format_scan(&entries));

    let failed = entries.iter().filter(|entry| !entry.is_ok()).count();
    if failed > 0 && !json {
        print_warning(&format!("{} of {} files failed to parse", failed, entries.len()));
    }
    Ok(())
}
