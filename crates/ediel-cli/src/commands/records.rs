// Rust guideline compliant 2026-02-06

//! Implementation of the `ediel records` command.

use super::FileArgs;
use crate::OutputFormatter;
use anyhow::Result;
use ediel_app::AppError;
use ediel_core::{Config, MeteringParser};
use std::path::Path;

/// Prints the parsed body of a file as a table.
///
/// # Arguments
///
/// * `path` - File to read
/// * `args` - Kind selection and parse flags
/// * `limit` - Maximum number of rows to print
/// * `config` - Loaded configuration
/// * `formatter` - The output formatter to use
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed.
pub fn execute(
    path: &Path,
    args: &FileArgs,
    limit: Option<usize>,
    config: &Config,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let file = args.open(path, config)?;
    let mut frame = file.frame().map_err(AppError::from)?;
    if let Some(limit) = limit {
        frame.rows.truncate(limit);
    }
    println!("{}", formatter.format_frame(&frame));
    Ok(())
}
