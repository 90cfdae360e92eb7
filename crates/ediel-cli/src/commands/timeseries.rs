// Rust guideline compliant 2026-02-06

//! Implementation of the `ediel timeseries` command.

use super::FileArgs;
use crate::OutputFormatter;
use anyhow::Result;
use ediel_app::AppError;
use ediel_core::{Config, IndexShift, MeteringParser};
use std::path::Path;

/// Prints the time series contained in a file.
///
/// # Arguments
///
/// * `path` - File to read
/// * `args` - Kind selection and parse flags
/// * `index_shift` - Overrides the configured index shift
/// * `allow_duplicate_names` - Overrides the configured duplicate-name policy
/// * `config` - Loaded configuration
/// * `formatter` - The output formatter to use
///
/// # Errors
///
/// Returns an error if:
/// - The index shift is invalid
/// - The file cannot be opened or parsed
/// - The file kind has no time-series view
pub fn execute(
    path: &Path,
    args: &FileArgs,
    index_shift: Option<String>,
    allow_duplicate_names: Option<bool>,
    config: &Config,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let mut options = config.series_options();
    if let Some(shift) = index_shift {
        options.index_shift = shift
            .parse::<IndexShift>()
            .map_err(|_| AppError::InvalidInput(format!("Invalid index shift: {}", shift)))?;
    }
    if let Some(allow) = allow_duplicate_names {
        options.allow_duplicate_names = allow;
    }

    let file = args.open(path, config)?;
    let series = file.timeseries(&options).map_err(AppError::from)?;
    println!("{}", formatter.format_series(&series));
    Ok(())
}
