// Rust guideline compliant 2026-02-06

//! Implementation of the `ediel metadata` command.

use super::FileArgs;
use crate::OutputFormatter;
use anyhow::Result;
use ediel_app::AppError;
use ediel_core::{Config, MeteringParser};
use std::path::Path;

/// Prints per-channel metadata of a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, the file kind has no
/// metadata view, or names repeat while duplicates are disallowed.
pub fn execute(
    path: &Path,
    args: &FileArgs,
    allow_duplicate_names: Option<bool>,
    config: &Config,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let allow = allow_duplicate_names.unwrap_or(config.allow_duplicate_names);
    let file = args.open(path, config)?;
    let frame = file.metadata(allow).map_err(AppError::from)?;
    println!("{}", formatter.format_frame(&frame));
    Ok(())
}
