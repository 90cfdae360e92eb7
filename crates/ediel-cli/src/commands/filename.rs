// Rust guideline compliant 2026-02-06

//! Implementation of the `ediel filename` command.

use crate::OutputFormatter;
use anyhow::Result;
use ediel_app::AppError;
use ediel_core::{match_filename, Error};

/// Prints the components of a MIG file name.
///
/// # Errors
///
/// Returns an error if the name does not follow the MIG naming pattern.
pub fn execute(name: &str, formatter: &dyn OutputFormatter) -> Result<()> {
    let matched = match_filename(&name.replace('\\', "/"))
        .ok_or_else(|| AppError::from(Error::InvalidFilename(name.to_string())))?;
    println!("{}", formatter.format_filename(&matched));
    Ok(())
}
