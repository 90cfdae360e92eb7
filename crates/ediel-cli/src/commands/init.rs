// Rust guideline compliant 2026-02-06

//! Implementation of the `ediel init` command.
//!
//! Writes a configuration file with default settings.

use crate::terminal::{print_info, print_success};
use anyhow::Result;
use ediel_core::config::CONFIG_FILE_NAME;
use ediel_core::Config;
use std::fs;
use std::path::Path;

/// Writes a default `ediel.toml` into `config_dir`.
///
/// An existing file is left untouched unless `force` is set.
///
/// # Arguments
///
/// * `config_dir` - Directory receiving the configuration file
/// * `force` - Overwrite an existing configuration file
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The configuration file cannot be written
pub fn execute(config_dir: &Path, force: bool) -> Result<()> {
    let config_path = config_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        print_info(&format!(
            "{} already exists; use --force to overwrite",
            config_path.display()
        ));
        return Ok(());
    }

    if !config_dir.exists() {
        fs::create_dir_all(config_dir)?;
    }
    Config::default().save(config_dir)?;
    tracing::debug!(path = %config_path.display(), "wrote default configuration");

    print_success(&format!("Created {}", config_path.display()));
    Ok(())
}
