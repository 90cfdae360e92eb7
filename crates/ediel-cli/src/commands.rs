// Rust guideline compliant 2026-02-06

//! Command implementations for the ediel CLI.

pub mod filename;
pub mod init;
pub mod inspect;
pub mod metadata;
pub mod records;
pub mod scan;
pub mod timeseries;

use clap::Args;
use ediel_app::{FileKind, MeteringFile};
use ediel_core::Config;
use std::path::Path;

/// Arguments shared by every command that reads a single file.
#[derive(Debug, Clone, Args)]
pub struct FileArgs {
    /// File kind: auto, mig, or two_wire
    #[arg(long, default_value = "auto")]
    pub kind: String,

    /// Drop rows tagged CONTRACT-INFO before parsing
    #[arg(long)]
    pub remove_contract_info: bool,
}

impl FileArgs {
    /// Applies the flags on top of the loaded configuration.
    #[must_use]
    pub fn apply(&self, config: &Config) -> Config {
        let mut config = config.clone();
        if self.remove_contract_info {
            config.remove_contract_info_lines = true;
        }
        config
    }

    /// Opens `path` with the selected kind and effective configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the kind is invalid or the file cannot be parsed.
    pub fn open(&self, path: &Path, config: &Config) -> anyhow::Result<MeteringFile> {
        let kind: FileKind = self.kind.parse()?;
        Ok(ediel_app::open_file(path, kind, &self.apply(config))?)
    }
}
