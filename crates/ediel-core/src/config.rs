// Rust guideline compliant 2026-02-06

//! Configuration management for ediel.

use crate::series::{IndexShift, SeriesOptions};
use crate::uniformat::ParseOptions;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "ediel.toml";

/// Upper bound for the scan worker pool.
const MAX_SCAN_THREADS: usize = 256;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// JSON output format.
    Json,
    /// Human-readable table format.
    #[default]
    Table,
    /// Plain text format.
    Plain,
}

/// Configuration for parsing and presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Whether rows tagged `CONTRACT-INFO` are dropped before parsing.
    #[serde(default)]
    pub remove_contract_info_lines: bool,

    /// Which ends of each generated time index are kept.
    #[serde(default = "default_index_shift")]
    pub index_shift: IndexShift,

    /// Whether repeated channel names are accepted in metadata and time series.
    #[serde(default = "default_allow_duplicate_names")]
    pub allow_duplicate_names: bool,

    /// Default output format for commands.
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Worker threads used when scanning directories (0 = automatic).
    #[serde(default)]
    pub scan_threads: usize,
}

fn default_index_shift() -> IndexShift {
    IndexShift::Right
}

fn default_allow_duplicate_names() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remove_contract_info_lines: false,
            index_shift: default_index_shift(),
            allow_duplicate_names: default_allow_duplicate_names(),
            output_format: OutputFormat::default(),
            scan_threads: 0,
        }
    }
}

impl Config {
    /// Loads configuration from file and environment variables.
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. Configuration file at `<config_dir>/ediel.toml`
    /// 3. Environment variables with `EDIEL_` prefix
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file exists but cannot be read
    /// - Configuration file contains invalid TOML
    /// - Configuration values fail validation
    pub fn load(config_dir: &Path) -> Result<Self> {
        let mut config = Self::default();

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            config = toml::from_str(&content)
                .map_err(|e| Error::InvalidConfig(format!("Invalid config file: {}", e)))?;
        }

        config.apply_env_overrides()?;
        config.validate()?;

        tracing::debug!(path = %config_path.display(), "configuration loaded");
        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `EDIEL_REMOVE_CONTRACT_INFO_LINES` - true/false
    /// - `EDIEL_INDEX_SHIFT` - both/neither/left/right
    /// - `EDIEL_ALLOW_DUPLICATE_NAMES` - true/false
    /// - `EDIEL_OUTPUT_FORMAT` - json/table/plain
    /// - `EDIEL_SCAN_THREADS` - worker count
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("EDIEL_REMOVE_CONTRACT_INFO_LINES") {
            self.remove_contract_info_lines = val.parse().map_err(|_| {
                Error::InvalidConfig(
                    "EDIEL_REMOVE_CONTRACT_INFO_LINES must be true or false".to_string(),
                )
            })?;
        }

        if let Ok(val) = std::env::var("EDIEL_INDEX_SHIFT") {
            self.index_shift = val.parse().map_err(|_| {
                Error::InvalidConfig(
                    "EDIEL_INDEX_SHIFT must be both, neither, left, or right".to_string(),
                )
            })?;
        }

        if let Ok(val) = std::env::var("EDIEL_ALLOW_DUPLICATE_NAMES") {
            self.allow_duplicate_names = val.parse().map_err(|_| {
                Error::InvalidConfig("EDIEL_ALLOW_DUPLICATE_NAMES must be true or false".to_string())
            })?;
        }

        if let Ok(val) = std::env::var("EDIEL_OUTPUT_FORMAT") {
            self.output_format = match val.as_str() {
                "json" => OutputFormat::Json,
                "table" => OutputFormat::Table,
                "plain" => OutputFormat::Plain,
                _ => {
                    return Err(Error::InvalidConfig(
                        "EDIEL_OUTPUT_FORMAT must be json, table, or plain".to_string(),
                    ))
                }
            };
        }

        if let Ok(val) = std::env::var("EDIEL_SCAN_THREADS") {
            self.scan_threads = val.parse().map_err(|_| {
                Error::InvalidConfig("EDIEL_SCAN_THREADS must be a number".to_string())
            })?;
        }

        Ok(())
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if `scan_threads` exceeds the supported maximum.
    fn validate(&self) -> Result<()> {
        if self.scan_threads > MAX_SCAN_THREADS {
            return Err(Error::InvalidConfig(format!(
                "scan_threads must be at most {}, got {}",
                MAX_SCAN_THREADS, self.scan_threads
            )));
        }
        Ok(())
    }

    /// Saves the configuration to `<config_dir>/ediel.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be created or written
    /// - Serialization fails
    pub fn save(&self, config_dir: &Path) -> Result<()> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Returns the document parse options implied by this configuration.
    #[must_use]
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            remove_contract_info_lines: self.remove_contract_info_lines,
            file_name: None,
        }
    }

    /// Returns the time-series options implied by this configuration.
    #[must_use]
    pub fn series_options(&self) -> SeriesOptions {
        SeriesOptions {
            index_shift: self.index_shift,
            allow_duplicate_names: self.allow_duplicate_names,
        }
    }
}
