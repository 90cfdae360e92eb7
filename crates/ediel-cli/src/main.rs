// Rust guideline compliant 2026-02-06

//! Ediel CLI Application
//!
//! Command-line interface for reading EDIEL UNIFORMAT metering files.

use clap::Parser;
use ediel_app::AppError;
use ediel_cli::commands::{self, FileArgs};
use ediel_cli::logging::init_tracing;
use ediel_cli::output::error_envelope;
use ediel_cli::{create_formatter, should_use_color, OutputFormatter};
use ediel_core::Config;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "ediel",
    version,
    about = "Ediel: read EDIEL UNIFORMAT metering files",
    long_about = "Ediel reads MIG 3.0 exports and two-wire MMR files in the EDIEL UNIFORMAT layout and prints their records, time series, and metadata.",
    after_help = "Examples:\n  ediel inspect 5414488000004.5414567000007.1.EXPORT95.MIG3.csv\n  ediel records 5414488000004.5414567000007.2.EXPORT91.MIG3.csv --limit 10\n  ediel timeseries meter.mmr --kind two_wire\n  ediel scan ./exports --json\n  ediel filename 5414488000004.5414567000007.3.EXPORT92.MIG3.csv\n"
)]
struct Cli {
    /// Enable JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Output format
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Directory containing ediel.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, or trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Write JSON log lines to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Table,
    Plain,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Write a default ediel.toml
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Show the detected kind and header properties of a file
    Inspect {
        /// File to inspect
        path: PathBuf,

        #[command(flatten)]
        file: FileArgs,
    },

    /// Print the parsed body records of a file
    Records {
        /// File to read
        path: PathBuf,

        #[command(flatten)]
        file: FileArgs,

        /// Maximum number of rows to print
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the time series of a file
    Timeseries {
        /// File to read
        path: PathBuf,

        #[command(flatten)]
        file: FileArgs,

        /// Index ends to keep: both, neither, left, or right
        #[arg(long)]
        index_shift: Option<String>,

        /// Accept repeated channel names (bare flag means true)
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        allow_duplicate_names: Option<bool>,
    },

    /// Print per-channel metadata of a file
    Metadata {
        /// File to read
        path: PathBuf,

        #[command(flatten)]
        file: FileArgs,

        /// Accept repeated channel names (bare flag means true)
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        allow_duplicate_names: Option<bool>,
    },

    /// Parse every MIG file in a directory
    Scan {
        /// Directory to scan
        dir: PathBuf,

        /// Drop rows tagged CONTRACT-INFO before parsing
        #[arg(long)]
        remove_contract_info: bool,
    },

    /// Split a MIG file name into its components
    Filename {
        /// File name or path to match
        name: String,
    },
}

fn run(cli: Cli, config: &Config, formatter: &dyn OutputFormatter, json: bool) -> anyhow::Result<()> {
    let config_dir = cli.config.clone().unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Some(Commands::Init { force }) => {
            commands::init::execute(&config_dir, force)?;
        }
        Some(Commands::Inspect { path, file }) => {
            commands::inspect::execute(&path, &file, config, formatter)?;
        }
        Some(Commands::Records { path, file, limit }) => {
            commands::records::execute(&path, &file, limit, config, formatter)?;
        }
        Some(Commands::Timeseries {
            path,
            file,
            index_shift,
            allow_duplicate_names,
        }) => {
            commands::timeseries::execute(
                &path,
                &file,
                index_shift,
                allow_duplicate_names,
                config,
                formatter,
            )?;
        }
        Some(Commands::Metadata {
            path,
            file,
            allow_duplicate_names,
        }) => {
            commands::metadata::execute(&path, &file, allow_duplicate_names, config, formatter)?;
        }
        Some(Commands::Scan {
            dir,
            remove_contract_info,
        }) => {
            commands::scan::execute(&dir, remove_contract_info, json, config, formatter)?;
        }
        Some(Commands::Filename { name }) => {
            commands::filename::execute(&name, formatter)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Determine output format and color usage
    let use_color = !cli.no_color && should_use_color();
    let explicit = match cli.format {
        Some(OutputFormat::Json) => Some("json"),
        Some(OutputFormat::Table) => Some("table"),
        Some(OutputFormat::Plain) => Some("plain"),
        None if cli.json => Some("json"),
        None => None,
    };

    let _guard = match init_tracing(&cli.log_level, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(err) => {
            let formatter = create_formatter(explicit.unwrap_or("table"), use_color);
            return report(formatter.as_ref(), explicit == Some("json"), &err);
        }
    };

    let config_dir = cli.config.clone().unwrap_or_else(|| PathBuf::from("."));
    let config = match Config::load(&config_dir) {
        Ok(config) => config,
        Err(err) => {
            let formatter = create_formatter(explicit.unwrap_or("table"), use_color);
            let err = anyhow::Error::from(AppError::from(err));
            return report(formatter.as_ref(), explicit == Some("json"), &err);
        }
    };

    let format = explicit.unwrap_or(match config.output_format {
        ediel_core::OutputFormat::Json => "json",
        ediel_core::OutputFormat::Table => "table",
        ediel_core::OutputFormat::Plain => "plain",
    });
    let json = format == "json";
    let formatter = create_formatter(format, use_color);

    match run(cli, &config, formatter.as_ref(), json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(formatter.as_ref(), json, &err),
    }
}

/// Prints a failed command and returns the failure exit code.
///
/// JSON envelopes go to stdout so scripts read a single stream.
fn report(formatter: &dyn OutputFormatter, json: bool, err: &anyhow::Error) -> ExitCode {
    tracing::debug!(error = %err, "command failed");
    let message = formatter.format_error(&error_envelope(err));
    if json {
        println!("{}", message);
    } else {
        eprintln!("{}", message);
    }
    ExitCode::FAILURE
}
