// Rust guideline compliant 2026-02-06

//! ediel Core Library
//!
//! This crate provides the foundational components for reading EDIEL metering files:
//! - UNIFORMAT document parsing (properties, time zone, body extraction)
//! - MIG filename recognition and directory discovery
//! - Typed parsers for MIG 3.0 exports 91-96 and two-wire MMR files
//! - Frame, time-series and metadata views
//! - Error types and result handling

pub mod config;
pub mod error;
pub mod filename;
pub mod frame;
pub mod mig;
pub mod parser;
pub mod series;
pub mod twowire;
pub mod uniformat;

pub use config::{Config, OutputFormat};
pub use error::{Error, Result};
pub use filename::{find_files, match_filename, MigFileName};
pub use frame::{Cell, Frame};
pub use mig::{detect_export, parse_mig_file, ExportKind, MigFile, MigLayout};
pub use parser::MeteringParser;
pub use series::{date_range, IndexShift, Observation, SeriesKey, SeriesOptions, TimeSeries};
pub use twowire::{ChannelRow, TwoWireLayout, TwoWireMmr};
pub use uniformat::{ParseOptions, PropertyValue, UniDocument};
