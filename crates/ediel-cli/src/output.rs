// Rust guideline compliant 2026-02-06

//! Output formatting module for the ediel CLI.
//!
//! This module provides functionality for formatting parsed metering data
//! in various output formats (JSON, table, plain text).

use crate::commands::inspect::FileSummary;
use crate::terminal::{get_terminal_width, wrap_text};
use chrono::{DateTime, FixedOffset};
use ediel_app::{AppError, ErrorCode, ErrorEnvelope, ScanEntry, SuccessEnvelope};
use ediel_core::{Cell, Frame, MigFileName, TimeSeries};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Write;
use tabled::{builder::Builder, settings::Style};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

/// Output formatter trait.
///
/// Defines the interface for formatting command results in different output formats.
pub trait OutputFormatter {
    /// Formats the header summary of a file.
    fn format_summary(&self, summary: &FileSummary) -> String;

    /// Formats a table of records or metadata.
    fn format_frame(&self, frame: &Frame) -> String;

    /// Formats time series side by side, one column per series.
    fn format_series(&self, series: &[TimeSeries]) -> String;

    /// Formats the outcome of a directory scan.
    fn format_scan(&self, entries: &[ScanEntry]) -> String;

    /// Formats the components of a MIG filename.
    fn format_filename(&self, name: &MigFileName) -> String;

    /// Formats an error for display.
    ///
    /// # Arguments
    /// * `error` - The error envelope to format
    ///
    /// # Returns
    /// A formatted error string
    fn format_error(&self, error: &ErrorEnvelope) -> String;
}

/// Builds an error envelope from any command error.
///
/// Application errors keep their stable code; anything else is reported as `unknown`.
pub fn error_envelope(error: &anyhow::Error) -> ErrorEnvelope {
    match error.downcast_ref::<AppError>() {
        Some(app) => ErrorEnvelope::from_error(app),
        None => ErrorEnvelope {
            status: "error",
            code: ErrorCode::Unknown,
            message: error.to_string(),
            details: None,
        },
    }
}

/// Aligns several series on their timestamps.
fn align_series(series: &[TimeSeries]) -> BTreeMap<DateTime<FixedOffset>, Vec<Option<f64>>> {
    let mut rows: BTreeMap<DateTime<FixedOffset>, Vec<Option<f64>>> = BTreeMap::new();
    for (column, s) in series.iter().enumerate() {
        for obs in &s.observations {
            let row = rows
                .entry(obs.timestamp)
                .or_insert_with(|| vec![None; series.len()]);
            row[column] = obs.value;
        }
    }
    rows
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.format("%Y-%m-%d %H:%M%:z").to_string()
}

fn to_json<T: Serialize>(payload: T) -> String {
    serde_json::to_string_pretty(&SuccessEnvelope::new(payload))
        .unwrap_or_else(|_| json!({ "error": "Failed to serialize output" }).to_string())
}

/// JSON output formatter.
///
/// Wraps every result in a success envelope for machine consumption.
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_summary(&self, summary: &FileSummary) -> String {
        to_json(summary)
    }

    fn format_frame(&self, frame: &Frame) -> String {
        let mut value = serde_json::to_value(frame).unwrap_or_default();
        if let Some(map) = value.as_object_mut() {
            map.insert("total".to_string(), json!(frame.len()));
        }
        to_json(value)
    }

    fn format_series(&self, series: &[TimeSeries]) -> String {
        to_json(json!({
            "series": series,
            "total": series.len(),
        }))
    }

    fn format_scan(&self, entries: &[ScanEntry]) -> String {
        let failed = entries.iter().filter(|e| !e.is_ok()).count();
        to_json(json!({
            "files": entries,
            "total": entries.len(),
            "failed": failed,
        }))
    }

    fn format_filename(&self, name: &MigFileName) -> String {
        to_json(name)
    }

    fn format_error(&self, error: &ErrorEnvelope) -> String {
        serde_json::to_string(error)
            .unwrap_or_else(|_| json!({ "error": error.message }).to_string())
    }
}

/// Table output formatter.
///
/// Formats results as human-readable tables with colors and alignment.
pub struct TableFormatter {
    use_color: bool,
}

impl TableFormatter {
    /// Creates a new table formatter.
    ///
    /// # Arguments
    /// * `use_color` - Whether to use colored output
    ///
    /// # Returns
    /// A new TableFormatter instance
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }
}

impl OutputFormatter for TableFormatter {
    fn format_summary(&self, summary: &FileSummary) -> String {
        let mut output = String::new();
        output.push_str(&format!("File:        {}\n", summary.file));
        output.push_str(&format!("Kind:        {}\n", summary.kind));
        output.push_str(&format!("Layout:      {}\n", summary.layout));
        output.push_str(&format!("Records:     {}\n", summary.records));
        if let Some(time_zone) = &summary.time_zone {
            output.push_str(&format!("Time zone:   {}\n", time_zone));
        }
        if let Some(created_on) = &summary.created_on {
            output.push_str(&format!("Created on:  {}\n", format_timestamp(created_on)));
        }
        if summary.removed_lines > 0 {
            output.push_str(&format!("Removed:     {} contract info lines\n", summary.removed_lines));
        }

        if !summary.properties.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Property", "Value"]);
            for (key, value) in &summary.properties {
                let width = get_terminal_width().saturating_sub(key.len() + 7);
                builder.push_record([key.clone(), wrap_text(&value.to_string(), width)]);
            }
            let mut table = builder.build();
            table.with(Style::modern());
            output.push('\n');
            output.push_str(&table.to_string());
        }
        output
    }

    fn format_frame(&self, frame: &Frame) -> String {
        if frame.is_empty() {
            return "No records found.".to_string();
        }

        // hide columns that are empty in every row
        let visible: Vec<usize> = (0..frame.columns.len())
            .filter(|&i| frame.rows.iter().any(|row| !row[i].is_empty()))
            .collect();

        let mut builder = Builder::default();
        builder.push_record(visible.iter().map(|&i| frame.columns[i].clone()));
        for row in &frame.rows {
            builder.push_record(visible.iter().map(|&i| row[i].to_string()));
        }

        let mut table = builder.build();
        table.with(Style::modern());
        table.to_string()
    }

    fn format_series(&self, series: &[TimeSeries]) -> String {
        if series.is_empty() {
            return "No time series found.".to_string();
        }

        let mut builder = Builder::default();
        let mut header = vec!["Timestamp".to_string()];
        header.extend(series.iter().map(|s| s.key.to_string()));
        builder.push_record(header);

        for (timestamp, values) in align_series(series) {
            let mut record = vec![format_timestamp(&timestamp)];
            record.extend(values.into_iter().map(format_value));
            builder.push_record(record);
        }

        let mut table = builder.build();
        table.with(Style::modern());
        table.to_string()
    }

    fn format_scan(&self, entries: &[ScanEntry]) -> String {
        if entries.is_empty() {
            return "No MIG files found.".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(["File", "Export", "Sender", "Receiver", "Rows", "Status"]);
        for entry in entries {
            builder.push_record([
                entry.file.filename.clone(),
                entry.file.export_no.clone(),
                entry.file.sender.clone(),
                entry.file.receiver.clone(),
                entry.rows.map(|r| r.to_string()).unwrap_or_default(),
                entry.error.clone().unwrap_or_else(|| "ok".to_string()),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern());
        table.to_string()
    }

    fn format_filename(&self, name: &MigFileName) -> String {
        let mut output = String::new();
        output.push_str(&format!("Filename:    {}\n", name.filename));
        output.push_str(&format!("Sender:      {}\n", name.sender));
        output.push_str(&format!("Receiver:    {}\n", name.receiver));
        output.push_str(&format!("Sequence:    {}\n", name.sequence));
        output.push_str(&format!("Export:      {} ({})\n", name.export_no, name.export));
        output.push_str(&format!("MIG:         {}\n", name.mig));
        output
    }

    fn format_error(&self, error: &ErrorEnvelope) -> String {
        if self.use_color {
            let mut buffer = Buffer::ansi();
            let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
            let _ = write!(buffer, "Error:");
            let _ = buffer.reset();
            let _ = write!(buffer, " {}", error.message);
            String::from_utf8_lossy(buffer.as_slice()).to_string()
        } else {
            format!("Error: {}", error.message)
        }
    }
}

/// Plain text output formatter.
///
/// Formats results as semicolon-separated text without colors or tables.
pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn format_summary(&self, summary: &FileSummary) -> String {
        let mut output = String::new();
        output.push_str(&format!("file;{}\n", summary.file));
        output.push_str(&format!("kind;{}\n", summary.kind));
        output.push_str(&format!("layout;{}\n", summary.layout));
        output.push_str(&format!("records;{}\n", summary.records));
        for (key, value) in &summary.properties {
            output.push_str(&format!("[{}];{}\n", key, value.values().join(";")));
        }
        output
    }

    fn format_frame(&self, frame: &Frame) -> String {
        let mut output = frame.columns.join(";");
        output.push('\n');
        for row in &frame.rows {
            let cells: Vec<String> = row.iter().map(Cell::to_string).collect();
            output.push_str(&cells.join(";"));
            output.push('\n');
        }
        output
    }

    fn format_series(&self, series: &[TimeSeries]) -> String {
        let mut header = vec!["Timestamp".to_string()];
        header.extend(series.iter().map(|s| s.key.to_string()));
        let mut output = header.join(";");
        output.push('\n');
        for (timestamp, values) in align_series(series) {
            let mut record = vec![timestamp.to_rfc3339()];
            record.extend(values.into_iter().map(format_value));
            output.push_str(&record.join(";"));
            output.push('\n');
        }
        output
    }

    fn format_scan(&self, entries: &[ScanEntry]) -> String {
        let mut output = String::new();
        for entry in entries {
            output.push_str(&format!(
                "{};{};{}\n",
                entry.file.path,
                entry.rows.map(|r| r.to_string()).unwrap_or_default(),
                entry.error.as_deref().unwrap_or("ok")
            ));
        }
        output
    }

    fn format_filename(&self, name: &MigFileName) -> String {
        format!(
            "{};{};{};{};{}\n",
            name.sender, name.receiver, name.sequence, name.export_no, name.mig
        )
    }

    fn format_error(&self, error: &ErrorEnvelope) -> String {
        format!("Error: {}", error.message)
    }
}

/// Factory function to create an appropriate formatter.
///
/// # Arguments
/// * `format` - The desired output format ("json", "table", or "plain")
/// * `use_color` - Whether to use colored output (ignored for JSON)
///
/// # Returns
/// A boxed OutputFormatter instance
pub fn create_formatter(format: &str, use_color: bool) -> Box<dyn OutputFormatter> {
    match format {
        "json" => Box::new(JsonFormatter),
        "table" => Box::new(TableFormatter::new(use_color)),
        "plain" => Box::new(PlainFormatter),
        _ => Box::new(TableFormatter::new(use_color)),
    }
}
