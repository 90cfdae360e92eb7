// Rust guideline compliant 2026-02-06

//! Parser for two-wire MMR files.
//!
//! Two-wire loggers export one row per channel. Each row carries the channel
//! description, the period start and end (date and time in separate cells)
//! and the interval values. Two layouts exist: the short layout starts with
//! the channel name, the long layout prefixes an EAN column.

use crate::frame::{Cell, Frame};
use crate::parser::MeteringParser;
use crate::series::{date_range, parse_decimal, IndexShift, Observation, SeriesKey, SeriesOptions, TimeSeries};
use crate::uniformat::{parse_local_with, ParseOptions, UniDocument};
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

const FORMAT_KEY: &str = "Format";
const TWO_WIRE_DATE_FORMAT: &str = "%d%m%Y%H:%M";

/// Column layout of a two-wire body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TwoWireLayout {
    /// `Name;Type;Tariff;Cumulative;Unit;StartDate;StartTime;v;EndDate;EndTime;v...`
    Short,
    /// Same as short with a leading EAN column and two trailing extra cells.
    Long,
}

impl TwoWireLayout {
    fn start_column(&self) -> usize {
        match self {
            TwoWireLayout::Short => 5,
            TwoWireLayout::Long => 6,
        }
    }

    fn end_column(&self) -> usize {
        self.start_column() + 3
    }

    /// Columns holding values, given the widest row in the body.
    fn value_columns(&self, width: usize) -> Vec<usize> {
        let first = self.start_column() + 2;
        let rest = self.end_column() + 2;
        let stop = match self {
            TwoWireLayout::Short => width,
            TwoWireLayout::Long => width.saturating_sub(2),
        };
        std::iter::once(first).chain(rest..stop.max(rest)).collect()
    }

    fn metadata_fields(&self) -> &'static [&'static str] {
        match self {
            TwoWireLayout::Short => &["Start", "End", "Type", "Tariff", "Cumulative", "Unit"],
            TwoWireLayout::Long => &["Start", "End", "Ean", "Type", "Tariff", "Cumulative"],
        }
    }
}

/// One channel row of a two-wire file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelRow {
    /// Zero-based line in the file.
    pub line: usize,
    /// Access point EAN (long layout only).
    pub ean: Option<String>,
    /// Channel name.
    pub name: String,
    /// Channel type.
    pub channel_type: Option<String>,
    /// Tariff code.
    pub tariff: Option<String>,
    /// Whether values are cumulative (`yes`/`no`); other text is kept verbatim.
    pub cumulative: Cell,
    /// Measurement unit.
    pub unit: Option<String>,
    /// Period start.
    pub start: DateTime<FixedOffset>,
    /// Period end.
    pub end: DateTime<FixedOffset>,
    /// Interval values, one per value column.
    pub values: Vec<Option<f64>>,
}

impl ChannelRow {
    fn parse(
        row: &[String],
        line: usize,
        layout: TwoWireLayout,
        value_columns: &[usize],
        tz: &FixedOffset,
    ) -> Result<Self> {
        let text = |index: usize| row.get(index).filter(|cell| !cell.is_empty()).cloned();
        let offset = match layout {
            TwoWireLayout::Short => 0,
            TwoWireLayout::Long => 1,
        };

        let start = timestamp(row, layout.start_column(), tz).ok_or_else(|| Error::InvalidRow {
            line,
            reason: "invalid start timestamp".to_string(),
        })?;
        let end = timestamp(row, layout.end_column(), tz).ok_or_else(|| Error::InvalidRow {
            line,
            reason: "invalid end timestamp".to_string(),
        })?;

        let cumulative = match text(offset + 3).as_deref() {
            Some("yes") => Cell::Bool(true),
            Some("no") => Cell::Bool(false),
            Some(other) => Cell::from(other),
            None => Cell::Empty,
        };

        let mut values = Vec::with_capacity(value_columns.len());
        for &column in value_columns {
            let value = match row.get(column) {
                Some(cell) => parse_decimal(cell).map_err(|err| Error::InvalidRow {
                    line,
                    reason: format!("column {}: {}", column, err),
                })?,
                None => None,
            };
            values.push(value);
        }

        Ok(Self {
            line,
            ean: if offset == 1 { text(0) } else { None },
            name: text(offset).unwrap_or_default(),
            channel_type: text(offset + 1),
            tariff: text(offset + 2),
            cumulative,
            unit: text(offset + 4),
            start,
            end,
            values,
        })
    }

    fn metadata_cell(&self, field: &str) -> Cell {
        match field {
            "Start" => Cell::Timestamp(self.start),
            "End" => Cell::Timestamp(self.end),
            "Ean" => Cell::from(self.ean.clone()),
            "Type" => Cell::from(self.channel_type.clone()),
            "Tariff" => Cell::from(self.tariff.clone()),
            "Cumulative" => self.cumulative.clone(),
            "Unit" => Cell::from(self.unit.clone()),
            _ => Cell::Empty,
        }
    }
}

fn timestamp(row: &[String], date_column: usize, tz: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let date = row.get(date_column)?;
    let time = row.get(date_column + 1)?;
    parse_local_with(&format!("{}{}", date.trim(), time.trim()), TWO_WIRE_DATE_FORMAT, tz)
}

/// Parsed two-wire MMR file.
#[derive(Debug, Clone)]
pub struct TwoWireMmr {
    document: UniDocument,
    layout: TwoWireLayout,
    rows: Vec<ChannelRow>,
    value_columns: usize,
}

impl TwoWireMmr {
    /// Reads and parses a two-wire file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn open(path: &Path, options: &ParseOptions) -> Result<Self> {
        Self::from_document(UniDocument::open(path, options)?)
    }

    /// Parses in-memory two-wire content.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be parsed.
    pub fn parse_str(content: &str, options: &ParseOptions) -> Result<Self> {
        Self::from_document(UniDocument::parse_str(content, options)?)
    }

    /// Parses the body of a two-wire document.
    ///
    /// The short layout is used when every row has a valid start timestamp in
    /// cells 5 and 6; otherwise the long layout is assumed.
    ///
    /// # Errors
    ///
    /// Returns an error if the time zone is missing or a row does not fit the layout.
    pub fn from_document(document: UniDocument) -> Result<Self> {
        let tz = document.timezone()?;
        let body: Vec<(usize, &Vec<String>)> = document
            .numbered_body()
            .filter(|(_, row)| row.iter().any(|cell| !cell.is_empty()))
            .collect();

        let short_fits = body.iter().all(|(_, row)| {
            timestamp(row, TwoWireLayout::Short.start_column(), &tz).is_some()
                && timestamp(row, TwoWireLayout::Short.end_column(), &tz).is_some()
        });
        let layout = if short_fits {
            TwoWireLayout::Short
        } else {
            TwoWireLayout::Long
        };

        let width = body.iter().map(|(_, row)| row.len()).max().unwrap_or(0);
        let value_columns = layout.value_columns(width);

        let rows = body
            .iter()
            .map(|(line, row)| ChannelRow::parse(row, *line, layout, &value_columns, &tz))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(?layout, channels = rows.len(), "parsed two-wire body");

        Ok(Self {
            value_columns: value_columns.len(),
            document,
            layout,
            rows,
        })
    }

    /// Returns the detected layout.
    pub fn layout(&self) -> TwoWireLayout {
        self.layout
    }

    /// Returns the parsed channel rows.
    pub fn rows(&self) -> &[ChannelRow] {
        &self.rows
    }

    /// Returns the logging interval in minutes from the `Format` property.
    ///
    /// The property looks like `MMR;Interval: 5 min`.
    ///
    /// # Errors
    ///
    /// Returns an error if the property is absent or not understood.
    pub fn interval(&self) -> Result<u32> {
        let format = self
            .document
            .property(FORMAT_KEY)
            .ok_or_else(|| Error::MissingProperty(FORMAT_KEY.to_string()))?;
        let invalid = || Error::InvalidProperty {
            key: FORMAT_KEY.to_string(),
            value: format.to_string(),
        };

        let entry = format.get(1).ok_or_else(invalid)?;
        let (_, rest) = entry.split_once(": ").ok_or_else(invalid)?;
        let rest: String = rest.chars().filter(|c| !c.is_whitespace()).collect();
        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        let amount: u32 = rest[..digits].parse().map_err(|_| invalid())?;
        let minutes = match rest[digits..].to_lowercase().as_str() {
            "min" | "m" | "t" => amount,
            "h" => amount.checked_mul(60).ok_or_else(invalid)?,
            _ => return Err(invalid()),
        };
        if minutes == 0 {
            return Err(invalid());
        }
        Ok(minutes)
    }

    fn check_names(&self, allow_duplicate_names: bool) -> Result<()> {
        if allow_duplicate_names {
            return Ok(());
        }
        let mut seen = HashSet::new();
        for row in &self.rows {
            if !seen.insert(row.name.as_str()) {
                return Err(Error::DuplicateName(row.name.clone()));
            }
        }
        Ok(())
    }
}

impl MeteringParser for TwoWireMmr {
    fn layout_name(&self) -> String {
        "two-wire MMR".to_string()
    }

    fn document(&self) -> &UniDocument {
        &self.document
    }

    fn record_count(&self) -> usize {
        self.rows.len()
    }

    fn frame(&self) -> Result<Frame> {
        let mut columns: Vec<String> = Vec::new();
        if self.layout == TwoWireLayout::Long {
            columns.push("Ean".to_string());
        }
        columns.extend(
            ["Name", "Type", "Tariff", "Cumulative", "Unit", "Start", "End"]
                .iter()
                .map(|c| c.to_string()),
        );
        columns.extend((1..=self.value_columns).map(|i| format!("Value{:03}", i)));

        let mut frame = Frame::new(columns);
        for row in &self.rows {
            let mut cells = Vec::new();
            if self.layout == TwoWireLayout::Long {
                cells.push(Cell::from(row.ean.clone()));
            }
            cells.extend([
                Cell::from(row.name.clone()),
                Cell::from(row.channel_type.clone()),
                Cell::from(row.tariff.clone()),
                row.cumulative.clone(),
                Cell::from(row.unit.clone()),
                Cell::Timestamp(row.start),
                Cell::Timestamp(row.end),
            ]);
            cells.extend(row.values.iter().map(|value| Cell::from(*value)));
            frame.push_row(cells);
        }
        Ok(frame)
    }

    /// Lays every channel on the first row's period, both ends included.
    ///
    /// Time slots where any channel lacks a value are dropped. The index shift
    /// option does not apply: two-wire periods always include both ends.
    fn timeseries(&self, options: &SeriesOptions) -> Result<Vec<TimeSeries>> {
        self.check_names(options.allow_duplicate_names)?;
        let Some(first) = self.rows.first() else {
            return Ok(Vec::new());
        };

        let index = date_range(first.start, first.end, self.interval()?, IndexShift::Both)?;
        let complete: Vec<usize> = (0..self.value_columns)
            .filter(|&slot| self.rows.iter().all(|row| row.values[slot].is_some()))
            .collect();
        if complete.len() != index.len() {
            return Err(Error::ShapeMismatch {
                expected: index.len(),
                actual: complete.len(),
            });
        }

        Ok(self
            .rows
            .iter()
            .map(|row| TimeSeries {
                key: SeriesKey::new([("Name", row.name.clone())]),
                observations: index
                    .iter()
                    .zip(&complete)
                    .map(|(timestamp, &slot)| Observation {
                        timestamp: *timestamp,
                        value: row.values[slot],
                        quality: None,
                    })
                    .collect(),
            })
            .collect())
    }

    /// One row per descriptive field, one column per channel.
    fn metadata(&self, allow_duplicate_names: bool) -> Result<Frame> {
        self.check_names(allow_duplicate_names)?;
        let mut columns = vec!["Field".to_string()];
        columns.extend(self.rows.iter().map(|row| row.name.clone()));

        let mut frame = Frame::new(columns);
        for field in self.layout.metadata_fields() {
            let mut cells = vec![Cell::from(*field)];
            cells.extend(self.rows.iter().map(|row| row.metadata_cell(field)));
            frame.push_row(cells);
        }
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_columns_short() {
        assert_eq!(TwoWireLayout::Short.value_columns(13), vec![7, 10, 11, 12]);
    }

    #[test]
    fn test_value_columns_long_drops_trailing_pair() {
        assert_eq!(TwoWireLayout::Long.value_columns(16), vec![8, 11, 12, 13]);
    }

    #[test]
    fn test_value_columns_narrow_rows() {
        assert_eq!(TwoWireLayout::Short.value_columns(8), vec![7]);
        assert_eq!(TwoWireLayout::Long.value_columns(9), vec![8]);
    }
}
