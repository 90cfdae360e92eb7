// Rust guideline compliant 2026-02-06

//! Parsers for MIG 3.0 export files.
//!
//! The export number in the file name selects one of three body layouts:
//!
//! - 91, 92, 93: interval data, one row per meter and day with up to 100
//!   quarter-hour value slots followed by 100 quality slots
//! - 94: register readings, mixing calculated (`AP LEVEL`) and physical rows
//! - 95, 96: consumption totals per period

use crate::filename::match_filename;
use crate::frame::{Cell, Frame};
use crate::parser::MeteringParser;
use crate::series::{
    date_range, parse_decimal, IndexShift, Observation, SeriesKey, SeriesOptions, TimeSeries,
};
use crate::uniformat::{parse_local, ParseOptions, UniDocument};
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

/// Number of value (and quality) slots in an interval row.
pub const INTERVAL_SLOTS: usize = 100;

const VALUE_OFFSET: usize = 9;
const QUALITY_OFFSET: usize = VALUE_OFFSET + INTERVAL_SLOTS;
const INTERVAL_COLUMN: usize = QUALITY_OFFSET + INTERVAL_SLOTS;
const INTERVAL_COLUMNS: usize = INTERVAL_COLUMN + 8;

/// Quality code marking a slot whose value is unknown.
pub const UNKNOWN_QUALITY: &str = "?";

/// MIG 3.0 export number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExportKind {
    /// Export 91: interval data.
    Export91,
    /// Export 92: interval data.
    Export92,
    /// Export 93: interval data.
    Export93,
    /// Export 94: register readings.
    Export94,
    /// Export 95: consumption totals.
    Export95,
    /// Export 96: consumption totals.
    Export96,
}

/// Body layout shared by a group of exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigLayout {
    /// Quarter-hour slots per day.
    Interval,
    /// Calculated and physical register rows.
    Register,
    /// One total per period.
    Consumption,
}

impl ExportKind {
    /// Resolves a two-digit export number.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedExport` for numbers without a parser.
    pub fn from_number(number: &str) -> Result<Self> {
        match number {
            "91" => Ok(ExportKind::Export91),
            "92" => Ok(ExportKind::Export92),
            "93" => Ok(ExportKind::Export93),
            "94" => Ok(ExportKind::Export94),
            "95" => Ok(ExportKind::Export95),
            "96" => Ok(ExportKind::Export96),
            _ => Err(Error::UnsupportedExport(number.to_string())),
        }
    }

    /// Returns the two-digit export number.
    pub fn number(&self) -> &'static str {
        match self {
            ExportKind::Export91 => "91",
            ExportKind::Export92 => "92",
            ExportKind::Export93 => "93",
            ExportKind::Export94 => "94",
            ExportKind::Export95 => "95",
            ExportKind::Export96 => "96",
        }
    }

    /// Returns the body layout of the export.
    pub fn layout(&self) -> MigLayout {
        match self {
            ExportKind::Export91 | ExportKind::Export92 | ExportKind::Export93 => {
                MigLayout::Interval
            }
            ExportKind::Export94 => MigLayout::Register,
            ExportKind::Export95 | ExportKind::Export96 => MigLayout::Consumption,
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MIG 3.0 export {}", self.number())
    }
}

/// Determines the export kind from a MIG file path.
///
/// # Errors
///
/// Returns an error if:
/// - The path does not follow the MIG naming pattern
/// - The export number has no parser
pub fn detect_export(path: &str) -> Result<ExportKind> {
    let matched = match_filename(path).ok_or_else(|| Error::InvalidFilename(path.to_string()))?;
    ExportKind::from_number(&matched.export_no)
}

/// Parses a MIG file, choosing the parser from its file name.
///
/// # Errors
///
/// Returns an error if the name is not recognised or the file cannot be parsed.
pub fn parse_mig_file(path: &Path, options: &ParseOptions) -> Result<MigFile> {
    let kind = detect_export(&path.to_string_lossy().replace('\\', "/"))?;
    let document = UniDocument::open(path, options)?;
    tracing::debug!(path = %path.display(), export = kind.number(), "parsing MIG file");
    MigFile::from_document(kind, document)
}

fn text(row: &[String], index: usize) -> Option<String> {
    row.get(index).filter(|cell| !cell.is_empty()).cloned()
}

fn trimmed(row: &[String], index: usize) -> Option<String> {
    row.get(index)
        .map(|cell| cell.trim_matches(' '))
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
}

fn number(row: &[String], index: usize, line: usize) -> Result<Option<f64>> {
    match row.get(index) {
        Some(cell) => parse_decimal(cell).map_err(|err| Error::InvalidRow {
            line,
            reason: format!("column {}: {}", index, err),
        }),
        None => Ok(None),
    }
}

fn required_timestamp(
    row: &[String],
    index: usize,
    line: usize,
    tz: &FixedOffset,
) -> Result<DateTime<FixedOffset>> {
    let cell = row.get(index).map_or("", String::as_str);
    parse_local(cell, tz).ok_or_else(|| Error::InvalidRow {
        line,
        reason: format!("column {}: invalid timestamp '{}'", index, cell),
    })
}

/// Yields non-blank body rows, skipping exact duplicates after the first.
fn distinct_rows(document: &UniDocument) -> impl Iterator<Item = (usize, &Vec<String>)> {
    let mut seen: HashSet<&Vec<String>> = HashSet::new();
    document
        .numbered_body()
        .filter(|(_, row)| row.iter().any(|cell| !cell.is_empty()))
        .filter(move |(_, row)| seen.insert(*row))
}

// ---------------------------------------------------------------------------
// Interval exports (91, 92, 93)
// ---------------------------------------------------------------------------

/// One day of interval readings for a meter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalRecord {
    /// Zero-based line in the file.
    pub line: usize,
    /// Period start.
    pub start: DateTime<FixedOffset>,
    /// Period end.
    pub end: DateTime<FixedOffset>,
    /// Access point EAN.
    pub access_ean: Option<String>,
    /// Meter serial number.
    pub serial: Option<String>,
    /// Counter identifier.
    pub counter_id: Option<String>,
    /// Energy type code.
    pub energy_type: Option<String>,
    /// Flow direction code.
    pub direction: Option<String>,
    /// Measurement unit.
    pub unit: Option<String>,
    /// Reason code.
    pub reason: Option<String>,
    /// Value slots.
    pub values: Vec<Option<f64>>,
    /// Quality slots.
    pub qualities: Vec<Option<String>>,
    /// Interval length in minutes.
    pub interval: Option<u32>,
    /// Free-text description, spaces trimmed.
    pub description: Option<String>,
    /// City EAN.
    pub city_ean: Option<String>,
    /// Gas conversion factor.
    pub gas_conversion_factor: Option<String>,
    /// Gas conversion unit.
    pub gas_conversion_unit: Option<String>,
    /// Gas conversion factor quality.
    pub gas_conversion_factor_quality: Option<String>,
    /// Sender reference of the originating request.
    pub request_sender_ref: Option<String>,
    /// Receiver reference of the originating request.
    pub request_receiver_ref: Option<String>,
}

impl IntervalRecord {
    fn parse(row: &[String], line: usize, tz: &FixedOffset) -> Result<Self> {
        let start = required_timestamp(row, 0, line, tz)?;
        let end = required_timestamp(row, 1, line, tz)?;

        let mut values = Vec::with_capacity(INTERVAL_SLOTS);
        for index in VALUE_OFFSET..QUALITY_OFFSET {
            values.push(number(row, index, line)?);
        }
        let qualities = (QUALITY_OFFSET..INTERVAL_COLUMN)
            .map(|index| text(row, index))
            .collect();

        let interval = match trimmed(row, INTERVAL_COLUMN) {
            Some(cell) => Some(cell.parse::<u32>().map_err(|_| Error::InvalidRow {
                line,
                reason: format!("invalid interval '{}'", cell),
            })?),
            None => None,
        };

        Ok(Self {
            line,
            start,
            end,
            access_ean: text(row, 2),
            serial: text(row, 3),
            counter_id: text(row, 4),
            energy_type: text(row, 5),
            direction: text(row, 6),
            unit: text(row, 7),
            reason: text(row, 8),
            values,
            qualities,
            interval,
            description: trimmed(row, INTERVAL_COLUMN + 1),
            city_ean: text(row, INTERVAL_COLUMN + 2),
            gas_conversion_factor: text(row, INTERVAL_COLUMN + 3),
            gas_conversion_unit: text(row, INTERVAL_COLUMN + 4),
            gas_conversion_factor_quality: text(row, INTERVAL_COLUMN + 5),
            request_sender_ref: text(row, INTERVAL_COLUMN + 6),
            request_receiver_ref: text(row, INTERVAL_COLUMN + 7),
        })
    }

    /// Returns the stride between used slots for the record's interval.
    ///
    /// A 15-minute interval uses every slot, an hourly interval every fourth.
    ///
    /// # Errors
    ///
    /// Returns an error for intervals that do not map onto quarter-hour slots.
    pub fn slot_step(&self) -> Result<Option<usize>> {
        let Some(interval) = self.interval else {
            return Ok(None);
        };
        if interval == 0 || 60 % interval != 0 || 60 / interval >= 5 {
            return Err(Error::InvalidRow {
                line: self.line,
                reason: format!("unsupported interval of {} minutes", interval),
            });
        }
        Ok(Some((5 - 60 / interval) as usize))
    }

    fn series_key(&self) -> SeriesKey {
        let label = |value: &Option<String>| value.clone().unwrap_or_default();
        SeriesKey::new([
            ("AccessEAN", label(&self.access_ean)),
            ("Description", label(&self.description)),
            ("Serial", label(&self.serial)),
            ("Direction", label(&self.direction)),
            ("CounterID", label(&self.counter_id)),
            ("EnergyType", label(&self.energy_type)),
            ("Unit", label(&self.unit)),
        ])
    }

    fn observations(&self, shift: IndexShift) -> Result<Vec<Observation>> {
        let (Some(interval), Some(step)) = (self.interval, self.slot_step()?) else {
            return Ok(Vec::new());
        };
        let index = date_range(self.start, self.end, interval, shift)?;
        let available = INTERVAL_SLOTS / step;
        if index.len() > available {
            return Err(Error::ShapeMismatch {
                expected: index.len(),
                actual: available,
            });
        }

        Ok(index
            .into_iter()
            .enumerate()
            .map(|(i, timestamp)| {
                let slot = step - 1 + i * step;
                let quality = self.qualities[slot].clone();
                let value = if quality.as_deref() == Some(UNKNOWN_QUALITY) {
                    None
                } else {
                    self.values[slot]
                };
                Observation {
                    timestamp,
                    value,
                    quality,
                }
            })
            .collect())
    }
}

/// Parsed interval export (91, 92 or 93).
#[derive(Debug, Clone)]
pub struct IntervalExport {
    kind: ExportKind,
    document: UniDocument,
    records: Vec<IntervalRecord>,
}

impl IntervalExport {
    /// Parses the body of an interval export.
    ///
    /// Rows with fewer than nine cells or more than the layout allows are
    /// skipped; exact duplicate rows are kept once.
    ///
    /// # Errors
    ///
    /// Returns an error if the time zone is missing or a row is malformed.
    pub fn from_document(kind: ExportKind, document: UniDocument) -> Result<Self> {
        let tz = document.timezone()?;
        let mut records = Vec::new();
        for (line, row) in distinct_rows(&document) {
            // a closing `;` yields one extra empty cell
            let cells = match row.split_last() {
                Some((last, rest)) if row.len() == INTERVAL_COLUMNS + 1 && last.is_empty() => {
                    rest.len()
                }
                _ => row.len(),
            };
            if cells < VALUE_OFFSET || cells > INTERVAL_COLUMNS {
                tracing::warn!(line, cells = row.len(), "skipping malformed interval row");
                continue;
            }
            records.push(IntervalRecord::parse(row, line, &tz)?);
        }
        Ok(Self {
            kind,
            document,
            records,
        })
    }

    /// Returns the export kind.
    pub fn kind(&self) -> ExportKind {
        self.kind
    }

    /// Returns the parsed records.
    pub fn records(&self) -> &[IntervalRecord] {
        &self.records
    }
}

impl MeteringParser for IntervalExport {
    fn layout_name(&self) -> String {
        self.kind.to_string()
    }

    fn document(&self) -> &UniDocument {
        &self.document
    }

    fn record_count(&self) -> usize {
        self.records.len()
    }

    fn frame(&self) -> Result<Frame> {
        let mut columns: Vec<String> = [
            "Start",
            "End",
            "AccessEAN",
            "Serial",
            "CounterID",
            "EnergyType",
            "Direction",
            "Unit",
            "Reason",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();
        columns.extend((1..=INTERVAL_SLOTS).map(|i| format!("Value{:03}", i)));
        columns.extend((1..=INTERVAL_SLOTS).map(|i| format!("Quality{:03}", i)));
        columns.extend(
            [
                "Interval",
                "Description",
                "CityEAN",
                "GasConversionFactor",
                "GasConversionUnit",
                "GasConversionFactorQuality",
                "RequestSenderRef",
                "RequestReceiverRef",
            ]
            .iter()
            .map(|c| c.to_string()),
        );

        let mut frame = Frame::new(columns);
        for record in &self.records {
            let mut row = vec![
                Cell::Timestamp(record.start),
                Cell::Timestamp(record.end),
                Cell::from(record.access_ean.clone()),
                Cell::from(record.serial.clone()),
                Cell::from(record.counter_id.clone()),
                Cell::from(record.energy_type.clone()),
                Cell::from(record.direction.clone()),
                Cell::from(record.unit.clone()),
                Cell::from(record.reason.clone()),
            ];
            row.extend(record.values.iter().map(|value| Cell::from(*value)));
            row.extend(record.qualities.iter().map(|quality| Cell::from(quality.clone())));
            row.push(record.interval.map_or(Cell::Empty, |i| Cell::Integer(i64::from(i))));
            row.extend([
                Cell::from(record.description.clone()),
                Cell::from(record.city_ean.clone()),
                Cell::from(record.gas_conversion_factor.clone()),
                Cell::from(record.gas_conversion_unit.clone()),
                Cell::from(record.gas_conversion_factor_quality.clone()),
                Cell::from(record.request_sender_ref.clone()),
                Cell::from(record.request_receiver_ref.clone()),
            ]);
            frame.push_row(row);
        }
        Ok(frame)
    }

    /// Groups rows by access point, energy type, unit and serial, and lays
    /// out each row's used slots on its time index.
    fn timeseries(&self, options: &SeriesOptions) -> Result<Vec<TimeSeries>> {
        type GroupKey = (Option<String>, Option<String>, Option<String>, Option<String>);
        let mut groups: BTreeMap<GroupKey, Vec<&IntervalRecord>> = BTreeMap::new();
        for record in &self.records {
            let key = (
                record.access_ean.clone(),
                record.energy_type.clone(),
                record.unit.clone(),
                record.serial.clone(),
            );
            groups.entry(key).or_default().push(record);
        }

        let mut series: Vec<TimeSeries> = Vec::new();
        for records in groups.values() {
            let mut group: Vec<TimeSeries> = Vec::new();
            for record in records {
                let observations = record.observations(options.index_shift)?;
                if observations.is_empty() {
                    continue;
                }
                let key = record.series_key();
                match group.iter_mut().find(|s| s.key == key) {
                    Some(existing) => existing.observations.extend(observations),
                    None => group.push(TimeSeries { key, observations }),
                }
            }
            series.extend(group);
        }
        Ok(series)
    }
}

// ---------------------------------------------------------------------------
// Register export (94)
// ---------------------------------------------------------------------------

/// Kind of register row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterKind {
    /// Calculated register (`<EAN>;AP LEVEL;...`).
    Calculated,
    /// Physical meter register.
    Physical,
}

const CALCULATED_COLUMNS: [&str; 19] = [
    "AccessEAN",
    "Serial",
    "RegisterID",
    "EnergyType",
    "TimeFrame",
    "Start",
    "End",
    "QualityCode",
    "QualityReason",
    "Unit",
    "Reason",
    "Value",
    "Estimate",
    "EstimateStart",
    "SwitchingCategory",
    "Description",
    "CityEAN",
    "Blank1",
    "Blank2",
];

const PHYSICAL_COLUMNS: [&str; 22] = [
    "AccessEAN",
    "Serial",
    "RegisterID",
    "EnergyType",
    "MeteringMethod",
    "Unit",
    "TimeFrame",
    "PreviousDateTime",
    "PreviousValue",
    "PreviousQualityCode",
    "PreviousQualityReason",
    "LatestDateTime",
    "LatestValue",
    "LatestQualityCode",
    "LatestQualityReason",
    "Reason",
    "Description",
    "MeterType",
    "GasConversionFactor",
    "GasConversionUnit",
    "Blank1",
    "Blank2",
];

const NUMERIC_COLUMNS: [&str; 5] = [
    "Value",
    "Estimate",
    "PreviousValue",
    "LatestValue",
    "GasConversionFactor",
];

const DATETIME_COLUMNS: [&str; 5] = [
    "Start",
    "End",
    "EstimateStart",
    "PreviousDateTime",
    "LatestDateTime",
];

const BLANK_COLUMNS: [&str; 2] = ["Blank1", "Blank2"];

impl RegisterKind {
    /// Classifies a body line: calculated rows start with an 18-digit EAN
    /// followed by `AP LEVEL`.
    pub fn classify(line: &str) -> Self {
        let bytes = line.as_bytes();
        let is_calculated = bytes.len() >= 19
            && bytes[..18].iter().all(u8::is_ascii_digit)
            && line[18..].starts_with(";AP LEVEL;");
        if is_calculated {
            RegisterKind::Calculated
        } else {
            RegisterKind::Physical
        }
    }

    /// Returns the raw column layout for the kind, including blank fillers.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            RegisterKind::Calculated => &CALCULATED_COLUMNS,
            RegisterKind::Physical => &PHYSICAL_COLUMNS,
        }
    }
}

/// One register reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRecord {
    /// Zero-based line in the file.
    pub line: usize,
    /// Calculated or physical.
    pub kind: RegisterKind,
    /// Named values, blank filler columns excluded.
    pub fields: BTreeMap<&'static str, Cell>,
}

impl RegisterRecord {
    fn parse(line_text: &str, line: usize, tz: &FixedOffset) -> Result<Self> {
        let kind = RegisterKind::classify(line_text);
        let columns = kind.columns();
        let mut fields = BTreeMap::new();
        let mut parts = line_text.splitn(columns.len(), ';');

        for &column in columns {
            let raw = parts.next().unwrap_or("");
            if BLANK_COLUMNS.contains(&column) {
                continue;
            }
            let cell = if raw.is_empty() {
                Cell::Empty
            } else if NUMERIC_COLUMNS.contains(&column) {
                parse_decimal(raw)
                    .map_err(|err| Error::InvalidRow {
                        line,
                        reason: format!("{}: {}", column, err),
                    })?
                    .map_or(Cell::Empty, Cell::Number)
            } else if DATETIME_COLUMNS.contains(&column) {
                Cell::from(parse_local(raw, tz))
            } else if column == "Description" {
                let description = raw.trim_matches(' ');
                if description.is_empty() {
                    Cell::Empty
                } else {
                    Cell::from(description)
                }
            } else {
                Cell::from(raw)
            };
            fields.insert(column, cell);
        }

        Ok(Self { line, kind, fields })
    }

    /// Returns the value of a named field.
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.fields.get(column)
    }
}

/// Parsed register export (94).
#[derive(Debug, Clone)]
pub struct RegisterExport {
    document: UniDocument,
    records: Vec<RegisterRecord>,
}

impl RegisterExport {
    /// Parses the body of a register export.
    ///
    /// # Errors
    ///
    /// Returns an error if the time zone is missing or a numeric field is invalid.
    pub fn from_document(document: UniDocument) -> Result<Self> {
        let tz = document.timezone()?;
        let mut calculated = Vec::new();
        let mut physical = Vec::new();
        for (line, row) in document
            .numbered_body()
            .filter(|(_, row)| row.iter().any(|cell| !cell.is_empty()))
        {
            let record = RegisterRecord::parse(&row.join(";"), line, &tz)?;
            match record.kind {
                RegisterKind::Calculated => calculated.push(record),
                RegisterKind::Physical => physical.push(record),
            }
        }
        calculated.extend(physical);
        Ok(Self {
            document,
            records: calculated,
        })
    }

    /// Returns the parsed records, calculated rows first.
    pub fn records(&self) -> &[RegisterRecord] {
        &self.records
    }

    /// Returns the frame columns: the calculated flag, then the calculated
    /// layout, then columns only physical rows carry.
    pub fn columns() -> Vec<&'static str> {
        let mut columns = vec!["Calculated"];
        for column in CALCULATED_COLUMNS.iter().chain(PHYSICAL_COLUMNS.iter()) {
            if !BLANK_COLUMNS.contains(column) && !columns.contains(column) {
                columns.push(column);
            }
        }
        columns
    }
}

impl MeteringParser for RegisterExport {
    fn layout_name(&self) -> String {
        ExportKind::Export94.to_string()
    }

    fn document(&self) -> &UniDocument {
        &self.document
    }

    fn record_count(&self) -> usize {
        self.records.len()
    }

    fn frame(&self) -> Result<Frame> {
        let columns = Self::columns();
        let mut frame = Frame::new(columns.iter().copied());
        for record in &self.records {
            let row = columns
                .iter()
                .map(|&column| {
                    if column == "Calculated" {
                        Cell::Bool(record.kind == RegisterKind::Calculated)
                    } else {
                        record.get(column).cloned().unwrap_or(Cell::Empty)
                    }
                })
                .collect();
            frame.push_row(row);
        }
        Ok(frame)
    }
}

// ---------------------------------------------------------------------------
// Consumption exports (95, 96)
// ---------------------------------------------------------------------------

/// One consumption total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionRecord {
    /// Zero-based line in the file.
    pub line: usize,
    /// Period start.
    pub start: DateTime<FixedOffset>,
    /// Period end.
    pub end: DateTime<FixedOffset>,
    /// Access point EAN.
    pub access_ean: Option<String>,
    /// Energy type code.
    pub energy_type: Option<String>,
    /// Metering method code.
    pub metering_method: Option<String>,
    /// Time frame (tariff period) code.
    pub time_frame: Option<String>,
    /// Flow direction code.
    pub direction: Option<String>,
    /// Measurement unit.
    pub unit: Option<String>,
    /// Reason code.
    pub reason: Option<String>,
    /// Consumed quantity.
    pub consumption: Option<f64>,
    /// Quality code.
    pub quality_code: Option<String>,
    /// Free-text description, spaces trimmed.
    pub description: Option<String>,
}

const CONSUMPTION_COLUMNS: [&str; 12] = [
    "Start",
    "End",
    "AccessEAN",
    "EnergyType",
    "MeteringMethod",
    "TimeFrame",
    "Direction",
    "Unit",
    "Reason",
    "Consumption",
    "QualityCode",
    "Description",
];

impl ConsumptionRecord {
    fn parse(row: &[String], line: usize, tz: &FixedOffset) -> Result<Self> {
        Ok(Self {
            line,
            start: required_timestamp(row, 0, line, tz)?,
            end: required_timestamp(row, 1, line, tz)?,
            access_ean: text(row, 2),
            energy_type: text(row, 3),
            metering_method: text(row, 4),
            time_frame: text(row, 5),
            direction: text(row, 6),
            unit: text(row, 7),
            reason: text(row, 8),
            consumption: number(row, 9, line)?,
            quality_code: text(row, 10),
            description: trimmed(row, 11),
        })
    }
}

/// Parsed consumption export (95 or 96).
#[derive(Debug, Clone)]
pub struct ConsumptionExport {
    kind: ExportKind,
    document: UniDocument,
    records: Vec<ConsumptionRecord>,
}

impl ConsumptionExport {
    /// Parses the body of a consumption export.
    ///
    /// # Errors
    ///
    /// Returns an error if the time zone is missing or a row is malformed.
    pub fn from_document(kind: ExportKind, document: UniDocument) -> Result<Self> {
        let tz = document.timezone()?;
        let mut records = Vec::new();
        for (line, row) in distinct_rows(&document) {
            if row.len() < 2 || row.len() > CONSUMPTION_COLUMNS.len() + 1 {
                tracing::warn!(line, cells = row.len(), "skipping malformed consumption row");
                continue;
            }
            records.push(ConsumptionRecord::parse(row, line, &tz)?);
        }
        Ok(Self {
            kind,
            document,
            records,
        })
    }

    /// Returns the export kind.
    pub fn kind(&self) -> ExportKind {
        self.kind
    }

    /// Returns the parsed records.
    pub fn records(&self) -> &[ConsumptionRecord] {
        &self.records
    }
}

impl MeteringParser for ConsumptionExport {
    fn layout_name(&self) -> String {
        self.kind.to_string()
    }

    fn document(&self) -> &UniDocument {
        &self.document
    }

    fn record_count(&self) -> usize {
        self.records.len()
    }

    fn frame(&self) -> Result<Frame> {
        let mut frame = Frame::new(CONSUMPTION_COLUMNS);
        for record in &self.records {
            frame.push_row(vec![
                Cell::Timestamp(record.start),
                Cell::Timestamp(record.end),
                Cell::from(record.access_ean.clone()),
                Cell::from(record.energy_type.clone()),
                Cell::from(record.metering_method.clone()),
                Cell::from(record.time_frame.clone()),
                Cell::from(record.direction.clone()),
                Cell::from(record.unit.clone()),
                Cell::from(record.reason.clone()),
                Cell::from(record.consumption),
                Cell::from(record.quality_code.clone()),
                Cell::from(record.description.clone()),
            ]);
        }
        Ok(frame)
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// A parsed MIG file of any supported export.
#[derive(Debug, Clone)]
pub enum MigFile {
    /// Exports 91, 92 and 93.
    Interval(IntervalExport),
    /// Export 94.
    Register(RegisterExport),
    /// Exports 95 and 96.
    Consumption(ConsumptionExport),
}

impl MigFile {
    /// Parses a document with the parser for `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body does not fit the export layout.
    pub fn from_document(kind: ExportKind, document: UniDocument) -> Result<Self> {
        Ok(match kind.layout() {
            MigLayout::Interval => MigFile::Interval(IntervalExport::from_document(kind, document)?),
            MigLayout::Register => MigFile::Register(RegisterExport::from_document(document)?),
            MigLayout::Consumption => {
                MigFile::Consumption(ConsumptionExport::from_document(kind, document)?)
            }
        })
    }

    /// Parses in-memory content with the parser for `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not a valid document for the export.
    pub fn parse_str(kind: ExportKind, content: &str, options: &ParseOptions) -> Result<Self> {
        Self::from_document(kind, UniDocument::parse_str(content, options)?)
    }

    /// Returns the export kind.
    pub fn kind(&self) -> ExportKind {
        match self {
            MigFile::Interval(export) => export.kind(),
            MigFile::Register(_) => ExportKind::Export94,
            MigFile::Consumption(export) => export.kind(),
        }
    }

    fn parser(&self) -> &dyn MeteringParser {
        match self {
            MigFile::Interval(export) => export,
            MigFile::Register(export) => export,
            MigFile::Consumption(export) => export,
        }
    }
}

impl MeteringParser for MigFile {
    fn layout_name(&self) -> String {
        self.parser().layout_name()
    }

    fn document(&self) -> &UniDocument {
        self.parser().document()
    }

    fn record_count(&self) -> usize {
        self.parser().record_count()
    }

    fn frame(&self) -> Result<Frame> {
        self.parser().frame()
    }

    fn timeseries(&self, options: &SeriesOptions) -> Result<Vec<TimeSeries>> {
        self.parser().timeseries(options)
    }

    fn metadata(&self, allow_duplicate_names: bool) -> Result<Frame> {
        self.parser().metadata(allow_duplicate_names)
    }
}
