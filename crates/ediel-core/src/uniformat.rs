// Rust guideline compliant 2026-02-06

//! UNIFORMAT document parsing.
//!
//! A UNIFORMAT file is semicolon separated text. Header and footer rows start
//! with a bracketed key (`[Time zone];+0100;`), and the data rows sit between
//! the `[Body Start]` and `[Body End]` markers. This module turns such a file
//! into rows of cells plus a property map; the per-export parsers build on it.

use crate::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Timestamp layout used throughout UNIFORMAT bodies and headers.
pub const DATE_FORMAT: &str = "%d%m%Y %H:%M";

/// Cell marking rows that carry contract information.
pub const CONTRACT_INFO_TAG: &str = "CONTRACT-INFO";

const BODY_START_KEY: &str = "Body Start";
const BODY_END_KEY: &str = "Body End";
const TIME_ZONE_KEY: &str = "Time zone";
const CREATED_ON_KEY: &str = "Created on";

/// Value of a header property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// The property had exactly one non-empty cell.
    Single(String),
    /// The property had several non-empty cells.
    List(Vec<String>),
}

impl PropertyValue {
    /// Returns the first cell of the value.
    pub fn first(&self) -> &str {
        match self {
            PropertyValue::Single(value) => value,
            PropertyValue::List(values) => values.first().map_or("", String::as_str),
        }
    }

    /// Returns the cell at `index`; a single value only has index 0.
    pub fn get(&self, index: usize) -> Option<&str> {
        match self {
            PropertyValue::Single(value) if index == 0 => Some(value),
            PropertyValue::Single(_) => None,
            PropertyValue::List(values) => values.get(index).map(String::as_str),
        }
    }

    /// Returns all cells of the value.
    pub fn values(&self) -> Vec<&str> {
        match self {
            PropertyValue::Single(value) => vec![value.as_str()],
            PropertyValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.values().join(" "))
    }
}

/// Options controlling how a document is read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Drop every row containing a `CONTRACT-INFO` cell before parsing.
    pub remove_contract_info_lines: bool,
    /// Display name for documents read from memory.
    pub file_name: Option<String>,
}

/// A parsed UNIFORMAT document.
#[derive(Debug, Clone)]
pub struct UniDocument {
    source: Option<PathBuf>,
    file_name: Option<String>,
    rows: Vec<Vec<String>>,
    properties: BTreeMap<String, PropertyValue>,
    body_start: usize,
    body_end_marker: usize,
    removed_lines: usize,
}

impl UniDocument {
    /// Reads and parses a document from disk.
    ///
    /// UTF-8 is tried first; files that are not valid UTF-8 are decoded as
    /// Latin-1, the encoding most EDIEL exporters use.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file is empty
    /// - The body markers are missing
    pub fn open(path: &Path, options: &ParseOptions) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let mut options = options.clone();
        if options.file_name.is_none() {
            options.file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
        }
        let mut document = Self::parse_str(&decode(&bytes), &options)?;
        document.source = Some(path.to_path_buf());
        Ok(document)
    }

    /// Parses a document from any reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the content is not a valid document.
    pub fn from_reader<R: Read>(mut reader: R, options: &ParseOptions) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::parse_str(&decode(&bytes), options)
    }

    /// Parses a document held in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The content has no rows
    /// - `[Body Start]` or `[Body End]` is missing
    pub fn parse_str(content: &str, options: &ParseOptions) -> Result<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut rows: Vec<Vec<String>> = content.lines().map(split_row).collect();

        let mut removed_lines = 0;
        if options.remove_contract_info_lines {
            let before = rows.len();
            rows.retain(|row| !row.iter().any(|cell| cell == CONTRACT_INFO_TAG));
            removed_lines = before - rows.len();
        }

        if rows.is_empty() {
            return Err(Error::EmptyFile);
        }

        let mut properties = BTreeMap::new();
        let mut body_start = None;
        let mut body_end_marker = None;

        for (i, row) in rows.iter().enumerate() {
            let Some(first) = row.first() else {
                continue;
            };
            if !first.starts_with('[') {
                continue;
            }
            let key = first.trim_matches(|c| c == '[' || c == ']');

            if key == BODY_START_KEY {
                body_start = Some(i + 1);
                continue;
            }
            if key == BODY_END_KEY {
                body_end_marker = Some(i);
                continue;
            }

            let mut values: Vec<String> = row[1..]
                .iter()
                .filter(|cell| !cell.is_empty())
                .cloned()
                .collect();
            let value = match values.len() {
                0 => continue,
                1 => PropertyValue::Single(values.remove(0)),
                _ => PropertyValue::List(values),
            };
            properties.insert(key.to_string(), value);
        }

        let (Some(body_start), Some(body_end_marker)) = (body_start, body_end_marker) else {
            return Err(Error::MissingBody);
        };

        tracing::debug!(
            rows = rows.len(),
            body_start,
            body_end_marker,
            removed_lines,
            "parsed UNIFORMAT document"
        );

        Ok(Self {
            source: None,
            file_name: options.file_name.clone(),
            rows,
            properties,
            body_start,
            body_end_marker,
            removed_lines,
        })
    }

    /// Returns the path the document was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Returns the document's display name, if known.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Returns every row of the document.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the number of rows dropped as contract information.
    pub fn removed_lines(&self) -> usize {
        self.removed_lines
    }

    /// Returns the index of the first body row.
    pub fn body_start_line(&self) -> usize {
        self.body_start
    }

    /// Returns the index of the last body row, or `None` when the markers are adjacent
    /// at the very top of the file.
    pub fn body_end_line(&self) -> Option<usize> {
        self.body_end_marker.checked_sub(1)
    }

    /// Returns the body rows between the markers.
    pub fn body(&self) -> &[Vec<String>] {
        if self.body_start > self.body_end_marker {
            return &[];
        }
        &self.rows[self.body_start..self.body_end_marker]
    }

    /// Returns the body rows paired with their line index in the document.
    pub fn numbered_body(&self) -> impl Iterator<Item = (usize, &Vec<String>)> {
        self.body()
            .iter()
            .enumerate()
            .map(move |(offset, row)| (self.body_start + offset, row))
    }

    /// Returns all property keys.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Returns the full property map.
    pub fn property_map(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    /// Returns a property value by key (without brackets).
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Returns a property value, or `default` when absent.
    pub fn property_or<'a>(&'a self, key: &str, default: &'a PropertyValue) -> &'a PropertyValue {
        self.properties.get(key).unwrap_or(default)
    }

    /// Returns the fixed UTC offset declared by the `Time zone` property.
    ///
    /// The property is formatted `+HHMM` or `-HHMM`.
    ///
    /// # Errors
    ///
    /// Returns an error if the property is absent or malformed.
    pub fn timezone(&self) -> Result<FixedOffset> {
        let value = self
            .property(TIME_ZONE_KEY)
            .ok_or_else(|| Error::MissingProperty(TIME_ZONE_KEY.to_string()))?;
        parse_offset(value.first()).ok_or_else(|| Error::InvalidProperty {
            key: TIME_ZONE_KEY.to_string(),
            value: value.to_string(),
        })
    }

    /// Returns the creation timestamp declared by the `Created on` property.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp or the time zone cannot be parsed.
    pub fn created_on(&self) -> Result<Option<DateTime<FixedOffset>>> {
        let Some(value) = self.property(CREATED_ON_KEY) else {
            return Ok(None);
        };
        let text = value.to_string();
        if text.trim().is_empty() {
            return Ok(None);
        }
        let tz = self.timezone()?;
        match parse_local(&text, &tz) {
            Some(created_on) => Ok(Some(created_on)),
            None => Err(Error::InvalidProperty {
                key: CREATED_ON_KEY.to_string(),
                value: text,
            }),
        }
    }

    /// Parses a `DDMMYYYY HH:MM` timestamp in the document's time zone.
    ///
    /// Unparsable text yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document time zone is missing or malformed.
    pub fn parse_datetime(&self, text: &str) -> Result<Option<DateTime<FixedOffset>>> {
        let tz = self.timezone()?;
        Ok(parse_local(text, &tz))
    }
}

/// Parses `text` with `DATE_FORMAT` and attaches `tz`.
pub fn parse_local(text: &str, tz: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    parse_local_with(text, DATE_FORMAT, tz)
}

/// Parses `text` with a custom layout and attaches `tz`.
pub fn parse_local_with(text: &str, format: &str, tz: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), format).ok()?;
    tz.from_local_datetime(&naive).single()
}

/// Parses `+HHMM` / `-HHMM` into a fixed offset.
fn parse_offset(text: &str) -> Option<FixedOffset> {
    let text = text.trim();
    if text.len() < 5 || !text.is_char_boundary(1) {
        return None;
    }
    let (sign, digits) = text.split_at(1);
    let sign = match sign {
        "+" => 1,
        "-" => -1,
        _ => return None,
    };
    let digits = digits.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Splits one line into cells on `;`, honouring double-quoted cells.
///
/// An empty line yields no cells.
pub fn split_row(line: &str) -> Vec<String> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.is_empty() {
        return Vec::new();
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            ';' if !in_quotes => cells.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    cells.push(current);
    cells
}

fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
