// Rust guideline compliant 2026-02-06

//! Time-series primitives shared by the metering parsers.

use crate::{Error, Result};
use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which ends of a generated time range are kept.
///
/// Metering rows usually carry the interval start and end; with `Right`
/// every value is stamped at the end of its interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndexShift {
    /// Keep both the start and the end timestamp.
    Both,
    /// Drop both the start and the end timestamp.
    Neither,
    /// Keep the start, drop the end.
    Left,
    /// Drop the start, keep the end.
    #[default]
    Right,
}

impl FromStr for IndexShift {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "both" => Ok(IndexShift::Both),
            "neither" => Ok(IndexShift::Neither),
            "left" => Ok(IndexShift::Left),
            "right" => Ok(IndexShift::Right),
            _ => Err(Error::InvalidConfig(format!("Invalid index shift: {}", value))),
        }
    }
}

impl fmt::Display for IndexShift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndexShift::Both => "both",
            IndexShift::Neither => "neither",
            IndexShift::Left => "left",
            IndexShift::Right => "right",
        };
        f.write_str(name)
    }
}

/// Options shared by the time-series views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesOptions {
    /// Which ends of each row's time index are kept.
    pub index_shift: IndexShift,
    /// Whether repeated channel names are accepted.
    pub allow_duplicate_names: bool,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            index_shift: IndexShift::Right,
            allow_duplicate_names: true,
        }
    }
}

/// Generates regularly spaced timestamps from `start` through `end`.
///
/// The range always begins at `start`; `end` is part of the raw range only
/// when it falls on a step boundary. `shift` then removes the first and/or
/// last boundary timestamp.
///
/// # Errors
///
/// Returns an error if `step_minutes` is zero.
pub fn date_range(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    step_minutes: u32,
    shift: IndexShift,
) -> Result<Vec<DateTime<FixedOffset>>> {
    if step_minutes == 0 {
        return Err(Error::InvalidConfig(
            "Interval must be greater than 0 minutes".to_string(),
        ));
    }

    let step = Duration::minutes(i64::from(step_minutes));
    let mut stamps = Vec::new();
    let mut current = start;
    while current <= end {
        stamps.push(current);
        current += step;
    }

    let drop_start = matches!(shift, IndexShift::Right | IndexShift::Neither);
    let drop_end = matches!(shift, IndexShift::Left | IndexShift::Neither);

    if drop_end && stamps.last() == Some(&end) {
        stamps.pop();
    }
    if drop_start && stamps.first() == Some(&start) {
        stamps.remove(0);
    }

    Ok(stamps)
}

/// Parses a number written with a decimal comma.
///
/// Surrounding whitespace is ignored; empty text yields `None`.
///
/// # Errors
///
/// Returns an error if the text is not a number.
pub fn parse_decimal(text: &str) -> Result<Option<f64>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .map(Some)
        .map_err(|_| Error::InvalidNumber(trimmed.to_string()))
}

/// Ordered, labelled identity of a time series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesKey {
    /// Label/value pairs in display order.
    pub labels: Vec<(String, String)>,
}

impl SeriesKey {
    /// Creates a key from label/value pairs.
    pub fn new<I, L, V>(labels: I) -> Self
    where
        I: IntoIterator<Item = (L, V)>,
        L: Into<String>,
        V: Into<String>,
    {
        Self {
            labels: labels
                .into_iter()
                .map(|(label, value)| (label.into(), value.into()))
                .collect(),
        }
    }

    /// Returns the value for a label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<&str> = self.labels.iter().map(|(_, value)| value.as_str()).collect();
        f.write_str(&values.join("/"))
    }
}

/// One timestamped measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Timestamp in the file's time zone.
    pub timestamp: DateTime<FixedOffset>,
    /// Measured value; `None` when missing or flagged unknown.
    pub value: Option<f64>,
    /// Quality code reported alongside the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

/// A labelled sequence of observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    /// Series identity.
    pub key: SeriesKey,
    /// Observations in file order.
    pub observations: Vec<Observation>,
}

impl TimeSeries {
    /// Creates an empty series.
    pub fn new(key: SeriesKey) -> Self {
        Self {
            key,
            observations: Vec::new(),
        }
    }

    /// Returns the number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns true if the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Sum of all present values.
    pub fn total(&self) -> f64 {
        self.observations.iter().filter_map(|obs| obs.value).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 1, hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_date_range_right_drops_start() {
        let stamps = date_range(at(0), at(3), 60, IndexShift::Right).unwrap();
        assert_eq!(stamps, vec![at(1), at(2), at(3)]);
    }

    #[test]
    fn test_date_range_both_keeps_ends() {
        let stamps = date_range(at(0), at(2), 60, IndexShift::Both).unwrap();
        assert_eq!(stamps, vec![at(0), at(1), at(2)]);
    }

    #[test]
    fn test_date_range_neither() {
        let stamps = date_range(at(0), at(3), 60, IndexShift::Neither).unwrap();
        assert_eq!(stamps, vec![at(1), at(2)]);
    }

    #[test]
    fn test_date_range_left_keeps_unaligned_end() {
        // 02:30 is not a boundary, so nothing is dropped from the tail
        let end = at(2) + Duration::minutes(30);
        let stamps = date_range(at(0), end, 60, IndexShift::Left).unwrap();
        assert_eq!(stamps, vec![at(0), at(1), at(2)]);
    }

    #[test]
    fn test_date_range_zero_step() {
        assert!(date_range(at(0), at(1), 0, IndexShift::Both).is_err());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("1,5").unwrap(), Some(1.5));
        assert_eq!(parse_decimal(" 42 ").unwrap(), Some(42.0));
        assert_eq!(parse_decimal("").unwrap(), None);
        assert!(matches!(parse_decimal("abc"), Err(Error::InvalidNumber(_))));
    }

    #[test]
    fn test_index_shift_from_str() {
        assert_eq!("RIGHT".parse::<IndexShift>().unwrap(), IndexShift::Right);
        assert!("middle".parse::<IndexShift>().is_err());
        assert_eq!(IndexShift::Neither.to_string(), "neither");
    }

    #[test]
    fn test_series_key_display_and_lookup() {
        let key = SeriesKey::new([("AccessEAN", "5414"), ("Unit", "KWH")]);
        assert_eq!(key.get("Unit"), Some("KWH"));
        assert_eq!(key.get("Serial"), None);
        assert_eq!(key.to_string(), "5414/KWH");
    }
}
