// Rust guideline compliant 2026-02-06

//! Integration tests for the MIG 3.0 export parsers.

use chrono::{FixedOffset, TimeZone};
use ediel_core::{
    detect_export, parse_mig_file, Cell, Error, ExportKind, IndexShift, MeteringParser, MigFile,
    ParseOptions, SeriesOptions,
};
use tempfile::TempDir;

const HEADER: &str = "[Format];MIG 3.0;\n[Time zone];+0100;\n[Created on];01022024;10:30;\n[Body Start];\n";
const FOOTER: &str = "[Body End];\n";
const EAN: &str = "541448800000000001";

fn document(rows: &[String]) -> String {
    let mut content = HEADER.to_string();
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    content.push_str(FOOTER);
    content
}

/// Builds an hourly interval row: every fourth slot holds `slot,5`.
fn interval_row(start: &str, end: &str, serial: &str, unknown_slot: Option<usize>) -> String {
    let mut cells: Vec<String> = vec![
        start.to_string(),
        end.to_string(),
        EAN.to_string(),
        serial.to_string(),
        "1".to_string(),
        "E17".to_string(),
        "E18".to_string(),
        "KWH".to_string(),
        String::new(),
    ];
    for slot in 0..100 {
        if slot % 4 == 3 {
            cells.push(format!("{},5", slot));
        } else {
            cells.push(String::new());
        }
    }
    for slot in 0..100 {
        if Some(slot) == unknown_slot {
            cells.push("?".to_string());
        } else if slot % 4 == 3 {
            cells.push("81".to_string());
        } else {
            cells.push(String::new());
        }
    }
    cells.push("60".to_string());
    cells.push("  Main meter ".to_string());
    cells.extend(std::iter::repeat(String::new()).take(6));
    assert_eq!(cells.len(), 217);
    cells.join(";")
}

fn tz() -> FixedOffset {
    FixedOffset::east_opt(3600).unwrap()
}

#[test]
fn test_detect_export() {
    assert_eq!(
        detect_export("in/5414488000004.5414567000007.1.EXPORT93.MIG3.csv").unwrap(),
        ExportKind::Export93
    );
    assert!(matches!(
        detect_export("readme.txt"),
        Err(Error::InvalidFilename(_))
    ));
    assert!(matches!(
        detect_export("5414488000004.5414567000007.1.EXPORT97.MIG3.csv"),
        Err(Error::UnsupportedExport(_))
    ));
}

#[test]
fn test_interval_frame() {
    let content = document(&[interval_row("01012024 00:00", "02012024 00:00", "M1", None)]);
    let file = MigFile::parse_str(ExportKind::Export91, &content, &ParseOptions::default()).unwrap();

    assert_eq!(file.layout_name(), "MIG 3.0 export 91");
    assert_eq!(file.record_count(), 1);

    let frame = file.frame().unwrap();
    assert_eq!(frame.columns.len(), 217);
    assert_eq!(frame.columns[9], "Value001");
    assert_eq!(frame.columns[109], "Quality001");
    assert_eq!(frame.cell(0, "AccessEAN"), Some(&Cell::Text(EAN.to_string())));
    assert_eq!(frame.cell(0, "Value004"), Some(&Cell::Number(3.5)));
    assert_eq!(frame.cell(0, "Value001"), Some(&Cell::Empty));
    assert_eq!(frame.cell(0, "Interval"), Some(&Cell::Integer(60)));
    assert_eq!(
        frame.cell(0, "Description"),
        Some(&Cell::Text("Main meter".to_string()))
    );
    assert_eq!(
        frame.cell(0, "Start"),
        Some(&Cell::Timestamp(tz().with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
    );
}

#[test]
fn test_interval_timeseries_right_shift() {
    let content = document(&[interval_row("01012024 00:00", "02012024 00:00", "M1", Some(7))]);
    let file = MigFile::parse_str(ExportKind::Export92, &content, &ParseOptions::default()).unwrap();

    let series = file.timeseries(&SeriesOptions::default()).unwrap();
    assert_eq!(series.len(), 1);
    let s = &series[0];
    assert_eq!(s.key.get("AccessEAN"), Some(EAN));
    assert_eq!(s.key.get("Description"), Some("Main meter"));
    assert_eq!(s.len(), 24);

    let first = &s.observations[0];
    assert_eq!(first.timestamp, tz().with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap());
    assert_eq!(first.value, Some(3.5));
    assert_eq!(first.quality.as_deref(), Some("81"));

    // slot 7 is flagged unknown
    let second = &s.observations[1];
    assert_eq!(second.value, None);
    assert_eq!(second.quality.as_deref(), Some("?"));

    let last = s.observations.last().unwrap();
    assert_eq!(last.timestamp, tz().with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
    assert_eq!(last.value, Some(95.5));
}

#[test]
fn test_interval_timeseries_left_shift() {
    let content = document(&[interval_row("01012024 00:00", "02012024 00:00", "M1", None)]);
    let file = MigFile::parse_str(ExportKind::Export91, &content, &ParseOptions::default()).unwrap();

    let options = SeriesOptions {
        index_shift: IndexShift::Left,
        allow_duplicate_names: true,
    };
    let series = file.timeseries(&options).unwrap();
    assert_eq!(
        series[0].observations[0].timestamp,
        tz().with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(series[0].len(), 24);
}

#[test]
fn test_interval_index_too_long() {
    // 25 hours with both ends kept need 26 hourly slots; a row holds 25
    let content = document(&[interval_row("01012024 00:00", "02012024 01:00", "M1", None)]);
    let file = MigFile::parse_str(ExportKind::Export91, &content, &ParseOptions::default()).unwrap();

    let options = SeriesOptions {
        index_shift: IndexShift::Both,
        allow_duplicate_names: true,
    };
    assert!(matches!(
        file.timeseries(&options),
        Err(Error::ShapeMismatch {
            expected: 26,
            actual: 25
        })
    ));
}

#[test]
fn test_interval_groups_days_of_same_meter() {
    let content = document(&[
        interval_row("01012024 00:00", "02012024 00:00", "M1", None),
        interval_row("02012024 00:00", "03012024 00:00", "M1", None),
        interval_row("01012024 00:00", "02012024 00:00", "M2", None),
    ]);
    let file = MigFile::parse_str(ExportKind::Export93, &content, &ParseOptions::default()).unwrap();

    let series = file.timeseries(&SeriesOptions::default()).unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].key.get("Serial"), Some("M1"));
    assert_eq!(series[0].len(), 48);
    assert_eq!(series[1].key.get("Serial"), Some("M2"));
    assert_eq!(series[1].len(), 24);
}

#[test]
fn test_interval_duplicate_rows_kept_once() {
    let row = interval_row("01012024 00:00", "02012024 00:00", "M1", None);
    let content = document(&[row.clone(), row]);
    let file = MigFile::parse_str(ExportKind::Export91, &content, &ParseOptions::default()).unwrap();
    assert_eq!(file.record_count(), 1);
}

#[test]
fn test_interval_skips_short_rows() {
    let content = document(&[
        "01012024 00:00;02012024 00:00;1".to_string(),
        interval_row("01012024 00:00", "02012024 00:00", "M1", None),
    ]);
    let file = MigFile::parse_str(ExportKind::Export91, &content, &ParseOptions::default()).unwrap();
    assert_eq!(file.record_count(), 1);
}

#[test]
fn test_interval_accepts_closing_separator() {
    let content = document(&[
        interval_row("01012024 00:00", "02012024 00:00", "M1", None) + ";",
        interval_row("02012024 00:00", "03012024 00:00", "M1", None) + ";x",
    ]);
    let file = MigFile::parse_str(ExportKind::Export91, &content, &ParseOptions::default()).unwrap();
    // only an empty trailing cell is tolerated
    assert_eq!(file.record_count(), 1);

    let series = file.timeseries(&SeriesOptions::default()).unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].len(), 24);
}

#[test]
fn test_interval_invalid_value() {
    let row = interval_row("01012024 00:00", "02012024 00:00", "M1", None).replacen("3,5", "x", 1);
    let content = document(&[row]);
    let result = MigFile::parse_str(ExportKind::Export91, &content, &ParseOptions::default());
    assert!(matches!(result, Err(Error::InvalidRow { line: 4, .. })));
}

#[test]
fn test_interval_unsupported_interval() {
    let row = interval_row("01012024 00:00", "02012024 00:00", "M1", None).replace(";60;", ";45;");
    let content = document(&[row]);
    let file = MigFile::parse_str(ExportKind::Export91, &content, &ParseOptions::default()).unwrap();
    assert!(matches!(
        file.timeseries(&SeriesOptions::default()),
        Err(Error::InvalidRow { .. })
    ));
}

fn register_rows() -> Vec<String> {
    vec![
        "5414488000001;M1;1.8.1;E17;AMR;KWH;HI;31122023 00:00;100,5;81;;31012024 00:00;150,25;81;;;  Meter A ;ELEC;;;;".to_string(),
        format!(
            "{};AP LEVEL;1.8.0;E17;HI;01012024 00:00;01022024 00:00;81;;KWH;;49,75;;;SC1;Calc;5414488000009;;",
            EAN
        ),
    ]
}

#[test]
fn test_register_calculated_rows_first() {
    let content = document(&register_rows());
    let file = MigFile::parse_str(ExportKind::Export94, &content, &ParseOptions::default()).unwrap();
    assert_eq!(file.kind(), ExportKind::Export94);
    assert_eq!(file.record_count(), 2);

    let frame = file.frame().unwrap();
    assert_eq!(frame.columns[0], "Calculated");
    assert!(!frame.columns.iter().any(|c| c.starts_with("Blank")));

    assert_eq!(frame.cell(0, "Calculated"), Some(&Cell::Bool(true)));
    assert_eq!(frame.cell(0, "Value"), Some(&Cell::Number(49.75)));
    assert_eq!(frame.cell(0, "LatestValue"), Some(&Cell::Empty));
    assert_eq!(
        frame.cell(0, "End"),
        Some(&Cell::Timestamp(tz().with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()))
    );

    assert_eq!(frame.cell(1, "Calculated"), Some(&Cell::Bool(false)));
    assert_eq!(frame.cell(1, "LatestValue"), Some(&Cell::Number(150.25)));
    assert_eq!(frame.cell(1, "Description"), Some(&Cell::Text("Meter A".to_string())));
    assert_eq!(frame.cell(1, "Value"), Some(&Cell::Empty));
}

#[test]
fn test_register_unparsable_date_is_empty() {
    let rows = register_rows();
    let calculated = rows[1].replace("49,75;;;SC1", "49,75;;99999999 99:99;SC1");
    let content = document(&[calculated]);
    let file = MigFile::parse_str(ExportKind::Export94, &content, &ParseOptions::default()).unwrap();

    let frame = file.frame().unwrap();
    assert_eq!(frame.cell(0, "EstimateStart"), Some(&Cell::Empty));
    assert_eq!(frame.cell(0, "Value"), Some(&Cell::Number(49.75)));
}

#[test]
fn test_register_invalid_value() {
    let rows = register_rows();
    let calculated = rows[1].replace("49,75", "abc");
    let content = document(&[calculated]);
    let result = MigFile::parse_str(ExportKind::Export94, &content, &ParseOptions::default());
    assert!(matches!(result, Err(Error::InvalidRow { line: 4, .. })));

    let physical = rows[0].replace("150,25", "lots");
    let content = document(&[physical]);
    let result = MigFile::parse_str(ExportKind::Export94, &content, &ParseOptions::default());
    assert!(matches!(result, Err(Error::InvalidRow { .. })));
}

#[test]
fn test_register_has_no_timeseries() {
    let content = document(&register_rows());
    let file = MigFile::parse_str(ExportKind::Export94, &content, &ParseOptions::default()).unwrap();
    let err = file.timeseries(&SeriesOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Unsupported(_)));
    assert!(err.to_string().contains("export 94"));
    assert!(matches!(file.metadata(true), Err(Error::Unsupported(_))));
}

#[test]
fn test_consumption_frame() {
    let content = document(&[
        format!("01012024 00:00;01022024 00:00;{};E17;AMR;HI;E18;KWH;;1234,5;81; Total ", EAN),
        format!("01012024 00:00;01022024 00:00;{};E17;AMR;LO;E18;KWH;;;;", EAN),
    ]);
    let file = MigFile::parse_str(ExportKind::Export95, &content, &ParseOptions::default()).unwrap();
    assert_eq!(file.layout_name(), "MIG 3.0 export 95");

    let frame = file.frame().unwrap();
    assert_eq!(frame.columns.len(), 12);
    assert_eq!(frame.len(), 2);
    assert_eq!(frame.cell(0, "Consumption"), Some(&Cell::Number(1234.5)));
    assert_eq!(frame.cell(0, "Description"), Some(&Cell::Text("Total".to_string())));
    assert_eq!(frame.cell(1, "TimeFrame"), Some(&Cell::Text("LO".to_string())));
    assert_eq!(frame.cell(1, "Consumption"), Some(&Cell::Empty));
}

#[test]
fn test_parse_mig_file_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir
        .path()
        .join("5414488000004.5414567000007.7.EXPORT96.MIG3.csv");
    let content = document(&[format!(
        "01012024 00:00;01022024 00:00;{};E17;AMR;HI;E18;KWH;;10;81;",
        EAN
    )]);
    std::fs::write(&path, content).unwrap();

    let file = parse_mig_file(&path, &ParseOptions::default()).unwrap();
    assert_eq!(file.kind(), ExportKind::Export96);
    assert_eq!(file.record_count(), 1);
    assert_eq!(
        file.document().file_name(),
        Some("5414488000004.5414567000007.7.EXPORT96.MIG3.csv")
    );
}

#[test]
fn test_parse_mig_file_rejects_unknown_name() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::write(&path, document(&[])).unwrap();
    assert!(matches!(
        parse_mig_file(&path, &ParseOptions::default()),
        Err(Error::InvalidFilename(_))
    ));
}
