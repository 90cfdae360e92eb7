// Rust guideline compliant 2026-02-09

//! Integration tests for file kind detection, opening and scanning.

use ediel_app::{open_file, scan_directory, AppError, ErrorCode, FileKind, MeteringFile};
use ediel_core::{Config, ExportKind, MeteringParser, SeriesOptions};
use std::path::PathBuf;
use tempfile::TempDir;

const CONSUMPTION: &str = "\
[Format];MIG 3.0;
[Time zone];+0100;
[Body Start];
01012024 00:00;01022024 00:00;541448800000000001;E17;AMR;HI;E18;KWH;;1234,5;81;Total
CONTRACT-INFO;541448800000000001;
[Body End];
";

const TWO_WIRE: &str = "\
[Format];MMR;Interval: 30 min;
[Time zone];+0100;
[Body Start];
Main;Active;T1;yes;kWh;01012024;00:00;1;01012024;01:00;2;3
[Body End];
";

const MIG_NAME: &str = "5414488000004.5414567000007.1.EXPORT95.MIG3.csv";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_auto_detects_mig_by_name() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, MIG_NAME, CONSUMPTION);

    let file = open_file(&path, FileKind::Auto, &Config::default()).unwrap();
    assert_eq!(file.kind(), FileKind::Mig);
    assert_eq!(file.export(), Some(ExportKind::Export95));
    assert_eq!(file.layout_name(), "MIG 3.0 export 95");
}

#[test]
fn test_remove_contract_info_from_config() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, MIG_NAME, CONSUMPTION);

    let kept = open_file(&path, FileKind::Mig, &Config::default());
    // the contract row has no valid timestamps
    assert!(kept.is_err());

    let config = Config {
        remove_contract_info_lines: true,
        ..Config::default()
    };
    let file = open_file(&path, FileKind::Mig, &config).unwrap();
    assert_eq!(file.record_count(), 1);
    assert_eq!(file.document().removed_lines(), 1);
}

#[test]
fn test_auto_detects_two_wire_by_format() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "logger-export.csv", TWO_WIRE);

    let file = open_file(&path, FileKind::Auto, &Config::default()).unwrap();
    assert!(matches!(file, MeteringFile::TwoWire(_)));
    assert_eq!(file.export(), None);

    let series = file.timeseries(&SeriesOptions::default()).unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].len(), 3);
}

#[test]
fn test_auto_unknown_kind() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "other.csv", CONSUMPTION);

    let err = open_file(&path, FileKind::Auto, &Config::default()).unwrap_err();
    assert!(matches!(err, AppError::UnknownKind { .. }));
    assert_eq!(err.code(), ErrorCode::UnknownKind);
}

#[test]
fn test_explicit_two_wire_ignores_name() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "5414488000004.5414567000007.1.EXPORT91.MIG3.csv", TWO_WIRE);

    let file = open_file(&path, FileKind::TwoWire, &Config::default()).unwrap();
    assert_eq!(file.kind(), FileKind::TwoWire);
}

#[test]
fn test_explicit_mig_requires_mig_name() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "logger-export.csv", TWO_WIRE);

    let err = open_file(&path, FileKind::Mig, &Config::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidFilename);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = open_file(&dir.path().join("absent.csv"), FileKind::Auto, &Config::default())
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::IoError);
}

#[test]
fn test_scan_directory_reports_each_file() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        remove_contract_info_lines: true,
        scan_threads: 2,
        ..Config::default()
    };
    write(&dir, MIG_NAME, CONSUMPTION);
    write(&dir, "5414488000004.5414567000007.2.EXPORT97.MIG3.csv", CONSUMPTION);
    write(&dir, "5414488000004.5414567000007.3.EXPORT96.MIG3.csv", "no body here\n");
    write(&dir, "notes.txt", "ignored");

    let entries = scan_directory(dir.path(), &config).unwrap();
    assert_eq!(entries.len(), 3);

    assert!(entries[0].is_ok());
    assert_eq!(entries[0].file.export_no, "95");
    assert_eq!(entries[0].rows, Some(1));
    assert_eq!(entries[0].export.as_deref(), Some("MIG 3.0 export 95"));

    assert_eq!(entries[1].code, Some(ErrorCode::UnsupportedExport));
    assert_eq!(entries[2].code, Some(ErrorCode::InvalidDocument));
    assert!(entries[2].rows.is_none());
}

#[test]
fn test_scan_missing_directory() {
    let dir = TempDir::new().unwrap();
    let result = scan_directory(&dir.path().join("absent"), &Config::default());
    assert!(result.is_err());
}
