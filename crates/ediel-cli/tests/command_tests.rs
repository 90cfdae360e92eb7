// Rust guideline compliant 2026-02-06

//! Integration tests for CLI commands, run against the built binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const MIG_NAME: &str = "5414488000004.5414567000007.1.EXPORT95.MIG3.csv";
const BROKEN_NAME: &str = "5414488000004.5414567000007.2.EXPORT96.MIG3.csv";

const CONSUMPTION: &str = "\
[Format];MIG 3.0;
[Time zone];+0100;
[Created on];01022024;10:30;
[Body Start];
01012024 00:00;01022024 00:00;541448800000000001;E17;AMR;HI;E18;KWH;;1234,5;81;Total
01012024 00:00;01022024 00:00;541448800000000002;E17;AMR;HI;E18;KWH;;10;81;Other
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

fn ediel(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ediel"))
        .current_dir(dir)
        .env_remove("EDIEL_OUTPUT_FORMAT")
        .env_remove("EDIEL_REMOVE_CONTRACT_INFO_LINES")
        .env_remove("EDIEL_INDEX_SHIFT")
        .env_remove("EDIEL_ALLOW_DUPLICATE_NAMES")
        .env_remove("EDIEL_SCAN_THREADS")
        .args(args)
        .output()
        .expect("run ediel")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "expected success, got status: {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("expected JSON output ({}), got:\n{}", e, stdout))
}

fn fixture() -> TempDir {
    let temp_dir = TempDir::new().expect("temp dir");
    fs::write(temp_dir.path().join(MIG_NAME), CONSUMPTION).expect("write MIG file");
    fs::write(temp_dir.path().join("meter.mmr"), TWO_WIRE).expect("write MMR file");
    temp_dir
}

#[test]
fn test_inspect_mig_json() {
    let temp_dir = fixture();
    let output = ediel(
        temp_dir.path(),
        &["inspect", MIG_NAME, "--remove-contract-info", "--json"],
    );
    assert_success(&output);

    let value = stdout_json(&output);
    assert_eq!(value["status"], "ok");
    assert_eq!(value["result"]["kind"], "mig");
    assert_eq!(value["result"]["layout"], "MIG 3.0 export 95");
    assert_eq!(value["result"]["records"], 2);
    assert_eq!(value["result"]["removed_lines"], 1);
    assert_eq!(value["result"]["created_on"], "2024-02-01T10:30:00+01:00");
}

#[test]
fn test_contract_info_row_fails_without_flag() {
    let temp_dir = fixture();
    let output = ediel(temp_dir.path(), &["records", MIG_NAME, "--json"]);

    assert_eq!(output.status.code(), Some(1));
    let value = stdout_json(&output);
    assert_eq!(value["status"], "error");
    assert_eq!(value["code"], "invalid_row");
}

#[test]
fn test_records_plain_with_limit() {
    let temp_dir = fixture();
    let output = ediel(
        temp_dir.path(),
        &[
            "records",
            MIG_NAME,
            "--remove-contract-info",
            "--limit",
            "1",
            "--format",
            "plain",
        ],
    );
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "header plus one row, got:\n{}", stdout);
    assert!(lines[1].contains("541448800000000001"));
    assert!(lines[1].contains("1234.5"));
}

#[test]
fn test_timeseries_two_wire_json() {
    let temp_dir = fixture();
    let output = ediel(temp_dir.path(), &["timeseries", "meter.mmr", "--json"]);
    assert_success(&output);

    let value = stdout_json(&output);
    assert_eq!(value["result"]["total"], 1);
    let observations = value["result"]["series"][0]["observations"]
        .as_array()
        .expect("observations array");
    assert_eq!(observations.len(), 3);
    assert_eq!(observations[2]["value"], 3.0);
}

#[test]
fn test_metadata_two_wire_table() {
    let temp_dir = fixture();
    let output = ediel(
        temp_dir.path(),
        &["metadata", "meter.mmr", "--kind", "two_wire", "--no-color"],
    );
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Field"));
    assert!(stdout.contains("Main"));
    assert!(stdout.contains("kWh"));
}

#[test]
fn test_timeseries_unsupported_for_consumption() {
    let temp_dir = fixture();
    let output = ediel(
        temp_dir.path(),
        &["timeseries", MIG_NAME, "--remove-contract-info", "--json"],
    );

    assert_eq!(output.status.code(), Some(1));
    let value = stdout_json(&output);
    assert_eq!(value["code"], "unsupported");
}

#[test]
fn test_invalid_index_shift() {
    let temp_dir = fixture();
    let output = ediel(
        temp_dir.path(),
        &["timeseries", "meter.mmr", "--index-shift", "middle", "--json"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["code"], "invalid_input");
}

#[test]
fn test_unknown_kind_reports_error() {
    let temp_dir = TempDir::new().expect("temp dir");
    fs::write(
        temp_dir.path().join("data.csv"),
        "[Format];OTHER;\n[Body Start];\n[Body End];\n",
    )
    .expect("write file");

    let output = ediel(temp_dir.path(), &["inspect", "data.csv"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot determine file kind"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_kind_flag() {
    let temp_dir = fixture();
    let output = ediel(temp_dir.path(), &["inspect", "meter.mmr", "--kind", "csv", "--json"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["code"], "invalid_input");
}

#[test]
fn test_scan_reports_failures() {
    let temp_dir = fixture();
    fs::write(temp_dir.path().join(BROKEN_NAME), "[Format];MIG 3.0;\n").expect("write file");

    let output = ediel(
        temp_dir.path(),
        &["scan", ".", "--remove-contract-info", "--json"],
    );
    assert_success(&output);

    let value = stdout_json(&output);
    assert_eq!(value["result"]["total"], 2);
    assert_eq!(value["result"]["failed"], 1);
    assert_eq!(value["result"]["files"][0]["rows"], 2);
    assert_eq!(value["result"]["files"][1]["code"], "invalid_document");
}

#[test]
fn test_filename_components() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = ediel(temp_dir.path(), &["filename", MIG_NAME, "--json"]);
    assert_success(&output);

    let value = stdout_json(&output);
    assert_eq!(value["result"]["sender"], "5414488000004");
    assert_eq!(value["result"]["receiver"], "5414567000007");
    assert_eq!(value["result"]["export_no"], "95");
}

#[test]
fn test_filename_rejects_other_names() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = ediel(temp_dir.path(), &["filename", "report.csv", "--json"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["code"], "invalid_filename");
}

#[test]
fn test_init_writes_config_once() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = ediel(temp_dir.path(), &["init"]);
    assert_success(&output);

    let config_path = temp_dir.path().join("ediel.toml");
    let content = fs::read_to_string(&config_path).expect("read ediel.toml");
    assert!(content.contains("index_shift"));

    fs::write(&config_path, "allow_duplicate_names = false\n").expect("edit config");
    assert_success(&ediel(temp_dir.path(), &["init"]));
    let content = fs::read_to_string(&config_path).expect("read ediel.toml");
    assert_eq!(content, "allow_duplicate_names = false\n");

    assert_success(&ediel(temp_dir.path(), &["init", "--force"]));
    let content = fs::read_to_string(&config_path).expect("read ediel.toml");
    assert!(content.contains("index_shift"));
}

#[test]
fn test_config_output_format_applies() {
    let temp_dir = fixture();
    fs::write(temp_dir.path().join("ediel.toml"), "output_format = \"json\"\n")
        .expect("write config");

    let output = ediel(temp_dir.path(), &["inspect", "meter.mmr"]);
    assert_success(&output);
    assert_eq!(stdout_json(&output)["result"]["kind"], "two_wire");

    let output = ediel(temp_dir.path(), &["inspect", "meter.mmr", "--format", "plain"]);
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("file;meter.mmr"));
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = fixture();
    fs::write(temp_dir.path().join("ediel.toml"), "index_shift = \"middle\"\n")
        .expect("write config");

    let output = ediel(temp_dir.path(), &["inspect", "meter.mmr", "--json"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["code"], "config_error");
}

const DUPLICATE_NAMES: &str = "\
[Format];MMR;Interval: 30 min;
[Time zone];+0100;
[Body Start];
Main;Active;T1;yes;kWh;01012024;00:00;1;01012024;01:00;2;3
Main;Reactive;T1;yes;kvarh;01012024;00:00;4;01012024;01:00;5;6
[Body End];
";

#[test]
fn test_allow_duplicate_names_bare_flag() {
    let temp_dir = TempDir::new().expect("temp dir");
    fs::write(temp_dir.path().join("dup.mmr"), DUPLICATE_NAMES).expect("write MMR file");
    fs::write(
        temp_dir.path().join("ediel.toml"),
        "allow_duplicate_names = false\n",
    )
    .expect("write config");

    let output = ediel(temp_dir.path(), &["metadata", "dup.mmr", "--json"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["code"], "duplicate_name");

    let output = ediel(
        temp_dir.path(),
        &["metadata", "dup.mmr", "--allow-duplicate-names", "--json"],
    );
    assert_success(&output);

    let output = ediel(
        temp_dir.path(),
        &["timeseries", "dup.mmr", "--allow-duplicate-names", "false", "--json"],
    );
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["code"], "duplicate_name");
}

#[test]
fn test_help_examples_use_valid_file_names() {
    let temp_dir = TempDir::new().expect("temp dir");
    let output = ediel(temp_dir.path(), &["--help"]);
    assert_success(&output);

    let help = String::from_utf8_lossy(&output.stdout);
    let names: Vec<&str> = help
        .split_whitespace()
        .filter(|word| word.ends_with(".csv"))
        .collect();
    assert!(!names.is_empty(), "no example file names in help:\n{}", help);

    for name in names {
        let output = ediel(temp_dir.path(), &["filename", name, "--json"]);
        assert_success(&output);
    }
}
