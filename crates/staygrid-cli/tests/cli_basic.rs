//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against JSON exports in a temp dir. HOME
//! points at the temp dir so config commands never touch the real one.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{json, Value};
use tempfile::TempDir;

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_staygrid"))
        .args(args)
        .env("HOME", home)
        .env_remove("STAYGRID_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn write_json(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path
}

fn fixture() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let records = write_json(
        &dir,
        "bookings.json",
        &json!({ "member": [
            { "id": 1, "unit_id": 1, "unit_name": "Aldea", "status": "Ongoing",
              "check_in": "2025-06-10", "check_out": "2025-06-12", "guest_name": "Ana Ruiz", "payout": 310 },
            { "id": 2, "unit_id": 1, "unit_name": "Aldea", "status": "Upcoming", "guest_type": "Hold",
              "check_in": "2025-06-11", "check_out": "2025-06-13" },
            { "id": 3, "unit_id": 2, "unit_name": "Zama", "status": "Cancelled",
              "check_in": "2025-06-11", "check_out": "2025-06-13" },
            { "id": 4, "unit_id": 2, "check_in": "2025-06-15", "check_out": "2025-06-15" }
        ]}),
    );
    let units = write_json(
        &dir,
        "units.json",
        &json!([
            { "id": 1, "name": "Aldea", "city": "Tulum", "type": "Studio" },
            { "id": 2, "name": "Zama", "city": "Tulum", "type": "1 Bdr" },
            { "id": 3, "name": "Caribe", "city": "Playa", "type": "Studio" }
        ]),
    );
    (dir, records, units)
}

#[test]
fn test_board_month() {
    let (dir, records, units) = fixture();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &[
            "board",
            "--records",
            records.to_str().unwrap(),
            "--units",
            units.to_str().unwrap(),
            "--month",
            "2025-06",
        ],
    );
    assert_eq!(code, 0, "board failed");
    let layout: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(layout["days"].as_array().unwrap().len(), 30);
    let lanes = layout["lanes"].as_array().unwrap();
    assert_eq!(lanes.len(), 3);
    assert_eq!(lanes[0]["label"], "Aldea");
    assert_eq!(lanes[0]["stays"][0]["label"], "Ana • 2n • $310,00");
    assert_eq!(layout["dropped"]["cancelled"], 1);
    assert_eq!(layout["dropped"]["inverted_range"], 1);
}

#[test]
fn test_board_search() {
    let (dir, records, units) = fixture();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &[
            "board",
            "--records",
            records.to_str().unwrap(),
            "--units",
            units.to_str().unwrap(),
            "--from",
            "2025-06-01",
            "--to",
            "2025-06-14",
            "--search",
            "playa",
        ],
    );
    assert_eq!(code, 0);
    let layout: Value = serde_json::from_str(&stdout).unwrap();
    let lanes = layout["lanes"].as_array().unwrap();
    assert_eq!(lanes.len(), 1);
    assert_eq!(lanes[0]["label"], "Caribe");
}

#[test]
fn test_board_rejects_bad_month() {
    let (dir, records, _) = fixture();
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["board", "--records", records.to_str().unwrap(), "--month", "June"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_triage_order() {
    let (dir, records, _) = fixture();
    let (code, stdout, _) = run_cli(dir.path(), &["triage", "--records", records.to_str().unwrap()]);
    assert_eq!(code, 0);
    let rows: Value = serde_json::from_str(&stdout).unwrap();
    let ids: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    // ongoing, upcoming, cancelled, then the row without a status
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
}

#[test]
fn test_available() {
    let (dir, records, units) = fixture();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &[
            "available",
            "--records",
            records.to_str().unwrap(),
            "--units",
            units.to_str().unwrap(),
            "--check-in",
            "2025-06-11",
            "--check-out",
            "2025-06-12",
            "--city",
            "Tulum",
        ],
    );
    assert_eq!(code, 0);
    let report: Value = serde_json::from_str(&stdout).unwrap();
    let names: Vec<&str> = report["available"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    // Aldea has a reservation; Zama only has a cancelled one
    assert_eq!(names, vec!["Zama"]);
    assert_eq!(report["window"]["start"], "2025-06-01");
    assert_eq!(report["window"]["end"], "2025-06-30");
}

#[test]
fn test_available_rejects_inverted_range() {
    let (dir, records, _) = fixture();
    let (code, _, stderr) = run_cli(
        dir.path(),
        &[
            "available",
            "--records",
            records.to_str().unwrap(),
            "--check-in",
            "2025-06-12",
            "--check-out",
            "2025-06-12",
        ],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_missing_records_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    let (code, _, stderr) = run_cli(dir.path(), &["triage", "--records", missing.to_str().unwrap()]);
    assert_ne!(code, 0);
    assert!(stderr.contains("cannot read"));
}

#[test]
fn test_config_set_get_reset() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "grid.sub_columns_per_day"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "3");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "grid.sub_columns_per_day", "4"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "grid.sub_columns_per_day"]);
    assert_eq!(stdout.trim(), "4");

    let (code, _, _) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "grid.sub_columns_per_day"]);
    assert_eq!(stdout.trim(), "3");
}

#[test]
fn test_config_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "grid.nope", "1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_config_path_and_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("staygrid/config.toml"));

    let cfg = dir.path().join("custom.toml");
    std::fs::write(&cfg, "[fields]\ncheck_in = [\"arrival\"]\ncheck_out = [\"departure\"]\n").unwrap();
    let records = write_json(
        &dir,
        "b.json",
        &json!([{ "unit_id": 1, "unit_name": "Aldea", "arrival": "2025-06-02", "departure": "2025-06-04" }]),
    );
    let (code, stdout, _) = run_cli(
        dir.path(),
        &[
            "board",
            "--records",
            records.to_str().unwrap(),
            "--month",
            "2025-06",
            "--config",
            cfg.to_str().unwrap(),
        ],
    );
    assert_eq!(code, 0);
    let layout: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(layout["lanes"][0]["stays"][0]["check_in"], "2025-06-02");
}
