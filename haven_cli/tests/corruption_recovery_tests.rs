//! Corruption recovery tests for the haven binary.
//!
//! These tests verify the system can handle:
//! - Corrupted journal files
//! - Lists with some invalid entries
//! - Missing data directories

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cli(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("haven"));
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"));
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_corrupted_mood_logs_read_as_empty() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("haven");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("mood_logs.json"), "{ invalid json }}}}").unwrap();

    cli(temp_dir.path())
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["mood", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No mood entries yet"));
}

#[test]
fn test_logging_over_corrupted_file_recovers() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("haven");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("mood_logs.json"), "not json at all").unwrap();

    cli(temp_dir.path())
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["mood", "log", "okay"])
        .assert()
        .success();

    let contents = fs::read_to_string(data_dir.join("mood_logs.json")).unwrap();
    let logs: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(logs.as_array().unwrap().len(), 1);
}

#[test]
fn test_invalid_entries_dropped_on_write() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("haven");
    fs::create_dir_all(&data_dir).unwrap();

    // One readable entry, one out-of-range score, one unrelated value
    let stored = r#"[
        {"mood":5,"mood_name":"Excellent","notes":"","timestamp":"2025-11-10T09:00:00Z","date":"Mon Nov 10 2025"},
        {"mood":11,"mood_name":"Off the scale","notes":"","timestamp":"2025-11-10T10:00:00Z","date":"Mon Nov 10 2025"},
        42
    ]"#;
    fs::write(data_dir.join("mood_logs.json"), stored).unwrap();

    cli(temp_dir.path())
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["mood", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Excellent (5/5)"))
        .stdout(predicate::str::contains("Off the scale").not());

    cli(temp_dir.path())
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["mood", "log", "1"])
        .assert()
        .success();

    let contents = fs::read_to_string(data_dir.join("mood_logs.json")).unwrap();
    let logs: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["mood"], 1);
    assert_eq!(logs[1]["mood"], 5);
}

#[test]
fn test_corrupted_safety_plan_shows_empty() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("haven");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("safety_plan.json"), "[1, 2, 3]").unwrap();

    cli(temp_dir.path())
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["safety-plan", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Warning Signs"))
        .stdout(predicate::str::contains("(not filled in)"));
}

#[test]
fn test_missing_data_dir_is_created_on_write() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("nested").join("haven");

    cli(temp_dir.path())
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No mood entries in the last week"));
    assert!(!data_dir.exists());

    cli(temp_dir.path())
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["technique", "log", "Self-Soothing"])
        .assert()
        .success();
    assert!(data_dir.join("technique_usage.json").exists());
}
