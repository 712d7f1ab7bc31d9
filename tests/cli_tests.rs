//! Integration tests for the CLI

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_scan_help() {
    let mut cmd = Command::cargo_bin("martech-audit").unwrap();
    cmd.arg("scan").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Run an audit"));
}

#[test]
fn test_cli_report_help() {
    let mut cmd = Command::cargo_bin("martech-audit").unwrap();
    cmd.arg("report").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Generate a full audit report"));
}

#[test]
fn test_cli_check_help() {
    let mut cmd = Command::cargo_bin("martech-audit").unwrap();
    cmd.arg("check").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Check audit scores against thresholds"));
}

#[test]
fn test_cli_scan_requires_url() {
    let mut cmd = Command::cargo_bin("martech-audit").unwrap();
    cmd.arg("scan");

    cmd.assert().failure();
}

#[test]
fn test_cli_report_rejects_unknown_format() {
    let mut cmd = Command::cargo_bin("martech-audit").unwrap();
    cmd.arg("report")
        .arg("example.com")
        .arg("--format")
        .arg("xml");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format"));
}

#[test]
#[ignore] // Requires network access and API quota
fn test_cli_scan_real_site() {
    let mut cmd = Command::cargo_bin("martech-audit").unwrap();
    cmd.arg("--no-cache").arg("scan").arg("example.com");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("MarTech Health Score"));
}

#[test]
#[ignore] // Requires network access and API quota
fn test_cli_report_json_real_site() {
    let mut cmd = Command::cargo_bin("martech-audit").unwrap();
    cmd.arg("--no-cache")
        .arg("report")
        .arg("example.com")
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"scores\""));
}
