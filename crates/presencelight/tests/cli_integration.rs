//! Integration tests for the `presencelight` binary.
//!
//! These tests exercise the CLI binary via `assert_cmd`, verifying that
//! basic subcommands (help, version, config) produce expected output.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn cli() -> assert_cmd::Command {
    cargo_bin_cmd!("presencelight")
}

#[test]
fn cli_help_succeeds() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("presencelight"));
}

#[test]
fn cli_version_prints_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_config_json_produces_valid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let output = cli()
        .args(["--json", "--config"])
        .arg(&path)
        .arg("config")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("config --json should produce valid JSON");
    assert!(
        json["settings"].is_object(),
        "JSON output should contain 'settings' object"
    );
    assert!(
        json["config_file"].is_string() || json["config_file"].is_null(),
        "config_file should be string or null"
    );
    assert_eq!(json["config_file_exists"], serde_json::json!(false));
}

#[test]
fn cli_config_set_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    cli()
        .args(["--config"])
        .arg(&path)
        .args(["config", "set", "--light-ip", "192.168.1.77", "--busy-color", "#AA0000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("light_ip"));

    let output = cli()
        .args(["--json", "--config"])
        .arg(&path)
        .arg("config")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["settings"]["light_ip"], "192.168.1.77");
    assert_eq!(json["settings"]["busy_color"], serde_json::json!([170, 0, 0]));
    assert_eq!(json["config_file_exists"], serde_json::json!(true));
}

#[test]
fn cli_config_set_rejects_bad_color() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    cli()
        .args(["--config"])
        .arg(&path)
        .args(["config", "set", "--busy-color", "bogus"])
        .assert()
        .failure();
}

// ── --verbose flag ──

#[test]
fn cli_verbose_flag_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    cli()
        .args(["-v", "--config"])
        .arg(&path)
        .arg("config")
        .assert()
        .success();
}

#[test]
fn cli_verbose_long_flag_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    cli()
        .args(["--verbose", "--config"])
        .arg(&path)
        .arg("config")
        .assert()
        .success();
}

// ── Subcommand integration tests ──
// Network-requiring commands tested via --help to avoid hitting a real light.

#[test]
fn cli_watch_help_succeeds() {
    cli()
        .args(["watch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn cli_status_help_succeeds() {
    cli()
        .args(["status", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("status"));
}

#[test]
fn cli_set_help_lists_targets() {
    cli()
        .args(["set", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("busy"))
        .stdout(predicate::str::contains("auto"));
}

#[test]
fn cli_check_help_succeeds() {
    cli()
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("check"));
}

#[test]
fn cli_set_requires_target() {
    cli().arg("set").assert().failure();
}
