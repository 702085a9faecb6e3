//! End-to-end tests for the aloha binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn aloha() -> Command {
    Command::cargo_bin("aloha").unwrap()
}

#[test]
fn test_version_creates_manifest() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("package.json");
    let manifest = dir.path().join("manifest.json");
    fs::write(&source, r#"{"version":"2.3.1"}"#).unwrap();

    aloha()
        .arg("version")
        .arg(&source)
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found version: 2.3.1"))
        .stdout(predicate::str::contains("Creating new manifest file"));

    let content = fs::read_to_string(&manifest).unwrap();
    assert!(content.ends_with('\n'));
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value, serde_json::json!({"version": "2.3.1"}));
}

#[test]
fn test_version_updates_existing_manifest() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("package.json");
    let manifest = dir.path().join("manifest.json");
    fs::write(&source, r#"{"version":"9.9.9"}"#).unwrap();
    fs::write(&manifest, r#"{"name":"pkg","version":"0.0.1"}"#).unwrap();

    aloha()
        .arg("version")
        .arg(&source)
        .arg(&manifest)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("with version 9.9.9"))
        .stdout(predicate::str::contains("Creating new manifest file").not());

    let content = fs::read_to_string(&manifest).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value, serde_json::json!({"name": "pkg", "version": "9.9.9"}));
    assert!(content.find("\"name\"").unwrap() < content.find("\"version\"").unwrap());
}

#[test]
fn test_version_missing_field_fails() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("package.json");
    let manifest = dir.path().join("manifest.json");
    fs::write(&source, "{}").unwrap();
    fs::write(&manifest, r#"{"name":"pkg"}"#).unwrap();

    aloha()
        .arg("version")
        .arg(&source)
        .arg(&manifest)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No \"version\" field found"));

    assert_eq!(fs::read_to_string(&manifest).unwrap(), r#"{"name":"pkg"}"#);
}

#[test]
fn test_version_missing_field_does_not_create_target() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("package.json");
    let manifest = dir.path().join("manifest.json");
    fs::write(&source, "{}").unwrap();

    aloha()
        .arg("version")
        .arg(&source)
        .arg(&manifest)
        .assert()
        .code(1);

    assert!(!manifest.exists());
}

#[test]
fn test_version_unreadable_source_fails() {
    let dir = TempDir::new().unwrap();

    aloha()
        .arg("version")
        .arg(dir.path().join("nope.json"))
        .arg(dir.path().join("manifest.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_usage_errors_exit_one() {
    aloha().assert().code(1);
    aloha().arg("version").arg("package.json").assert().code(1);
    aloha()
        .args(["version", "a.json", "b.json", "c.json"])
        .assert()
        .code(1);
    aloha().arg("publish").assert().code(1);
}

#[test]
fn test_help_exits_zero() {
    aloha()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("version"));
}

#[test]
fn test_check_valid_manifest() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("manifest.json");
    fs::write(
        &manifest,
        r#"{
            "name": "weather",
            "version": "1.0.0",
            "tools": [
                {"name": "weather.forecast", "description": "Forecast",
                 "parameters": [{"name": "city", "type": "string", "description": "City", "required": true}]}
            ]
        }"#,
    )
    .unwrap();

    aloha()
        .arg("check")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("weather v1.0.0"))
        .stdout(predicate::str::contains("weather.forecast(city) - Forecast"))
        .stdout(predicate::str::contains("1 tools declared"));
}

#[test]
fn test_check_invalid_manifest() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("manifest.json");
    fs::write(
        &manifest,
        r#"{"name": "bad", "tools": [{"name": "has space", "description": "x"}]}"#,
    )
    .unwrap();

    aloha()
        .arg("check")
        .arg(&manifest)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid tool name"));
}

#[test]
fn test_render_malformed_url() {
    aloha()
        .args(["render", "not a url"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid URL"));
}

#[test]
fn test_numeric_version_passes_check() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("package.json");
    let manifest = dir.path().join("manifest.json");
    fs::write(&source, r#"{"version":3}"#).unwrap();
    fs::write(&manifest, r#"{"name":"pkg"}"#).unwrap();

    aloha()
        .arg("version")
        .arg(&source)
        .arg(&manifest)
        .assert()
        .success();

    aloha()
        .arg("check")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("pkg v3"));
}

#[test]
fn test_version_refuses_non_object_manifest() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("package.json");
    let manifest = dir.path().join("manifest.json");
    fs::write(&source, r#"{"version":"1.0.0"}"#).unwrap();
    fs::write(&manifest, "null").unwrap();

    aloha()
        .arg("version")
        .arg(&source)
        .arg(&manifest)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not a JSON object"));

    assert_eq!(fs::read_to_string(&manifest).unwrap(), "null");
}
