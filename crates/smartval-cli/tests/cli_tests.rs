//! Integration tests for the smartval binary.

use assert_cmd::Command;
use std::io::Write;
use tempfile::NamedTempFile;

fn json_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn smartval() -> Command {
    let mut cmd = Command::cargo_bin("smartval").unwrap();
    for var in [
        "SMARTVAL_LEGACY_DATES",
        "SMARTVAL_CAST_FIRST_TYPE",
        "SMARTVAL_KEY_STYLE",
        "SMARTVAL_DATE_LAYOUTS",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn stdout_of(cmd: &mut Command) -> (bool, String) {
    let output = cmd.output().unwrap();
    (
        output.status.success(),
        String::from_utf8(output.stdout).unwrap(),
    )
}

const RULES: &str = r#"{
    "username": "string|required|min:6",
    "age": "int|required|min:18",
    "event_date": "required|format:Y-m-d"
}"#;

#[test]
fn check_prints_validated_record() {
    let data = json_file(r#"{"username": "john_doe", "age": "30", "event_date": "2024-03-05"}"#);
    let rules = json_file(RULES);

    let (ok, stdout) = stdout_of(
        smartval()
            .arg("check")
            .arg("--data")
            .arg(data.path())
            .arg("--rules")
            .arg(rules.path()),
    );

    assert!(ok);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["age"], 30);
    assert_eq!(value["username"], "john_doe");
}

#[test]
fn check_reads_stdin_and_renders_object_view() {
    let rules = json_file(RULES);

    let (ok, stdout) = stdout_of(
        smartval()
            .args(["check", "--data", "-", "--view", "object", "--camel-case"])
            .arg("--rules")
            .arg(rules.path())
            .write_stdin(r#"{"event_date": "2024-03-05"}"#),
    );

    assert!(ok);
    assert!(stdout.contains("eventDate"));
    assert!(stdout.contains("\"2024-03-05\""));
}

#[test]
fn check_fails_with_error_envelope() {
    let data = json_file(r#"{"username": "joh", "age": 15}"#);
    let rules = json_file(RULES);

    let (ok, stdout) = stdout_of(
        smartval()
            .arg("check")
            .arg("--data")
            .arg(data.path())
            .arg("--rules")
            .arg(rules.path()),
    );

    assert!(!ok);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["error"]["type"], "validation_error");
    assert_eq!(value["error"]["fields"][0]["field"], "username");
    assert_eq!(value["error"]["fields"][0]["code"], "min");
}

#[test]
fn check_rejects_non_object_data() {
    let data = json_file("[1, 2, 3]");
    let rules = json_file(RULES);

    smartval()
        .arg("check")
        .arg("--data")
        .arg(data.path())
        .arg("--rules")
        .arg(rules.path())
        .assert()
        .failure();
}

#[test]
fn check_honours_environment_config() {
    let data = json_file(r#"{"event_date": "2024-03-05"}"#);
    let rules = json_file(RULES);

    let (ok, stdout) = stdout_of(
        smartval()
            .env("SMARTVAL_KEY_STYLE", "camel_case")
            .arg("check")
            .arg("--data")
            .arg(data.path())
            .arg("--rules")
            .arg(rules.path()),
    );

    assert!(ok);
    assert!(stdout.contains("eventDate"));
}

#[test]
fn explain_lists_rules() {
    let (ok, stdout) = stdout_of(smartval().args(["explain", "nullable|int|min:18"]));

    assert!(ok);
    assert!(stdout.contains("min"));
    assert!(stdout.contains("parameter: 18"));
    assert!(stdout.contains("short-circuit"));
}

#[test]
fn explain_fails_on_unknown_rules() {
    smartval()
        .args(["explain", "string|frobnicate"])
        .assert()
        .failure();
}

#[test]
fn formats_lists_layouts_in_order() {
    let (ok, stdout) = stdout_of(smartval().arg("formats"));

    assert!(ok);
    let ymd = stdout.find("Y-m-d").unwrap();
    let dmy = stdout.find("d/m/Y").unwrap();
    assert!(ymd < dmy);
    assert!(stdout.contains("2024-03-05"));
}

#[test]
fn rules_lists_both_catalogs() {
    let (ok, stdout) = stdout_of(smartval().arg("rules"));

    assert!(ok);
    assert!(stdout.contains("email"));
    assert!(stdout.contains("before"));
}
