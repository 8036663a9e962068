use predicates::str::{contains, starts_with};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const DEFINITION: &str = r#"{
  "id": "wf-cli",
  "definitionId": "greeting",
  "root": {
    "typeName": "Tessera.Sequence",
    "id": "root",
    "activities": [
      {"typeName": "Tessera.WriteLine",
       "text": {"typeName": "String", "expression": {"type": "Literal", "value": "hello"}}},
      {"typeName": "Vendor.Unknown", "id": "mystery", "payload": 1}
    ]
  }
}"#;

fn tessera(args: &[&str]) -> Output {
    Command::new(assert_cmd::cargo::cargo_bin!("tessera"))
        .args(args)
        .env("TESSERA_AUTOMATION", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("should run tessera")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn write_definition(dir: &Path) -> String {
    let path = dir.join("greeting.json");
    fs::write(&path, DEFINITION).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_help_lists_commands() {
    let output = tessera(&["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    for command in ["types", "check", "normalize", "provision"] {
        assert!(text.contains(command), "help is missing {command}");
    }
}

#[test]
fn test_types_lists_builtins() {
    let output = tessera(&["types"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("TYPE"));
    assert!(text.contains("Tessera.WriteLine"));
    assert!(text.contains("Tessera.If"));
}

#[test]
fn test_types_json() {
    let output = tessera(&["types", "--json"]);
    assert!(output.status.success());
    let entries: Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["typeName"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names[0], "Tessera.Sequence");
    assert_eq!(names.len(), 5);
}

#[test]
fn test_check_reports_unresolved_nodes() {
    let dir = TempDir::new().unwrap();
    let file = write_definition(dir.path());

    let output = tessera(&["check", &file]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("greeting v1: 3 activities, 1 unresolved"));
    assert!(text.contains("unresolved Vendor.Unknown (mystery)"));
}

#[test]
fn test_check_strict_fails_on_unresolved_nodes() {
    let dir = TempDir::new().unwrap();
    let file = write_definition(dir.path());

    let output = tessera(&["check", &file, "--strict"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not be resolved"));
}

#[test]
fn test_check_json_summary() {
    let dir = TempDir::new().unwrap();
    let file = write_definition(dir.path());

    let output = tessera(&["check", &file, "--json"]);
    assert!(output.status.success());
    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["definitionId"], "greeting");
    assert_eq!(summary["unresolved"][0]["typeName"], "Vendor.Unknown");
}

#[test]
fn test_normalize_to_file_drops_placeholder_fields() {
    let dir = TempDir::new().unwrap();
    let file = write_definition(dir.path());
    let target = dir.path().join("out").join("normalized.json");

    let output = tessera(&["normalize", &file, "-o", target.to_str().unwrap()]);
    assert!(output.status.success());

    let written: Value = serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    let activities = written["root"]["activities"].as_array().unwrap();
    assert_eq!(activities[0]["id"].as_str().unwrap().len(), 32);
    assert_eq!(
        activities[1],
        serde_json::json!({"typeName": "Vendor.Unknown", "id": "mystery"})
    );
    assert_eq!(written["version"], 1);
}

#[test]
fn test_normalize_compact_to_stdout() {
    let dir = TempDir::new().unwrap();
    let file = write_definition(dir.path());

    let output = tessera(&["normalize", &file, "--compact"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert_eq!(text.trim_end().lines().count(), 1);
    let written: Value = serde_json::from_str(text.trim_end()).unwrap();
    assert_eq!(written["definitionId"], "greeting");
}

#[test]
fn test_provision_dry_run_uses_configured_aliases() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("tessera.toml");
    fs::write(
        &config,
        r#"
[store]
document_types = ["WorkflowDefinition", "Bookmark"]

[store.aliases]
WorkflowDefinition = "defs"
Bookmark = "bookmarks"
"#,
    )
    .unwrap();

    let output = tessera(&["provision", "--dry-run", "--config", config.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let lines: Vec<_> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("would create defs_"));
    assert!(lines[1].starts_with("would create bookmarks_"));
}

#[test]
fn test_missing_config_file_fails() {
    let output = tessera(&["types", "--config", "/nonexistent/tessera.toml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_missing_definition_file_fails() {
    let output = tessera(&["check", "/nonexistent/workflow.json"]);
    assert!(!output.status.success());
}

#[test]
fn test_version_flag_prints_crate_version() {
    assert_cmd::Command::cargo_bin("tessera")
        .expect("binary should build")
        .arg("--version")
        .assert()
        .success()
        .stdout(starts_with(format!("tessera {}", tessera::VERSION)));
}

#[test]
fn test_strict_check_explains_failure_on_stderr() {
    let dir = TempDir::new().unwrap();
    let file = write_definition(dir.path());

    assert_cmd::Command::cargo_bin("tessera")
        .expect("binary should build")
        .env("TESSERA_AUTOMATION", "1")
        .args(["check", file.as_str(), "--strict"])
        .assert()
        .failure()
        .stdout(contains("1 unresolved"))
        .stderr(contains("1 activity could not be resolved"));
}
