//! CLI argument parsing and offline command tests.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CLEAN: &str = "Shipping a SwiftUI app taught our team to profile before optimizing anything.";

fn draftfix() -> Command {
    let mut cmd = Command::cargo_bin("draftfix").expect("draftfix binary");
    cmd.env_remove("ANTHROPIC_API_KEY");
    cmd
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_check_clean_text_exits_zero() {
    let temp = TempDir::new().unwrap();
    let file = write(temp.path(), "post.txt", CLEAN);

    draftfix()
        .current_dir(temp.path())
        .args(["check", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains(": ok"));
}

#[test]
fn test_check_violation_exits_two() {
    let temp = TempDir::new().unwrap();
    let file = write(
        temp.path(),
        "post.json",
        &format!(r#"{{"id": "post-1", "content": "True story: {CLEAN}"}}"#),
    );

    draftfix()
        .current_dir(temp.path())
        .args(["check", &file])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("post-1: 1 violation(s)"))
        .stdout(predicate::str::contains(
            "Fabrication marker detected: 'true story'",
        ));
}

#[test]
fn test_check_platform_enables_length_rule() {
    let temp = TempDir::new().unwrap();
    let long = CLEAN.repeat(5);
    let file = write(temp.path(), "post.txt", &long);

    draftfix()
        .current_dir(temp.path())
        .args(["check", &file])
        .assert()
        .success();

    draftfix()
        .current_dir(temp.path())
        .args(["check", &file, "--platform", "x"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Content exceeds x limit"));
}

#[test]
fn test_check_json_format() {
    let temp = TempDir::new().unwrap();
    let file = write(temp.path(), "post.json", r#"{"id": "p", "content": ""}"#);

    let output = draftfix()
        .current_dir(temp.path())
        .args(["check", &file, "--format", "json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["id"], "p");
    assert_eq!(json["needs_repair"], true);
    assert_eq!(json["violations"][0], "Content is empty or too short");
}

#[test]
fn test_config_file_disables_rule() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "draftfix.toml", "[rules]\ndisabled = [\"non-empty\"]\n");
    let file = write(temp.path(), "post.txt", "short");

    draftfix()
        .current_dir(temp.path())
        .args(["check", &file])
        .assert()
        .success();
}

#[test]
fn test_cli_marker_extends_defaults() {
    let temp = TempDir::new().unwrap();
    let file = write(
        temp.path(),
        "post.txt",
        &format!("{CLEAN} My old boss said so."),
    );

    draftfix()
        .current_dir(temp.path())
        .args(["check", &file, "--marker", "my old boss said"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("'my old boss said'"));
}

#[test]
fn test_root_flag_selects_config_dir() {
    let temp = TempDir::new().unwrap();
    let cfg_dir = temp.path().join("cfg");
    fs::create_dir_all(&cfg_dir).unwrap();
    write(&cfg_dir, "draftfix.toml", "[rules]\nmin_chars = 3\n");
    let file = write(temp.path(), "post.txt", "tiny");

    draftfix()
        .current_dir(temp.path())
        .args(["check", &file, "--root", cfg_dir.to_str().unwrap()])
        .assert()
        .success();
}

#[test]
fn test_invalid_config_is_tool_error() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "draftfix.toml", "[rules]\nmax_depth = 9\n");
    let file = write(temp.path(), "post.txt", CLEAN);

    draftfix()
        .current_dir(temp.path())
        .args(["check", &file])
        .assert()
        .code(1);
}

#[test]
fn test_unknown_disabled_rule_is_tool_error() {
    let temp = TempDir::new().unwrap();
    let file = write(temp.path(), "post.txt", CLEAN);

    draftfix()
        .current_dir(temp.path())
        .args(["check", &file, "--disable", "spelling"])
        .assert()
        .code(1);
}

#[test]
fn test_unknown_platform_rejected_by_parser() {
    let temp = TempDir::new().unwrap();
    let file = write(temp.path(), "post.txt", CLEAN);

    draftfix()
        .current_dir(temp.path())
        .args(["check", &file, "--platform", "myspace"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("myspace"));
}

#[test]
fn test_prompt_prints_instruction() {
    let temp = TempDir::new().unwrap();
    let file = write(
        temp.path(),
        "post.json",
        &format!(r#"{{"id": "secret-id-42", "content": "Fun fact about me: {CLEAN}"}}"#),
    );

    draftfix()
        .current_dir(temp.path())
        .args(["prompt", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "The following content rules were violated: Fabrication marker detected: 'fun fact about me'.",
        ))
        .stdout(predicate::str::contains(CLEAN))
        .stdout(predicate::str::contains("secret-id-42").not());
}

#[test]
fn test_prompt_clean_input_prints_nothing() {
    let temp = TempDir::new().unwrap();
    let file = write(temp.path(), "post.txt", CLEAN);

    draftfix()
        .current_dir(temp.path())
        .args(["prompt", &file])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_repair_without_api_key_fails() {
    let temp = TempDir::new().unwrap();
    let file = write(temp.path(), "post.txt", CLEAN);

    draftfix()
        .current_dir(temp.path())
        .args(["repair", &file])
        .assert()
        .code(1);
}

#[test]
fn test_generate_requires_pillar() {
    draftfix()
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--pillar"));
}

#[test]
fn test_missing_input_file_is_tool_error() {
    let temp = TempDir::new().unwrap();
    draftfix()
        .current_dir(temp.path())
        .args(["check", "does-not-exist.txt"])
        .assert()
        .code(1);
}

#[test]
fn test_explain_known_rule() {
    draftfix()
        .args(["explain", "fabrication_marker"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RULE: Fabrication Markers"))
        .stdout(predicate::str::contains("REMEDIATION GUIDANCE"));
}

#[test]
fn test_explain_unknown_rule_fails() {
    draftfix().args(["explain", "spelling"]).assert().code(1);
}

#[test]
fn test_list_rules_text() {
    draftfix()
        .arg("list-rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("fabrication-marker"))
        .stdout(predicate::str::contains("platform-length"))
        .stdout(predicate::str::contains("non-empty"));
}

#[test]
fn test_list_rules_json() {
    let output = draftfix()
        .args(["list-rules", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rules: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = rules.iter().filter_map(|r| r["id"].as_str()).collect();
    assert_eq!(ids, vec!["fabrication-marker", "platform-length", "non-empty"]);
}
