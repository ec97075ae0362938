// Integration tests for the `rxcheck` binary.

use std::path::PathBuf;
use std::process::{Command, Output};

fn rxcheck_binary() -> PathBuf {
    let path = PathBuf::from(env!("CARGO_BIN_EXE_rxcheck"));
    assert!(path.exists(), "rxcheck binary not found at {}", path.display());
    path
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(rxcheck_binary())
        .args(args)
        .env_remove("RXCHECK_LOG")
        .output()
        .expect("failed to run rxcheck")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn clean_program_exits_zero() {
    let file = fixture("varray_map.json");
    let out = run(&["check", file.to_str().expect("utf-8 path")]);
    assert_eq!(out.status.code(), Some(0), "stdout: {}", stdout(&out));
    assert!(stdout(&out).contains("no findings"));
}

#[test]
fn findings_exit_one_and_render_json() {
    let file = fixture("escalation.json");
    let out = run(&["check", file.to_str().expect("utf-8 path"), "--format", "json"]);
    assert_eq!(out.status.code(), Some(1));
    let diagnostics: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid json");
    assert_eq!(diagnostics[0]["kind"], "EffectEscalation");
    assert_eq!(diagnostics[0]["span"]["line"], 5);
}

#[test]
fn enums_prints_resolved_table() {
    let file = fixture("enums.json");
    let path = file.to_str().expect("utf-8 path");
    let out = run(&["enums", path, "--class", "NormalEnum", "--format", "json"]);
    assert_eq!(out.status.code(), Some(0));
    let tables: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid json");
    let names: Vec<&str> = tables[0]["members"]
        .as_array()
        .expect("members array")
        .iter()
        .filter_map(|m| m["name"].as_str())
        .collect();
    assert_eq!(names, vec!["A", "B", "Z"]);
}

#[test]
fn explicit_config_is_applied() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("rxcheck.toml");
    std::fs::write(&config, "[check]\nparallel = false\n").expect("write config");
    let file = fixture("escalation.json");
    let out = run(&[
        "--config",
        config.to_str().expect("utf-8 path"),
        "check",
        file.to_str().expect("utf-8 path"),
    ]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn bad_policy_and_missing_file_exit_two() {
    let file = fixture("escalation.json");
    let out = run(&["check", file.to_str().expect("utf-8 path"), "--value-conflict", "last_wins"]);
    assert_eq!(out.status.code(), Some(2));

    let out = run(&["check", "does-not-exist.json"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("cannot read"));
}
