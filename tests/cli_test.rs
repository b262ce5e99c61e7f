//! Tests that drive the shipready binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn shipready(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shipready"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run shipready")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

fn bare_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("README.md"), "# Bare\n").unwrap();
    dir
}

#[test]
fn test_not_ready_verdict_still_exits_zero() {
    let project = bare_project();
    let out = shipready(&["analyze", path_arg(project.path()), "--no-record", "--quiet"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("NOT_READY"));
    assert!(stdout.contains("RECOMMENDATIONS"));
    // Piped output carries no color codes
    assert!(!stdout.contains('\x1b'));
}

#[test]
fn test_missing_root_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let out = shipready(&["analyze", path_arg(&missing), "--no-record"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("does not exist"));
}

#[test]
fn test_json_format_is_the_run_record() {
    let project = bare_project();
    let out = shipready(&[
        "analyze",
        path_arg(project.path()),
        "--format",
        "json",
        "--no-record",
        "--installer-ok",
        "false",
    ]);
    assert!(out.status.success());

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid JSON");
    assert_eq!(value["run_info"]["tool"], "shipready");
    assert_eq!(value["external_facts"]["installer_ok"], false);
    assert!(value["external_facts"]["packaging_ok"].is_null());
    assert_eq!(value["verdict"]["dimensions"].as_array().unwrap().len(), 6);
}

#[test]
fn test_record_dir_receives_record() {
    let project = bare_project();
    let records = tempfile::tempdir().unwrap();
    let out = shipready(&[
        "analyze",
        path_arg(project.path()),
        "--record-dir",
        path_arg(records.path()),
        "--quiet",
    ]);
    assert!(out.status.success());

    let names: Vec<String> = fs::read_dir(records.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("readiness_report_"));
    assert!(names[0].ends_with(".json"));
}

#[test]
fn test_markdown_written_to_output_file() {
    let project = bare_project();
    let out_dir = tempfile::tempdir().unwrap();
    let summary = out_dir.path().join("summary.md");
    let out = shipready(&[
        "analyze",
        path_arg(project.path()),
        "-f",
        "md",
        "-o",
        path_arg(&summary),
        "--no-record",
        "--quiet",
    ]);
    assert!(out.status.success());

    let content = fs::read_to_string(&summary).unwrap();
    assert!(content.contains("## Dimensions"));
    assert!(out.stdout.is_empty());
}

#[test]
fn test_init_then_config() {
    let project = tempfile::tempdir().unwrap();
    let out = shipready(&["init", path_arg(project.path())]);
    assert!(out.status.success());
    assert!(project.path().join("shipready.toml").exists());

    // Second init refuses to overwrite
    let again = shipready(&["init", path_arg(project.path())]);
    assert!(!again.status.success());

    let shown = shipready(&["config", path_arg(project.path())]);
    assert!(shown.status.success());
    let stdout = String::from_utf8_lossy(&shown.stdout);
    assert!(stdout.contains("shipready.toml"));
    assert!(stdout.contains("large_file_threshold = 200"));
}

#[test]
fn test_invalid_explicit_config_exits_nonzero() {
    let project = bare_project();
    let config = project.path().join("broken.toml");
    fs::write(&config, "version = 7\n").unwrap();
    let out = shipready(&[
        "analyze",
        path_arg(project.path()),
        "--config",
        path_arg(&config),
        "--no-record",
    ]);
    assert!(!out.status.success());
}
