use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;

fn cli(dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_manifest-audit"));
    command.current_dir(dir);
    command
}

fn workspace(manifest: &Value) -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("package.json"), manifest.to_string())
        .expect("write package.json");
    dir
}

fn healthy_manifest() -> Value {
    json!({
        "name": "@scope/pkg",
        "version": "1.0.0",
        "private": true,
        "scripts": {
            "dev": "next dev",
            "build": "next build",
            "start": "next start",
            "lint": "next lint"
        },
        "dependencies": {"next": "^15.5.10", "react": "18.2.0", "react-dom": "18.2.0"},
        "devDependencies": {"typescript": "5.3.3"}
    })
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout UTF-8")
}

#[test]
fn healthy_manifest_exits_zero_without_arguments() {
    let dir = workspace(&healthy_manifest());
    let output = cli(dir.path()).output().expect("run manifest-audit");
    assert!(
        output.status.success(),
        "CLI exited with {:?}: {}",
        output.status.code(),
        stdout(&output)
    );
    let text = stdout(&output);
    assert!(text.contains("✓ next is at least 15.5.10"), "{text}");
    assert!(text.contains("Failed: 0"), "{text}");
    assert!(!text.contains('✗'), "{text}");
}

#[test]
fn vulnerable_next_exits_one() {
    let mut manifest = healthy_manifest();
    manifest["dependencies"]["next"] = json!("^15.4.0");
    let dir = workspace(&manifest);
    let output = cli(dir.path()).output().expect("run manifest-audit");
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("✗ next is at least 15.5.10"), "{text}");
    assert!(text.contains("Failures:"), "{text}");
}

#[test]
fn missing_manifest_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = cli(dir.path()).output().expect("run manifest-audit");
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty(), "no checks should run");
    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(stderr.contains("loading manifest"), "{stderr}");
}

#[test]
fn malformed_manifest_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("package.json"), "{ \"name\": ").unwrap();
    let output = cli(dir.path()).output().expect("run manifest-audit");
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
}

#[test]
fn json_format_reports_totals() {
    let mut manifest = healthy_manifest();
    manifest["devDependencies"]["react"] = json!("18.2.0");
    let dir = workspace(&manifest);
    let output = cli(dir.path())
        .args(["--format", "json"])
        .output()
        .expect("run manifest-audit");
    assert_eq!(output.status.code(), Some(1));
    let report: Value = serde_json::from_str(stdout(&output).trim()).expect("JSON report");
    assert_eq!(report["failed"], 1);
    assert_eq!(report["success"], false);
    assert_eq!(
        report["total"].as_u64(),
        Some(report["passed"].as_u64().unwrap() + 1)
    );
}

#[test]
fn explicit_manifest_path_and_config() {
    let dir = tempfile::tempdir().expect("temp dir");
    let manifest_path = dir.path().join("web.json");
    std::fs::write(&manifest_path, healthy_manifest().to_string()).unwrap();
    let config_path = dir.path().join("audit.json");
    std::fs::write(
        &config_path,
        json!({
            "metadata": {"name": "@scope/pkg", "version": "1.0.0"},
            "dependencies": {"pinned": {"typescript": "5.4.0"}}
        })
        .to_string(),
    )
    .unwrap();

    let output = cli(dir.path())
        .args(["--manifest", manifest_path.to_str().unwrap()])
        .args(["--config", config_path.to_str().unwrap()])
        .output()
        .expect("run manifest-audit");
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("✗ pins typescript to 5.4.0"), "{text}");
    assert!(text.contains("✓ has a package name"), "{text}");
}

#[test]
fn list_prints_check_names() {
    let dir = workspace(&healthy_manifest());
    let output = cli(dir.path())
        .args(["--list", "--filter", "security"])
        .output()
        .expect("run manifest-audit");
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "security > next is at least 15.5.10");
}

#[test]
fn filter_matching_nothing_fails() {
    let dir = workspace(&healthy_manifest());
    let output = cli(dir.path())
        .args(["--filter", "no-such-check"])
        .output()
        .expect("run manifest-audit");
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty(), "no checks should run");
    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(stderr.contains("no checks matched filter"), "{stderr}");
}
