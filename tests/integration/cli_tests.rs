//! CLI integration tests
//!
//! These tests verify that the CLI works correctly with various options.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/cmt")
}

fn cmtquery() -> Command {
    Command::cargo_bin("cmtquery").expect("Binary not found")
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    cmtquery()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cmtquery"))
        .stdout(predicate::str::contains("projects"))
        .stdout(predicate::str::contains("missing"));
}

#[test]
fn test_cli_version() {
    cmtquery()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cmtquery"));
}

#[test]
fn test_cli_requires_subcommand() {
    cmtquery().assert().failure();
}

#[test]
fn test_cli_bad_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "tool = [").unwrap();

    cmtquery()
        .args(["--config", config.to_str().unwrap(), "projects"])
        .arg(dir.path())
        .assert()
        .failure();
}

#[test]
fn test_cli_tool_not_installed_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();

    cmtquery()
        .args(["--tool", "cmtquery-no-such-cmt", "projects"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects reported."));
}

// ============================================================================
// Queries against a stand-in cmt
// ============================================================================

#[cfg(unix)]
fn write_fake_cmt(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
        "#!/bin/sh\n\
         case \"$2 $3\" in\n\
         \"projects -xml\") cat '{}' ;;\n\
         \"uses -xml\") cat '{}' ;;\n\
         \"uses \") cat '{}' 1>&2; exit 1 ;;\n\
         esac\n",
        fixtures_path().join("show_projects.xml").display(),
        fixtures_path().join("show_uses.xml").display(),
        fixtures_path().join("show_uses_stderr.txt").display()
    );

    let path = dir.join("cmt");
    std::fs::write(&path, script).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

#[cfg(unix)]
#[test]
fn test_cli_queries_with_fake_cmt() {
    let dir = tempfile::tempdir().unwrap();
    let tool = write_fake_cmt(dir.path());
    let tool = tool.to_str().unwrap();

    // Terminal tree for projects
    cmtquery()
        .args(["--tool", tool, "projects"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 projects"))
        .stdout(predicate::str::contains("CAPTAIN_EXTERNALS"));

    // JSON for uses
    let output = cmtquery()
        .args(["--tool", tool, "--format", "json", "uses"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["query"], "uses");
    assert_eq!(value["total"], 3);
    assert_eq!(value["records"][1]["type"], "package");
    assert_eq!(value["records"][1]["offset"], "Externals");

    // Missing packages, written to a file
    let report = dir.path().join("missing.json");
    cmtquery()
        .args(["--tool", tool, "-f", "json", "-o", report.to_str().unwrap(), "missing"])
        .arg(dir.path())
        .assert()
        .success();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value["total"], 2);
    assert_eq!(value["exit_status"], 1);
    assert_eq!(value["records"][0]["name"], "eventDisplay");

    // Configuration picked up from the queried directory
    std::fs::write(
        dir.path().join(".cmtquery.yml"),
        format!("tool: {}\nreport:\n  format: json\n", tool),
    )
    .unwrap();
    cmtquery()
        .arg("projects")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"query\": \"projects\""));
}
