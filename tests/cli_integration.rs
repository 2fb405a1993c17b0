//! CLI-level tests through the compiled binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn info_reports_environment() {
    let mut cmd = Command::cargo_bin("docsift").unwrap();
    cmd.arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("System Information"))
        .stdout(predicate::str::contains("Conversion Tools"))
        .stdout(predicate::str::contains("Layout Model"));
}

#[test]
fn parse_rejects_missing_input() {
    let mut cmd = Command::cargo_bin("docsift").unwrap();
    cmd.args(["parse", "does_not_exist.pdf"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn parse_fails_cleanly_without_model_or_input_support() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, b"plain text").unwrap();

    // Depending on the environment this fails on the missing model artifact
    // or on the unsupported format; either way it must fail with a
    // descriptive error, not a panic.
    let mut cmd = Command::cargo_bin("docsift").unwrap();
    cmd.arg("parse")
        .arg(&input)
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("docsift").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("info"));
}
