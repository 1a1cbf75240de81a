//! Exit-code checks for both binaries. Every case fails before any network call.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs_err::write(dir.path().join("triage.yaml"), "batch:\n  sleep_seconds: 0\n").unwrap();
    dir
}

fn triage(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("transcript-triage").unwrap();
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("TRIAGE_CONFIG")
        .arg("--config")
        .arg(dir.join("triage.yaml"));
    cmd
}

fn get_transcript(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("get-transcript").unwrap();
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env("TRIAGE_CONFIG", dir.join("triage.yaml"));
    cmd
}

#[test]
fn no_arguments_prints_usage() {
    let dir = workspace();
    triage(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage"))
        .stderr(predicate::str::contains("either --csv or a URL is required"));
}

#[test]
fn single_shot_fetch_failure_exits_two() {
    let dir = workspace();
    triage(dir.path())
        .arg("https://vimeo.com/12345")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Could not extract video ID from URL"));
}

#[test]
fn batch_records_errors_and_succeeds() {
    let dir = workspace();
    fs_err::write(
        dir.path().join("videos.csv"),
        "title,link\nFirst,https://example.com/one\nSecond,https://example.com/two\n",
    )
    .unwrap();

    triage(dir.path())
        .args(["--csv", "videos.csv", "--output", "decisions.csv"])
        .assert()
        .code(0);

    let output = fs_err::read_to_string(dir.path().join("decisions.csv")).unwrap();
    assert_eq!(
        output,
        "title,link,needs_wiki_page\n\
         First,https://example.com/one,error\n\
         Second,https://example.com/two,error\n"
    );
}

#[test]
fn batch_sleep_flag_overrides_config() {
    let dir = workspace();
    fs_err::write(
        dir.path().join("videos.csv"),
        "title,link\nA,https://example.com/a\nB,https://example.com/b\n",
    )
    .unwrap();

    triage(dir.path())
        .args(["--csv", "videos.csv", "--sleep", "0"])
        .assert()
        .code(0);

    let output = fs_err::read_to_string(dir.path().join("output.csv")).unwrap();
    assert_eq!(output.lines().count(), 3);
}

#[test]
fn batch_empty_input_exits_zero() {
    let dir = workspace();
    fs_err::write(dir.path().join("videos.csv"), "").unwrap();

    triage(dir.path())
        .args(["--csv", "videos.csv"])
        .assert()
        .code(0);

    assert!(!dir.path().join("output.csv").exists());
}

#[test]
fn batch_missing_input_exits_one() {
    let dir = workspace();
    triage(dir.path())
        .args(["--csv", "absent.csv"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to open input CSV"));
}

#[test]
fn transcript_tool_without_url_prints_usage() {
    let dir = workspace();
    get_transcript(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage: get-transcript <youtube-url>"));
}

#[test]
fn transcript_tool_bad_url_exits_one() {
    let dir = workspace();
    get_transcript(dir.path())
        .arg("https://vimeo.com/12345")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error: Could not extract video ID from URL"));
}
