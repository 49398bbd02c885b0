// ABOUTME: Integration tests for the ythide CLI binary.
// ABOUTME: Tests text/JSON listing, hidden-page output, settings files, and argument errors.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn ythide_cmd() -> Command {
    Command::cargo_bin("ythide").unwrap()
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn lists_watched_videos_as_text() {
    ythide_cmd()
        .arg(fixture("search.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("#SrWatched2\t100%\tSearch result two"))
        .stdout(predicate::str::contains("SrWatched1").not());
}

#[test]
fn threshold_flag_overrides_default() {
    ythide_cmd()
        .arg(fixture("search.html"))
        .arg("--threshold")
        .arg("80")
        .assert()
        .success()
        .stdout(predicate::str::contains("#SrWatched1\t88%\tSearch result one"));
}

#[test]
fn json_output_lists_ids_and_urls() {
    let output = ythide_cmd()
        .arg(fixture("watch.html"))
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let videos: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let videos = videos.as_array().unwrap();
    assert_eq!(videos.len(), 3);
    assert_eq!(videos[0]["video_id"], "PlPanel001");
    assert_eq!(videos[0]["title"], "Panel entry one");
    assert_eq!(videos[0]["progress"], 100);
    assert_eq!(
        videos[2]["url"],
        "https://www.youtube.com/watch?v=RcLockup02"
    );
    assert!(videos[1]["id"].as_str().unwrap().ends_with("#RcCompact1"));
}

#[test]
fn hide_writes_page_with_watched_hidden() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("hidden.html");

    ythide_cmd()
        .arg(fixture("home.html"))
        .arg("--hide")
        .arg("-o")
        .arg(&output_path)
        .assert()
        .success();

    let html = fs::read_to_string(&output_path).unwrap();
    assert_eq!(html.matches("display: none;").count(), 2);
    assert!(html.contains("Never opened"));
}

#[test]
fn settings_file_limits_layouts() {
    ythide_cmd()
        .arg(fixture("home.html"))
        .arg("--settings")
        .arg(fixture("settings.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("HmWatched1").not());
}

#[test]
fn disabled_settings_hide_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.json");
    fs::write(&settings_path, r#"{"enabled": false}"#).unwrap();

    ythide_cmd()
        .arg(fixture("search.html"))
        .arg("--settings")
        .arg(&settings_path)
        .arg("--hide")
        .assert()
        .success()
        .stdout(predicate::str::contains("display: none").not());
}

#[test]
fn unknown_layout_in_settings_fails() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.json");
    fs::write(&settings_path, r#"{"layouts": ["shorts"]}"#).unwrap();

    ythide_cmd()
        .arg(fixture("search.html"))
        .arg("--settings")
        .arg(&settings_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown layout \"shorts\""));
}

#[test]
fn out_of_range_threshold_fails() {
    ythide_cmd()
        .arg(fixture("search.html"))
        .arg("--threshold")
        .arg("101")
        .assert()
        .failure()
        .stderr(predicate::str::contains("threshold must be between 0 and 100"));
}

#[test]
fn missing_file_fails() {
    ythide_cmd()
        .arg("does-not-exist.html")
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading file"));
}

#[test]
fn verbose_logs_counts_to_stderr() {
    ythide_cmd()
        .arg(fixture("search.html"))
        .arg("-v")
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("extracted watched videos"));
}
