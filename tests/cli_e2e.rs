//! End-to-end CLI tests for zapmetrics.
//!
//! These tests run the actual binary against zip exports built on the fly
//! and check stdout, stderr and the written report files.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

// ============================================================================
// Test Fixtures
// ============================================================================

const CHAT: &str = "\
12/01/2024, 9:00 AM - Alice: Bom dia pessoal 😀
12/01/2024, 9:05 AM - Bob: Bom dia! Alguém viu a reunião de amanhã?
12/01/2024, 2:30 PM - Alice: Reunião confirmada para amanhã 👍
continua na linha seguinte
13/01/2024, 11:15 PM - Bob: Combinado, até amanhã 😀";

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    for (name, content) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
}

/// Creates a temporary directory with a regular export and a broken one.
fn setup_fixtures() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    write_zip(
        &dir.path().join("chat.zip"),
        &[
            ("IMG-20240112-WA0001.jpg", b"\xff\xd8\xff"),
            ("WhatsApp Chat com Bob.txt", CHAT.as_bytes()),
        ],
    );
    write_zip(&dir.path().join("media_only.zip"), &[("audio.opus", b"OggS")]);
    fs::write(dir.path().join("not_a_zip.zip"), "plain text").unwrap();
    dir
}

fn zapmetrics() -> Command {
    Command::cargo_bin("zapmetrics").unwrap()
}

fn fixture(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

// ============================================================================
// Basic functionality
// ============================================================================

#[test]
fn test_help() {
    zapmetrics()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_version() {
    zapmetrics()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_markdown_to_stdout() {
    let dir = setup_fixtures();
    zapmetrics()
        .arg("analyze")
        .arg(fixture(&dir, "chat.zip"))
        .assert()
        .success()
        .stdout(predicate::str::contains("# 📊 Análise de Conversa do WhatsApp"))
        .stdout(predicate::str::contains("Participante Alice"))
        .stdout(predicate::str::contains("WhatsApp Chat com Bob.txt"))
        // progress goes to stderr when stdout holds the report
        .stdout(predicate::str::contains("⏳").not())
        .stderr(predicate::str::contains("Found 4 messages from 2 participants"));
}

// ============================================================================
// Output formats
// ============================================================================

#[test]
fn test_json_output_file() {
    let dir = setup_fixtures();
    let output = fixture(&dir, "report.json");

    zapmetrics()
        .arg("analyze")
        .arg(fixture(&dir, "chat.zip"))
        .args(["-f", "json", "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ Done! Report saved to"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["report"]["summary"]["messages"], 4);
    assert_eq!(json["records"].as_array().unwrap().len(), 4);
    assert_eq!(json["report"]["emojis"]["status"], "chart");
}

#[test]
fn test_csv_output_file() {
    let dir = setup_fixtures();
    let output = fixture(&dir, "records.csv");

    zapmetrics()
        .arg("analyze")
        .arg(fixture(&dir, "chat.zip"))
        .args(["-f", "csv", "-o"])
        .arg(&output)
        .assert()
        .success();

    let csv = fs::read_to_string(&output).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Timestamp;Author;Message;Year;Month;YearMonth;Weekday;Hour;Period")
    );
    assert!(csv.contains("2024-01-13 23:15:00;Bob;"));
    assert!(csv.contains(";Noite"));
}

#[test]
fn test_html_output_file() {
    let dir = setup_fixtures();
    let output = fixture(&dir, "report.html");

    zapmetrics()
        .arg("analyze")
        .arg(fixture(&dir, "chat.zip"))
        .args(["-f", "html", "-o"])
        .arg(&output)
        .assert()
        .success();

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("<html"));
    assert!(html.contains("Plotly.newPlot"));
}

#[test]
fn test_format_inferred_from_output_extension() {
    let dir = setup_fixtures();
    let output = fixture(&dir, "report.json");

    zapmetrics()
        .arg("analyze")
        .arg(fixture(&dir, "chat.zip"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Format:  JSON"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["report"]["summary"]["messages"], 4);
}

#[test]
fn test_month_first_flag() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("us.zip");
    write_zip(&input, &[("chat.txt", b"12/31/23, 11:59 PM - Alice: Feliz ano novo")]);

    zapmetrics()
        .arg("analyze")
        .arg(&input)
        .args(["-f", "csv", "--month-first"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2023-12-31 23:59:00;Alice"));
}

// ============================================================================
// Error handling
// ============================================================================

#[test]
fn test_missing_input_file() {
    zapmetrics()
        .args(["analyze", "does_not_exist.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("❌ Error"));
}

#[test]
fn test_archive_without_chat() {
    let dir = setup_fixtures();
    zapmetrics()
        .arg("analyze")
        .arg(fixture(&dir, "media_only.zip"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No .txt file found in archive"));
}

#[test]
fn test_invalid_zip() {
    let dir = setup_fixtures();
    zapmetrics()
        .arg("analyze")
        .arg(fixture(&dir, "not_a_zip.zip"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid zip archive"));
}

#[test]
fn test_unknown_format() {
    let dir = setup_fixtures();
    zapmetrics()
        .arg("analyze")
        .arg(fixture(&dir, "chat.zip"))
        .args(["-f", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_missing_subcommand() {
    zapmetrics().assert().failure();
}
