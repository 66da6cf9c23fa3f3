//! CLI argument validation through the compiled binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn fixture(len: usize) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&vec![0xABu8; len]).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("chunked-uploader")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("plan"));
}

#[test]
fn test_no_subcommand_fails() {
    Command::cargo_bin("chunked-uploader")
        .unwrap()
        .assert()
        .failure();
}

#[test]
fn test_plan_prints_chunks() {
    let file = fixture(2500);

    Command::cargo_bin("chunked-uploader")
        .unwrap()
        .args(["plan", "--file"])
        .arg(file.path())
        .args(["--chunk-size", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 chunk(s), 2500 bytes total"))
        .stdout(predicate::str::contains("(last)"));
}

#[test]
fn test_plan_json_output() {
    let file = fixture(1000);

    Command::cargo_bin("chunked-uploader")
        .unwrap()
        .args(["plan", "--file"])
        .arg(file.path())
        .args(["--chunk-size", "1000", "--output-format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"is_last\":true"));
}

#[test]
fn test_plan_missing_file_fails() {
    Command::cargo_bin("chunked-uploader")
        .unwrap()
        .args(["plan", "--file", "/nonexistent/payload.bin"])
        .assert()
        .failure();
}

#[test]
fn test_upload_rejects_zero_chunk_size() {
    let file = fixture(100);

    Command::cargo_bin("chunked-uploader")
        .unwrap()
        .args(["upload", "--file"])
        .arg(file.path())
        .args([
            "--url",
            "http://localhost:8080/upload",
            "--chunk-size",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("chunk size"));
}

#[test]
fn test_upload_rejects_inverted_range() {
    let file = fixture(100);

    Command::cargo_bin("chunked-uploader")
        .unwrap()
        .args(["upload", "--file"])
        .arg(file.path())
        .args([
            "--url",
            "http://localhost:8080/upload",
            "--range",
            "50-10",
        ])
        .assert()
        .failure();
}

#[test]
fn test_upload_rejects_malformed_range() {
    let file = fixture(100);

    Command::cargo_bin("chunked-uploader")
        .unwrap()
        .args(["upload", "--file"])
        .arg(file.path())
        .args(["--url", "http://localhost:8080/upload", "--range", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("START-END"));
}

#[test]
fn test_upload_requires_url() {
    let file = fixture(100);

    Command::cargo_bin("chunked-uploader")
        .unwrap()
        .args(["upload", "--file"])
        .arg(file.path())
        .assert()
        .failure();
}

#[test]
fn test_max_retries_out_of_range_fails() {
    let file = fixture(100);

    Command::cargo_bin("chunked-uploader")
        .unwrap()
        .args(["upload", "--file"])
        .arg(file.path())
        .args([
            "--url",
            "http://localhost:8080/upload",
            "--max-retries",
            "99",
        ])
        .assert()
        .failure();
}
