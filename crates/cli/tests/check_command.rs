// Integration tests for `transcheck check` and `transcheck project`.
// Run with: cargo test -p transcheck-cli --test check_command

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use httpmock::prelude::*;
use rust_xlsxwriter::Workbook;

fn transcheck(config_home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_transcheck"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    // Keep a real settings file or endpoint out of the tests
    cmd.env_remove("TRANSCHECK_API_BASE");
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd.env("HOME", config_home);
    cmd
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Workbook with one sheet per entry, each ending on the given row.
fn write_workbook(dir: &Path, name: &str, sheets: &[(&str, u32)]) -> PathBuf {
    let mut workbook = Workbook::new();
    for (sheet_name, last_row) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*sheet_name).unwrap();
        sheet.write_string(0, 0, "source").unwrap();
        sheet.write_string(last_row - 1, 1, "translation").unwrap();
    }
    let path = dir.join(name);
    workbook.save(&path).unwrap();
    path
}

fn mock_project(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/api/project/acme");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(serde_json::json!({
                "project": { "name": "Acme Game", "description": "Chapter 3" },
                "termDictVersion": "2026-10-01",
                "errDictVersion": "2026-09-12"
            }));
    });
}

fn assert_exit(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "expected exit {}, got {:?}\nstderr: {}",
        code,
        output.status.code(),
        stderr(output),
    );
}

#[test]
fn clean_submission_saves_result() {
    let server = MockServer::start();
    mock_project(&server);
    let check = server.mock(|when, then| {
        when.method(POST).path("/api/check");
        then.status(200).body("annotated workbook");
    });

    let tmp = tempfile::tempdir().unwrap();
    let file = write_workbook(tmp.path(), "glossary.xlsx", &[("Sheet1", 100)]);
    let out_dir = tmp.path().join("results");

    let output = transcheck(tmp.path())
        .args(["--api-base", &server.base_url(), "check"])
        .arg(&file)
        .args(["--project", "acme", "--input", "b", "--output1", "C", "--output2", "D", "--out-dir"])
        .arg(&out_dir)
        .output()
        .expect("failed to run transcheck");

    assert_exit(&output, 0);
    check.assert();

    let saved = out_dir.join("checked_glossary.xlsx");
    assert_eq!(std::fs::read(&saved).unwrap(), b"annotated workbook");
    assert!(String::from_utf8_lossy(&output.stdout).contains("checked_glossary.xlsx"));

    let err = stderr(&output);
    assert!(err.contains("Translation check: Acme Game"), "stderr: {}", err);
    assert!(err.contains("Uploading file..."), "stderr: {}", err);
}

#[test]
fn too_many_rows_never_uploads() {
    let server = MockServer::start();
    mock_project(&server);
    let check = server.mock(|when, then| {
        when.method(POST).path("/api/check");
        then.status(200).body("unused");
    });

    let tmp = tempfile::tempdir().unwrap();
    let file = write_workbook(tmp.path(), "big.xlsx", &[("Small", 10), ("Data", 80_000)]);

    let output = transcheck(tmp.path())
        .args(["--api-base", &server.base_url(), "check"])
        .arg(&file)
        .args(["--project", "acme", "--input", "B", "--output1", "C", "--output2", "D"])
        .output()
        .expect("failed to run transcheck");

    assert_exit(&output, 5);
    assert_eq!(check.hits(), 0);
    let err = stderr(&output);
    assert!(err.contains("Too many rows"), "stderr: {}", err);
    assert!(err.contains("Sheet \"Data\": 80000 rows"), "stderr: {}", err);
    assert!(!err.contains("\"Small\""), "stderr: {}", err);
}

#[test]
fn duplicate_columns_rejected_before_upload() {
    let server = MockServer::start();
    mock_project(&server);
    let check = server.mock(|when, then| {
        when.method(POST).path("/api/check");
        then.status(200).body("unused");
    });

    let tmp = tempfile::tempdir().unwrap();
    let file = write_workbook(tmp.path(), "dup.xlsx", &[("Sheet1", 5)]);

    let output = transcheck(tmp.path())
        .args(["--api-base", &server.base_url(), "check"])
        .arg(&file)
        .args(["--project", "acme", "--input", "A", "--output1", "A", "--output2", "B"])
        .output()
        .expect("failed to run transcheck");

    assert_exit(&output, 4);
    assert_eq!(check.hits(), 0);
    assert!(stderr(&output).contains("first output column"));
}

#[test]
fn bad_columns_rejected_before_reading_file() {
    let server = MockServer::start();
    mock_project(&server);
    let check = server.mock(|when, then| {
        when.method(POST).path("/api/check");
        then.status(200).body("unused");
    });

    // Not a workbook: reading it would exit 5, so exit 4 means it was never opened.
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("notes.xlsx");
    std::fs::write(&file, "plain text").unwrap();

    let output = transcheck(tmp.path())
        .args(["--api-base", &server.base_url(), "check"])
        .arg(&file)
        .args(["--project", "acme", "--input", "A", "--output1", "A", "--output2", "B"])
        .output()
        .expect("failed to run transcheck");

    assert_exit(&output, 4);
    assert_eq!(check.hits(), 0);
    let err = stderr(&output);
    assert!(err.contains("first output column"), "stderr: {}", err);
    assert!(!err.contains("File error"), "stderr: {}", err);
}

#[test]
fn server_error_message_shown() {
    let server = MockServer::start();
    mock_project(&server);
    server.mock(|when, then| {
        when.method(POST).path("/api/check");
        then.status(500).json_body(serde_json::json!({ "error": "dictionary unavailable" }));
    });

    let tmp = tempfile::tempdir().unwrap();
    let file = write_workbook(tmp.path(), "ok.xlsx", &[("Sheet1", 5)]);

    let output = transcheck(tmp.path())
        .args(["--api-base", &server.base_url(), "check"])
        .arg(&file)
        .args(["--project", "acme", "--mode", "spec", "--input", "A", "--output1", "E", "--hint"])
        .output()
        .expect("failed to run transcheck");

    assert_exit(&output, 7);
    assert!(stderr(&output).contains("error: dictionary unavailable"));
}

#[test]
fn page_without_project_makes_no_request() {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.method(GET);
        then.status(200);
    });

    let tmp = tempfile::tempdir().unwrap();
    let output = transcheck(tmp.path())
        .args(["--api-base", &server.base_url(), "project", "--page-url", "http://qa.local/index.html"])
        .output()
        .expect("failed to run transcheck");

    assert_exit(&output, 3);
    assert_eq!(any.hits(), 0);
}

#[test]
fn unknown_project_exits_3() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/project/ghost");
        then.status(404).json_body(serde_json::json!({ "error": "invalid project" }));
    });

    let tmp = tempfile::tempdir().unwrap();
    let output = transcheck(tmp.path())
        .args(["--api-base", &server.base_url(), "project", "--page-url", "http://qa.local/index.html?project=ghost"])
        .output()
        .expect("failed to run transcheck");

    assert_exit(&output, 3);
    assert!(stderr(&output).contains("Project 'ghost' not found"));
}

#[test]
fn project_header_printed() {
    let server = MockServer::start();
    mock_project(&server);

    let tmp = tempfile::tempdir().unwrap();
    let output = transcheck(tmp.path())
        .args(["--api-base", &server.base_url(), "project", "--project", "acme"])
        .output()
        .expect("failed to run transcheck");

    assert_exit(&output, 0);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Translation check: Acme Game"));
    assert!(stdout.contains("Chapter 3"));
    assert!(stdout.contains("Term dictionary updated: 2026-10-01 | Error dictionary updated: 2026-09-12"));
}

#[test]
fn missing_file_exits_2() {
    let tmp = tempfile::tempdir().unwrap();
    let output = transcheck(tmp.path())
        .args(["check", "/nonexistent/book.xlsx", "--project", "acme", "--input", "A", "--output1", "B"])
        .output()
        .expect("failed to run transcheck");

    assert_exit(&output, 2);
}

#[test]
fn target_is_required() {
    let tmp = tempfile::tempdir().unwrap();
    let output = transcheck(tmp.path())
        .args(["check", "book.xlsx", "--input", "A", "--output1", "B"])
        .output()
        .expect("failed to run transcheck");

    assert_exit(&output, 2);
}
