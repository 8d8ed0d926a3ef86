//! CLI contract tests
//!
//! Runs the compiled binary against the Java fixtures and checks output
//! formats, exit codes and batch behaviour. No test reaches an LLM.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn seleniport_bin() -> &'static str {
    env!("CARGO_BIN_EXE_seleniport")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Run with an isolated config directory
fn run(args: &[&str], config_home: &Path) -> Output {
    Command::new(seleniport_bin())
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("RUST_LOG")
        .env_remove("SELENIPORT_BACKEND")
        .output()
        .expect("failed to run seleniport")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn workspace_with(files: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let tests = dir.path().join("tests");
    std::fs::create_dir_all(&tests).unwrap();
    for name in files {
        std::fs::copy(fixture(name), tests.join(name)).unwrap();
    }
    dir
}

#[test]
fn test_parse_single_file_json() {
    let home = tempfile::tempdir().unwrap();
    let path = fixture("LoginTest.java");
    let output = run(&["parse", path.to_str().unwrap()], home.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(json["class_name"], "LoginTest");
    assert_eq!(json["uses_test_framework"], true);
    let calls = json["methods"][0]["calls"].as_array().unwrap();
    assert_eq!(calls.len(), 6);
    assert_eq!(calls[0]["method"], "findElement");
    assert_eq!(calls[0]["qualifier"], "driver");
    assert_eq!(calls[5]["method"], "click");
}

#[test]
fn test_parse_compact_is_single_line() {
    let home = tempfile::tempdir().unwrap();
    let path = fixture("LoginTest.java");
    let output = run(&["parse", path.to_str().unwrap(), "--compact"], home.path());
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end().lines().count(), 1);
}

#[test]
fn test_parse_malformed_file_fails() {
    let home = tempfile::tempdir().unwrap();
    let path = fixture("Broken.java");
    let output = run(&["parse", path.to_str().unwrap()], home.path());
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("Java syntax error"), "stderr: {}", stderr(&output));
}

#[test]
fn test_parse_directory_continues_past_failures() {
    let home = tempfile::tempdir().unwrap();
    let dir = workspace_with(&["Broken.java", "CheckoutTest.java", "LoginTest.java"]);
    let tests = dir.path().join("tests");
    let output = run(&["parse", tests.to_str().unwrap()], home.path());

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries[0]["error"].as_str().unwrap().contains("Java syntax error"));
    assert_eq!(entries[1]["metadata"]["class_name"], "CheckoutTest");
    assert_eq!(entries[2]["metadata"]["class_name"], "LoginTest");
    assert!(stderr(&output).contains("1 of 3 files failed to parse"));
}

#[test]
fn test_parse_directory_all_valid_succeeds() {
    let home = tempfile::tempdir().unwrap();
    let dir = workspace_with(&["CheckoutTest.java", "LoginTest.java"]);
    let tests = dir.path().join("tests");
    let output = run(&["parse", tests.to_str().unwrap(), "--format", "text"], home.path());

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = console::strip_ansi_codes(&stdout(&output)).to_string();
    assert!(text.contains("Class: CheckoutTest"));
    assert!(text.contains("@BeforeMethod setUp"));
    assert!(text.contains("2 parsed, 0 failed, 2 total"));
}

#[test]
fn test_parse_output_file() {
    let home = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("metadata.json");
    let path = fixture("LoginTest.java");
    let output = run(
        &["parse", path.to_str().unwrap(), "-o", out.to_str().unwrap()],
        home.path(),
    );
    assert!(output.status.success());
    let written = std::fs::read_to_string(&out).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).expect("valid JSON");
    assert_eq!(json["file_name"].as_str().unwrap(), path.to_str().unwrap());
}

#[test]
fn test_parse_missing_path() {
    let home = tempfile::tempdir().unwrap();
    let output = run(&["parse", "/nonexistent/Nope.java"], home.path());
    assert!(!output.status.success());
    assert!(stderr(&output).contains("not a valid file or directory"));
}

#[test]
fn test_convert_dry_run_prints_prompt_and_writes_nothing() {
    let home = tempfile::tempdir().unwrap();
    let dir = workspace_with(&["LoginTest.java"]);
    let input = dir.path().join("tests/LoginTest.java");
    let out = dir.path().join("out");
    let output = run(
        &[
            "convert",
            input.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "-l",
            "javascript",
            "--dry-run",
        ],
        home.path(),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("login-test.spec.js"));
    assert!(text.contains("Convert this Selenium Java code to Playwright JavaScript"));
    assert!(text.contains("- testLogin [@Test]"));
    assert!(!out.exists());
}

#[test]
fn test_convert_dry_run_reports_parse_failure() {
    let home = tempfile::tempdir().unwrap();
    let path = fixture("Broken.java");
    let output = run(&["convert", path.to_str().unwrap(), "--dry-run"], home.path());
    assert!(!output.status.success());
    assert!(stdout(&output).contains("Java syntax error"));
}

#[test]
fn test_convert_hosted_backend_without_key_fails() {
    let home = tempfile::tempdir().unwrap();
    let path = fixture("LoginTest.java");
    let output = Command::new(seleniport_bin())
        .args(["convert", path.to_str().unwrap(), "--backend", "anthropic"])
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("ANTHROPIC_API_KEY")
        .output()
        .expect("failed to run seleniport");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("ANTHROPIC_API_KEY"));
}

#[test]
fn test_doctor_fails_when_backend_is_unusable() {
    let home = tempfile::tempdir().unwrap();
    let output = Command::new(seleniport_bin())
        .arg("doctor")
        .env("XDG_CONFIG_HOME", home.path())
        .env("SELENIPORT_BACKEND", "anthropic")
        .env_remove("ANTHROPIC_API_KEY")
        .output()
        .expect("failed to run seleniport");
    assert!(!output.status.success());
    let out = stdout(&output);
    assert!(out.contains("✓ Java grammar: OK"), "stdout: {}", out);
    assert!(out.contains("ANTHROPIC_API_KEY not set"), "stdout: {}", out);
    assert!(stderr(&output).contains("doctor found problems"));
}

#[test]
fn test_version() {
    let home = tempfile::tempdir().unwrap();
    let output = run(&["version"], home.path());
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("seleniport "));
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_init_writes_example() {
    let home = tempfile::tempdir().unwrap();
    let output = run(&["config", "init"], home.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let written = std::fs::read_to_string(home.path().join("seleniport/config.toml")).unwrap();
    assert!(written.contains("[ai]"));
    assert!(written.contains("[convert]"));

    let output = run(&["config", "show"], home.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("AI Backend: ollama"));
}
