//! CLI integration tests
//!
//! These tests verify the CLI commands work correctly by running the
//! binary. They only build when the `cli` feature is enabled:
//! `cargo test --features cli`.

#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::Command;

fn xsdgen_bin() -> &'static str {
    env!("CARGO_BIN_EXE_xsdgen")
}

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

// ============================================================================
// Convert Command Tests
// ============================================================================

#[test]
fn test_cli_convert_writes_modules() {
    let out = tempfile::tempdir().unwrap();
    let output = Command::new(xsdgen_bin())
        .args([
            "convert",
            fixtures_dir().join("library.xsd").to_str().unwrap(),
            "--out",
            out.path().to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "convert should succeed: {}", stdout);
    assert!(stdout.contains("Generated"), "should report unit count");

    assert!(out.path().join("example.com/library.d.ts").exists());
    assert!(out.path().join("example.com/library.js").exists());
    assert!(out.path().join("example.com/types.d.ts").exists());
    assert!(out.path().join("example.com/_index.d.ts").exists());
    assert!(out.path().join("www.w3.org/2001/XMLSchema.d.ts").exists());
}

#[test]
fn test_cli_convert_split_outputs() {
    let out = tempfile::tempdir().unwrap();
    let ts_dir = out.path().join("ts");
    let js_dir = out.path().join("js");

    let output = Command::new(xsdgen_bin())
        .args([
            "convert",
            fixtures_dir().join("book.xsd").to_str().unwrap(),
            "--out-ts",
            ts_dir.to_str().unwrap(),
            "--out-js",
            js_dir.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(ts_dir.join("example.com/book.d.ts").exists());
    assert!(!ts_dir.join("example.com/book.js").exists());
    assert!(js_dir.join("example.com/book.js").exists());
}

#[test]
fn test_cli_convert_missing_schema_fails() {
    let output = Command::new(xsdgen_bin())
        .args(["convert", "/nonexistent/schema.xsd"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error"));
}

// ============================================================================
// Inspect Command Tests
// ============================================================================

#[test]
fn test_cli_inspect_basic() {
    let output = Command::new(xsdgen_bin())
        .args([
            "inspect",
            fixtures_dir().join("book.xsd").to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "inspect should succeed");
    assert!(stdout.contains("xsdgen"), "should show version header");
    assert!(stdout.contains("Namespace: http://example.com/book"));
    assert!(stdout.contains("Book (complex, 3 members)"));
}

#[test]
fn test_cli_inspect_json_output() {
    let output = Command::new(xsdgen_bin())
        .args([
            "inspect",
            "--json",
            fixtures_dir().join("book.xsd").to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let namespaces = parsed["namespaces"].as_array().unwrap();
    assert!(namespaces
        .iter()
        .any(|ns| ns["uri"] == "http://example.com/book"));
}
