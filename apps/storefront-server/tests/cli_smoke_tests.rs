#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the storefront-server binary

use std::fs;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn run_storefront_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_storefront-server"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute storefront-server")
}

fn write_config(dir: &TempDir, contents: &str) -> String {
    let path = dir.path().join("config.yaml");
    fs::write(&path, contents).expect("Failed to write config");
    path.to_string_lossy().into_owned()
}

#[test]
fn test_cli_help_command() {
    let output = run_storefront_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
}

#[test]
fn test_cli_version_command() {
    let output = run_storefront_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("storefront-server"));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_storefront_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report the invalid command");
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_storefront_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("does not exist"),
        "Should indicate config file not found: {stderr}"
    );
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(&temp_dir, "server: [unclosed\n");

    let output = run_storefront_server(&["--config", &config, "check"]);
    assert!(!output.status.success(), "Invalid YAML should fail");
}

#[test]
fn test_cli_check_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        &temp_dir,
        r"
server:
  port: 9123
logging:
  level: warn
resource_api:
  resources:
    - model: products_model
    - model: pages_model
      path: content
",
    );

    let output = run_storefront_server(&["--config", &config, "check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "check should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Configuration is valid"));
    assert!(stdout.contains("Resources: content, products"));
}

#[test]
fn test_cli_check_rejects_duplicate_paths() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        &temp_dir,
        r"
resource_api:
  resources:
    - model: products_model
    - model: goods_model
      path: products
",
    );

    let output = run_storefront_server(&["--config", &config, "check"]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_print_config_applies_port_override() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(&temp_dir, "server:\n  port: 9123\n");

    let output = run_storefront_server(&["--config", &config, "--port", "9555", "--print-config"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Effective configuration:"));
    assert!(stdout.contains("9555"));
}

#[test]
fn test_cli_hash_password() {
    let output = run_storefront_server(&["hash-password", "secret"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
    );
}
