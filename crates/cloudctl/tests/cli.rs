//! Binary-level tests for `cloudctl`.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn cloudctl() -> Command {
    let mut cmd = Command::cargo_bin("cloudctl").expect("binary should build");
    cmd.env_remove("CLOUDCTL_URL")
        .env_remove("CLOUDCTL_TOKEN")
        .env_remove("RUST_LOG")
        // Keep the user's configuration file out of the tests.
        .env("HOME", std::env::temp_dir());
    cmd
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("failed to write temp file");
    file
}

#[test]
fn help_lists_commands() {
    cloudctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dashboard"))
        .stdout(predicate::str::contains("cluster"));
}

#[test]
fn version_works_without_api() {
    cloudctl()
        .args(["version", "-o", "template", "--template", "{{ .client }}"])
        .assert()
        .success()
        .stdout(format!("{}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_url_is_reported() {
    cloudctl()
        .args(["cluster", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API URL configured"));
}

#[test]
fn unknown_theme_is_rejected() {
    cloudctl()
        .args(["dashboard", "--color-theme", "neon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("neon"));
}

#[test]
fn unreachable_api_fails_with_error() {
    cloudctl()
        .args(["--url", "http://127.0.0.1:1", "tenant", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent.toml");
    cloudctl()
        .arg("--config")
        .arg(&missing)
        .arg("health")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn invalid_config_fails() {
    let file = config_file("[dashboard]\nrefresh_interval_secs = 0\n");
    cloudctl()
        .arg("--config")
        .arg(file.path())
        .arg("health")
        .assert()
        .failure()
        .stderr(predicate::str::contains("refresh_interval_secs"));
}

#[test]
fn template_output_requires_template() {
    cloudctl()
        .args(["--url", "http://127.0.0.1:1", "-o", "template", "health"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--template"));
}
