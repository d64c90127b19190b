//! End-to-end checks of the playpush binary that never reach Google.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Binary running in an empty directory with no inherited settings
fn playpush(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("playpush").expect("binary builds");
    cmd.env_clear()
        .current_dir(dir.path())
        // anything that slips past validation hits a closed loopback port
        .env("PLAYPUSH_API_BASE", "http://127.0.0.1:9");
    cmd
}

#[test]
fn test_help_lists_channel_argument() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    playpush(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[CHANNEL]"));
}

#[test]
fn test_unknown_channel_fails_before_any_remote_call() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    playpush(&dir)
        .args(["nightly", "--package", "com.example.app", "--key", "missing.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown track 'nightly'"))
        .stderr(predicate::str::contains("key file").not());
}

#[test]
fn test_missing_package_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    playpush(&dir)
        .args(["beta", "--key", "key.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("package name not set"));
}

#[test]
fn test_missing_artifact_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    playpush(&dir)
        .args(["--package", "com.example.app", "--key", "key.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot read artifact"));
}

#[test]
fn test_missing_key_file_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("app.apk"), b"PK\x03\x04").unwrap();

    playpush(&dir)
        .args(["--package", "com.example.app", "--key", "missing.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read key file"));
}

#[test]
fn test_token_failure_aborts_run() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("app.apk"), b"PK\x03\x04").unwrap();

    playpush(&dir)
        .arg("beta")
        .env("PLAYPUSH_PACKAGE", "com.example.app")
        .env("PLAYPUSH_KEY", fixture("service-account.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[1/5] Authorizing"))
        .stdout(predicate::str::contains("[2/5]").not())
        .stderr(predicate::str::contains("Authorization failed"));
}

#[test]
fn test_failure_is_reported_once_on_stderr() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("app.apk"), b"PK\x03\x04").unwrap();

    let output = playpush(&dir)
        .args(["--package", "com.example.app"])
        .env("PLAYPUSH_KEY", fixture("service-account.json"))
        .output()
        .expect("binary runs");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Authorization failed").count(), 1);
}

#[test]
fn test_json_mode_keeps_progress_off_stdout() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("app.apk"), b"PK\x03\x04").unwrap();

    playpush(&dir)
        .args(["--package", "com.example.app", "--json"])
        .env("PLAYPUSH_KEY", fixture("service-account.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_settings_file_is_read_from_working_directory() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(
        dir.path().join("playpush.toml"),
        "channel = \"canary\"\npackage = \"com.example.app\"\nkey = \"key.json\"\n",
    )
    .unwrap();

    playpush(&dir)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown track 'canary'"));
}

#[test]
fn test_explicit_settings_file_must_exist() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    playpush(&dir)
        .args(["--config", "absent.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("absent.toml"));
}
