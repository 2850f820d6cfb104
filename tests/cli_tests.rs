//! CLI integration tests for the `scratch` demo tool

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The demo binary with an isolated config dir and colors off
fn scratch_bin(config_home: &TempDir) -> Command {
    let mut command = Command::cargo_bin("tool-runner").expect("binary is built");
    command
        .env("XDG_CONFIG_HOME", config_home.path())
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .env_remove("SCRATCH_VERBOSITY")
        .env_remove("SCRATCH_LOG_LEVEL");
    command
}

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    scratch_bin(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("--log-level"))
        .stdout(predicate::str::contains("Application log level"))
        .stdout(predicate::str::contains("Log level for non-application logs"))
        .stdout(predicate::str::contains("--fail"));
}

#[test]
fn success_reports_on_both_channels() {
    let home = TempDir::new().unwrap();
    scratch_bin(&home)
        .args(["hello", "--unknown", "-l", "info"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("note.txt"))
        .stderr(predicate::str::contains("scratch INFO Running in ."))
        .stderr(predicate::str::contains("scratch SUCCESS Done"))
        .stderr(predicate::str::contains("stdout: INFO"))
        .stderr(predicate::str::contains("Tempdir created").not());
}

#[test]
fn stdout_is_quiet_at_default_log_level() {
    let home = TempDir::new().unwrap();
    scratch_bin(&home)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("scratch SUCCESS Done"));
}

#[test]
fn handled_failure_exits_with_one() {
    let home = TempDir::new().unwrap();
    scratch_bin(&home)
        .arg("--fail")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "scratch ERROR Failure requested with --fail",
        ))
        .stderr(predicate::str::contains("Done").not());
}

#[test]
fn invalid_level_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    scratch_bin(&home)
        .args(["--verbosity", "loud"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("loud"));
}

#[test]
fn log_level_reveals_library_records() {
    let home = TempDir::new().unwrap();
    scratch_bin(&home)
        .args(["-l", "info"])
        .assert()
        .success()
        .stderr(predicate::str::contains("scratch::note: INFO wrote"));

    scratch_bin(&home)
        .assert()
        .success()
        .stderr(predicate::str::contains("scratch::note").not());
}

#[test]
fn verbosity_hides_tool_records() {
    let home = TempDir::new().unwrap();
    scratch_bin(&home)
        .args(["-v", "error", "-l", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("note.txt"))
        .stderr(predicate::str::contains("scratch::note: INFO wrote"))
        .stderr(predicate::str::contains("SUCCESS").not());
}

#[test]
fn config_file_and_env_set_flag_defaults() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("scratch");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("runner.toml"), "verbosity = \"error\"\n").unwrap();

    scratch_bin(&home)
        .assert()
        .success()
        .stderr(predicate::str::contains("SUCCESS").not());

    scratch_bin(&home)
        .env("SCRATCH_VERBOSITY", "info")
        .assert()
        .success()
        .stderr(predicate::str::contains("scratch SUCCESS Done"));

    scratch_bin(&home)
        .env("SCRATCH_VERBOSITY", "info")
        .args(["-v", "warn"])
        .assert()
        .success()
        .stderr(predicate::str::contains("SUCCESS").not());
}
