//! Integration tests for the `graft` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn graft(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("graft").unwrap();
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd
}

#[test]
fn test_help_lists_flags() {
    Command::cargo_bin("graft")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--server"))
        .stdout(predicate::str::contains("--data-dir"))
        .stdout(predicate::str::contains("--job"));
}

#[test]
fn test_console_help_and_quit() {
    let data_dir = TempDir::new().unwrap();

    graft(&data_dir)
        .write_stdin("help\nstatus\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("capture vertex <vertex-id>"))
        .stdout(predicate::str::contains("Edit Mode, no job"));

    // First run writes the example config and opens the log
    let config = std::fs::read_to_string(data_dir.path().join("config.toml")).unwrap();
    assert!(config.contains("[retry]"));
    assert!(data_dir.path().join("logs").join("graft.log").exists());
}

#[test]
fn test_commands_outside_debug_mode_are_rejected() {
    let data_dir = TempDir::new().unwrap();

    graft(&data_dir)
        .arg("--server")
        .arg("http://127.0.0.1:9")
        .write_stdin("next\ncapture master\nwarp\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[error] Not in debug mode"))
        .stdout(predicate::str::contains("Unknown command 'warp'"));
}
