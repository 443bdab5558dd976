//! Binary-level checks of the `dealer` executable.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dealer(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dealer").expect("binary built");
    cmd.env_clear()
        .env("HOME", home.path())
        .env("DEALER_CONFIG", home.path().join("config"));
    cmd
}

#[test]
fn version_flag() {
    let home = TempDir::new().expect("temp dir");
    dealer(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("dealer "));
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().expect("temp dir");
    dealer(&home)
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands for API:"))
        .stdout(predicate::str::contains("workspace-list"));
}

#[test]
fn bash_completion_without_config() {
    let home = TempDir::new().expect("temp dir");
    dealer(&home)
        .arg("bash-completion")
        .assert()
        .success()
        .stdout(predicate::str::contains("chart-install"))
        .stdout(predicate::str::contains("--insecure"));
}

#[test]
fn unknown_command_exits_one() {
    let home = TempDir::new().expect("temp dir");
    dealer(&home)
        .arg("nope")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown command 'nope'"));
}

#[test]
fn missing_credentials_exit_one() {
    let home = TempDir::new().expect("temp dir");
    dealer(&home)
        .args(["--dealer-url", "http://127.0.0.1:1/api", "workspace-list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: "));
}

#[test]
fn bad_global_flag_exits_two() {
    let home = TempDir::new().expect("temp dir");
    dealer(&home)
        .args(["--format", "xml", "workspace-list"])
        .assert()
        .code(2);
}

#[test]
fn global_flag_after_command_is_accepted() {
    let home = TempDir::new().expect("temp dir");
    dealer(&home)
        .args(["workspace-list", "--dealer-url", "http://127.0.0.1:1/api", "-f", "yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unexpected argument").not());
}
