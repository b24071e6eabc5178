//! Drives the compiled `meshdesk-relayd` binary end-to-end for its argument
//! validation and exit-code behavior, without ever binding a listening port.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_describes_the_binary_and_exits_successfully() {
    Command::cargo_bin("meshdesk-relayd")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("meshdesk-relayd"));
}

#[test]
fn unknown_flag_is_a_clap_usage_error() {
    Command::cargo_bin("meshdesk-relayd").unwrap().arg("--not-a-real-flag").assert().failure().code(2);
}

#[test]
fn zero_max_connections_is_rejected_with_exit_code_two() {
    Command::cargo_bin("meshdesk-relayd")
        .unwrap()
        .args(["--max-connections", "0", "--port", "0"])
        .assert()
        .failure()
        .code(2);
}
