//! Drives the compiled `meshdesk` binary end-to-end for its argument
//! validation and exit-code behavior, without ever opening a real session.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_describes_the_binary_and_exits_successfully() {
    Command::cargo_bin("meshdesk").unwrap().arg("--help").assert().success().stdout(predicate::str::contains("meshdesk"));
}

#[test]
fn version_matches_the_release_version() {
    Command::cargo_bin("meshdesk")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("meshdesk"));
}

#[test]
fn unknown_flag_is_a_clap_usage_error() {
    Command::cargo_bin("meshdesk").unwrap().arg("--not-a-real-flag").assert().failure().code(2);
}

#[test]
fn relay_without_peer_id_fails_before_any_network_io() {
    Command::cargo_bin("meshdesk")
        .unwrap()
        .args(["--relay", "127.0.0.1:1", "--listen-port", "0"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("peer-id"));
}
