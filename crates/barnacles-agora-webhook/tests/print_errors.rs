//! Runs the `forward_dynamb` example against a closed port.
//!
//! Expectation: with printing on, the refused connection shows up on stderr
//! even though no tracing subscriber is installed; with printing off,
//! nothing about the delivery is written.

use assert_cmd::Command;
use predicates::prelude::*;

const CLOSED_PORT: &str = "https://127.0.0.1:9/api";

fn forward_dynamb(extra: &[&str]) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args([
        "run",
        "--quiet",
        "--package",
        "barnacles-agora-webhook",
        "--example",
        "forward_dynamb",
        "--",
        CLOSED_PORT,
    ]);
    cmd.args(extra);
    cmd
}

#[test]
fn delivery_error_is_printed_without_subscriber() {
    forward_dynamb(&[])
        .assert()
        .success()
        .stdout(predicate::str::contains("POST https://127.0.0.1:9/api"))
        .stderr(predicate::str::contains(
            "agora delivery to https://127.0.0.1:9/api failed",
        ));
}

#[test]
fn delivery_error_is_discarded_when_printing_is_off() {
    forward_dynamb(&["--no-print-errors"])
        .assert()
        .success()
        .stderr(predicate::str::contains("agora delivery").not())
        .stderr(predicate::str::contains("failed").not());
}
