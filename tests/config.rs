//! Tests for `gremlins.toml` configuration file handling via the CLI.

use std::fs::write;

use predicates::prelude::*;

mod util;
use util::{copy_of_testdata, run};

#[test]
fn unknown_config_key_is_rejected() {
    let tmp = copy_of_testdata("small_well_tested");
    write(tmp.path().join("gremlins.toml"), "nonsense_key = true\n").unwrap();
    run()
        .args(["gremlins", "--dir"])
        .arg(tmp.path())
        .args(["--list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field"));
}

#[test]
fn config_file_jobs_is_honored_without_cli_override() {
    let tmp = copy_of_testdata("small_well_tested");
    write(tmp.path().join("gremlins.toml"), "jobs = 1\n").unwrap();
    run()
        .args(["gremlins", "--dir"])
        .arg(tmp.path())
        .args(["--list"])
        .assert()
        .success();
}
