//! End-to-end tests that run the built `cargo-gremlins` binary against the
//! fixture trees under `testdata/`.

use predicates::prelude::*;

mod util;
use util::{copy_of_testdata, run};

#[test]
fn incorrect_cargo_subcommand() {
    run().arg("wibble").assert().failure();
}

#[test]
fn show_version() {
    run()
        .args(["gremlins", "--version"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^cargo-gremlins \d+\.\d+\.\d+(-.*)?\n$").unwrap());
}

#[test]
fn list_well_tested_tree_as_json() {
    let tmp = copy_of_testdata("small_well_tested");
    run()
        .args(["gremlins", "--dir"])
        .arg(tmp.path())
        .args(["--list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("factorial"));
}

#[test]
fn list_is_empty_for_unknown_package_filter() {
    let tmp = copy_of_testdata("small_well_tested");
    run()
        .args(["gremlins", "--dir"])
        .arg(tmp.path())
        .args(["--list", "--package", "does-not-exist"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn well_tested_tree_has_no_survivors() {
    let tmp = copy_of_testdata("small_well_tested");
    run()
        .args(["gremlins", "--dir"])
        .arg(tmp.path())
        .assert()
        .success();
}

#[test]
fn arithmetic_tree_has_no_survivors() {
    let tmp = copy_of_testdata("arithmetic");
    run()
        .args(["gremlins", "--dir"])
        .arg(tmp.path())
        .assert()
        .success();
}

#[test]
fn boundary_tree_has_a_survivor() {
    // `is_adult` is only ever tested with `age >= 18` at `age = 25`, well
    // past the boundary: only the direction-flipping `>=` -> `<` mutation
    // changes that outcome. The `>=` -> `>` mutation and both `18` -> `17` /
    // `18` -> `19` boundary shifts still evaluate the same as the original
    // for `age = 25`, so they escape notice too.
    let tmp = copy_of_testdata("boundary");
    let output = run()
        .args(["gremlins", "--dir"])
        .arg(tmp.path())
        .args(["--json"])
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(report["total"], 4);
    assert_eq!(report["detected"], 1);
    assert_eq!(report["percentage"], 25.0);

    let survived = report["survived"].as_array().unwrap();
    assert_eq!(survived.len(), 3);
    let survived_ids: std::collections::BTreeSet<&str> = survived
        .iter()
        .map(|g| g["gremlin_id"].as_str().unwrap())
        .collect();
    assert_eq!(
        survived_ids,
        ["g001", "g003", "g004"].into_iter().collect()
    );
    for gremlin in survived {
        assert_eq!(gremlin["status"], "survived");
    }
}

#[test]
fn shard_selects_a_subset() {
    let tmp = copy_of_testdata("small_well_tested");
    run()
        .args(["gremlins", "--dir"])
        .arg(tmp.path())
        .args(["--list", "--shard", "1/2"])
        .assert()
        .success();
}
