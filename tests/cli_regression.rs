// Regression tests for the demonstration binary.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn tested() -> Command {
    let mut cmd = Command::cargo_bin("tested").unwrap();
    cmd.arg("--color").arg("never");
    cmd
}

#[test]
fn runs_all_demo_groups() {
    tested()
        .assert()
        .success()
        .stdout(contains("math [group]"))
        .stdout(contains("vector [group]"))
        .stdout(contains("00:Addition PASSED"))
        .stdout(contains("Passed : 6"))
        .stdout(contains("Failed : 0"));
}

#[test]
fn runs_a_single_case_by_name() {
    tested()
        .args(["--group", "math", "--case", "Multiplication"])
        .assert()
        .success()
        .stdout(contains("02:Multiplication PASSED"))
        .stdout(contains("Addition").not())
        .stdout(contains("Passed : 1"));
}

#[test]
fn runs_a_single_case_by_ordinal() {
    tested()
        .args(["--group", "vector", "--ordinal", "1"])
        .assert()
        .success()
        .stdout(contains("01:AddElement PASSED"))
        .stdout(contains("Passed : 1"));
}

#[test]
fn unknown_group_runs_nothing() {
    tested()
        .args(["--group", "nope"])
        .assert()
        .success()
        .stdout(contains("Passed : 0"));
}

#[test]
fn lists_cases_without_running() {
    tested()
        .arg("--list")
        .assert()
        .success()
        .stdout(contains("math/Division #03 - integer division truncates toward zero"))
        .stdout(contains("6 cases in 2 groups"))
        .stdout(contains("PASSED").not());
}

#[test]
fn case_without_group_is_a_usage_error() {
    tested().args(["--case", "Addition"]).assert().failure().code(2);
}
