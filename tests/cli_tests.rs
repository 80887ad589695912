// End-to-end checks of the cukex binary.
// Requires: assert_cmd, predicates, tempfile in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

fn cukex() -> Command {
    let mut cmd = Command::cargo_bin("cukex").unwrap();
    cmd.arg("--no-color");
    cmd
}

#[test]
fn compile_prints_the_regex() {
    cukex()
        .args(["compile", "mice/rats"])
        .assert()
        .success()
        .stdout("^(?:mice|rats)$\n");
}

#[test]
fn syntax_errors_are_reported_with_diagnostics() {
    cukex()
        .args(["compile", "three (blind mice"])
        .assert()
        .failure()
        .stderr(contains("cukex::Syntax").and(contains("does not have a matching ')'")));
}

#[test]
fn match_prints_values() {
    cukex()
        .args(["match", "I have {int} cukes", "I have 42 cukes"])
        .assert()
        .success()
        .stdout("0: 42 ({int})\n");
}

#[test]
fn match_reports_no_match() {
    cukex()
        .args(["match", "I have {int} cukes", "I have no cukes"])
        .assert()
        .success()
        .stdout("no match\n");
}

#[test]
fn match_applies_hints() {
    cukex()
        .args(["--json", "match", "^I have (.*) cukes$", "I have 0x1F cukes", "--hint", "long"])
        .assert()
        .success()
        .stdout(contains("\"value\": 31"));
}

#[test]
fn generate_lists_expressions() {
    cukex()
        .args(["generate", "I have 3 cukes"])
        .assert()
        .success()
        .stdout(contains("I have {int} cukes  (int)").and(contains("I have {float} cukes  (float)")));
}

#[test]
fn tokens_as_json() {
    cukex()
        .args(["--json", "tokens", "a"])
        .assert()
        .success()
        .stdout(contains("\"type\": \"START_OF_LINE\"").and(contains("\"text\": \"a\"")));
}

#[test]
fn types_lists_built_ins() {
    cukex()
        .arg("types")
        .assert()
        .success()
        .stdout(contains("{int}").and(contains("{biginteger}")).and(contains("{string}")));
}

#[test]
fn fixtures_pass_for_the_bundled_suites() {
    cukex()
        .arg("fixtures")
        .assert()
        .success()
        .stdout(contains("failed: 0"));
}

#[test]
fn fixtures_fail_on_a_wrong_expectation() {
    let dir = tempfile::tempdir().unwrap();
    let suite = dir.path().join("transformation");
    fs::create_dir(&suite).unwrap();
    fs::write(suite.join("wrong.yaml"), "expression: a\nexpected_regex: ^b$\n").unwrap();

    cukex()
        .arg("fixtures")
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(contains("-^b$").and(contains("+^a$")).and(contains("failed: 1")));
}

#[test]
fn decimal_comma_implies_a_dot_grouping_separator() {
    cukex()
        .args(["--decimal-separator", ",", "match", "{double}", "1,5"])
        .assert()
        .success()
        .stdout("0: 1.5 ({double})\n");
}

#[test]
fn equal_separators_are_rejected() {
    cukex()
        .args(["--decimal-separator", ",", "--grouping-separator", ",", "match", "{double}", "1,5"])
        .assert()
        .failure()
        .stderr(contains("must differ from the grouping separator"));
}
