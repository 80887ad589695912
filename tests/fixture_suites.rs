// Runs the tokenizer, parser and matching YAML suites through the fixture
// runner.

mod common;

use cukex::fixtures::{run_all, run_fixture, summarize, FixtureConfig, FixtureOutcome};

fn assert_suite_passes(suite: &str) {
    for path in common::suite_files(suite) {
        let outcome = run_fixture(&path).unwrap();
        assert_eq!(outcome, FixtureOutcome::Pass, "{}", path.display());
    }
}

#[test]
fn tokenizer_fixtures() {
    assert_suite_passes("tokenizer");
}

#[test]
fn parser_fixtures() {
    assert_suite_passes("parser");
}

#[test]
fn matching_fixtures() {
    assert_suite_passes("matching");
}

#[test]
fn whole_fixture_tree() {
    let config = FixtureConfig {
        use_colors: false,
        ..FixtureConfig::default()
    };
    let results = run_all(&config);
    let (passed, failed, skipped) = summarize(&results);
    assert_eq!(failed, 0, "{results:#?}");
    assert_eq!(skipped, 0);
    assert_eq!(passed, results.len());
}

#[test]
fn a_wrong_expectation_fails_with_both_sides() {
    let dir = tempfile::tempdir().unwrap();
    let suite = dir.path().join("transformation");
    std::fs::create_dir(&suite).unwrap();
    let path = suite.join("wrong.yaml");
    std::fs::write(&path, "expression: a\nexpected_regex: ^b$\n").unwrap();
    assert_eq!(
        run_fixture(&path).unwrap(),
        FixtureOutcome::Fail {
            expected: "^b$".to_string(),
            actual: "^a$".to_string(),
        }
    );
}
