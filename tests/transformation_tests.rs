// Transformation fixtures: a Cucumber Expression and the regex it compiles to.

mod common;

use std::path::Path;

use cukex::fixtures::{load_case, TransformationCase};
use cukex::{CucumberExpression, ParameterTypeRegistry};

fn assert_transformation(path: &Path) {
    let expectation: TransformationCase = load_case(path).unwrap();
    let parameter_type_registry = ParameterTypeRegistry::new();
    let expression = CucumberExpression::new(&expectation.expression, &parameter_type_registry)
        .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
    assert_eq!(
        expression.regex_source(),
        expectation.expected_regex,
        "{}",
        path.display()
    );
}

#[test]
fn test_alternation() {
    assert_transformation(&common::suite_dir("transformation").join("alternation.yaml"));
}

#[test]
fn every_transformation_fixture() {
    for path in common::suite_files("transformation") {
        assert_transformation(&path);
    }
}

#[test]
fn compiled_regex_reads_digits_as_ascii() {
    let registry = ParameterTypeRegistry::new();
    let expression = CucumberExpression::new("I have {int} cukes", &registry).unwrap();
    assert_eq!(expression.regex_source(), r"^I have ((?:-?\d+)|(?:\d+)) cukes$");
    assert_eq!(
        cukex::Expression::regex(&expression).as_str(),
        "^I have ((?:-?[0-9]+)|(?:[0-9]+)) cukes$"
    );
}
