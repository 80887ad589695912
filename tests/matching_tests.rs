use cukex::diagnostics::ErrorType;
use cukex::{
    CucumberExpression, Expression, ExpressionFactory, NumberFormat, ParameterTypeRegistry, TypeHint, Value,
};

fn values(registry: &ParameterTypeRegistry, expression: &str, text: &str, hints: &[TypeHint]) -> Option<Vec<Value>> {
    ExpressionFactory::new(registry)
        .create_expression(expression)
        .unwrap()
        .match_text(text, hints)
        .unwrap()
        .map(|args| args.iter().map(|a| a.value().unwrap()).collect())
}

#[test]
fn every_integer_width() {
    let registry = ParameterTypeRegistry::new();
    assert_eq!(
        values(&registry, "{byte} {short} {long} {biginteger}", "-8 300 -5000000000 170141183460469231731687303715884105727", &[]),
        Some(vec![
            Value::I8(-8),
            Value::I16(300),
            Value::I64(-5_000_000_000),
            Value::I128(i128::MAX),
        ])
    );
}

#[test]
fn out_of_range_values_name_the_parameter_type() {
    let registry = ParameterTypeRegistry::new();
    let expression = CucumberExpression::new("{byte}", &registry).unwrap();
    let args = expression.match_text("300", &[]).unwrap().unwrap();
    let err = args[0].value().unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Transform);
    assert_eq!(err.to_string(), "ParameterType {byte} failed to transform [300] to i8");
}

#[test]
fn floats_follow_the_registry_number_format() {
    let registry = ParameterTypeRegistry::with_number_format(NumberFormat::new(',', '.').unwrap());
    assert_eq!(
        values(&registry, "{double} euro", "1.234,5 euro", &[]),
        Some(vec![Value::F64(1234.5)])
    );
    assert_eq!(values(&registry, "{float}", "-,5", &[]), Some(vec![Value::F32(-0.5)]));
}

#[test]
fn strings_keep_escaped_quotes() {
    let registry = ParameterTypeRegistry::new();
    assert_eq!(
        values(&registry, "I say {string}", r#"I say "a \"quoted\" word""#, &[]),
        Some(vec![Value::Str(r#"a "quoted" word"#.into())])
    );
    assert_eq!(
        values(&registry, "I say {string}", "I say ''", &[]),
        Some(vec![Value::Str(String::new())])
    );
}

#[test]
fn anonymous_parameters_follow_hints() {
    let registry = ParameterTypeRegistry::new();
    assert_eq!(
        values(&registry, "{} and {}", "0x10 and yes", &[TypeHint::I32]),
        Some(vec![Value::I32(16), Value::Str("yes".into())])
    );
}

#[test]
fn alternation_and_optional_text() {
    let registry = ParameterTypeRegistry::new();
    for text in ["I have 1 cuke", "I have 2 cukes", "I had 3 cukes"] {
        assert!(values(&registry, "I have/had {int} cuke(s)", text, &[]).is_some(), "{text}");
    }
    assert_eq!(values(&registry, "I have/had {int} cuke(s)", "I haz 3 cukes", &[]), None);
}

#[test]
fn cucumber_expressions_match_whole_text() {
    let registry = ParameterTypeRegistry::new();
    assert_eq!(values(&registry, "{int} cukes", "I have 3 cukes", &[]), None);
}

#[test]
fn group_positions_are_byte_offsets() {
    let registry = ParameterTypeRegistry::new();
    let expression = CucumberExpression::new("Grüße {int}", &registry).unwrap();
    let args = expression.match_text("Grüße 42", &[]).unwrap().unwrap();
    let group = args[0].group();
    assert_eq!((group.start, group.end), (Some(8), Some(10)));
    assert_eq!(group.value.as_deref(), Some("42"));
}

#[test]
fn non_ascii_digits_do_not_match_numbers() {
    let registry = ParameterTypeRegistry::new();
    assert_eq!(values(&registry, "I have {int} cukes", "I have \u{663} cukes", &[]), None);
    assert_eq!(values(&registry, "{float}", "\u{663}.5", &[]), None);
    assert_eq!(values(&registry, r"^I have (\d+) cukes$", "I have \u{663} cukes", &[]), None);
    assert_eq!(
        values(&registry, "I have {int} cukes", "I have 3 cukes", &[]),
        Some(vec![Value::I32(3)])
    );
}
