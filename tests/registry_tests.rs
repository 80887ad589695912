use std::sync::Arc;

use cukex::diagnostics::ErrorType;
use cukex::{
    CucumberExpression, Expression, ParameterByTypeTransformer, ParameterType, ParameterTypeRegistry,
    RegularExpression, TypeHint, Value,
};

const CAPITALISED_WORD: &str = r"[A-Z]+\w+";

fn capitalised(name: &str) -> ParameterType {
    ParameterType::new(name, [CAPITALISED_WORD], "String", |args| {
        Ok(Value::Str(args[0].unwrap_or_default().to_string()))
    })
    .unwrap()
}

fn registry_with(types: Vec<ParameterType>) -> ParameterTypeRegistry {
    let mut registry = ParameterTypeRegistry::new();
    for parameter_type in types {
        registry.define_parameter_type(parameter_type).unwrap();
    }
    registry
}

#[test]
fn ambiguous_regexps_explain_the_options() {
    let registry = registry_with(vec![capitalised("name"), capitalised("person"), capitalised("place")]);
    let expression = RegularExpression::new(r"([A-Z]+\w+) and ([A-Z]+\w+)", &registry).unwrap();
    let err = expression.match_text("Alice and Bob", &[]).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::AmbiguousParameterType);
    assert_eq!(
        err.to_string(),
        "Your Regular Expression /([A-Z]+\\w+) and ([A-Z]+\\w+)/\n\
         matches multiple parameter types with regexp /[A-Z]+\\w+/:\n   \
         {name}\n   \
         {person}\n   \
         {place}\n\
         \n\
         I couldn't decide which one to use. You have two options:\n\
         \n\
         1) Use a Cucumber Expression instead of a Regular Expression. Try one of these:\n   \
         {name} and {name}\n   \
         {name} and {person}\n   \
         {name} and {place}\n   \
         {person} and {name}\n   \
         {person} and {person}\n   \
         {person} and {place}\n   \
         {place} and {name}\n   \
         {place} and {person}\n   \
         {place} and {place}\n\
         \n\
         2) Make one of the parameter types preferential and continue to use a Regular Expression.\n"
    );
}

#[test]
fn a_preferential_type_resolves_the_ambiguity() {
    let registry = registry_with(vec![
        capitalised("name"),
        capitalised("person").with_preference(true),
        capitalised("place"),
    ]);
    let found = registry
        .lookup_by_regexp(CAPITALISED_WORD, r"([A-Z]+\w+)", "Alice")
        .unwrap()
        .unwrap();
    assert_eq!(found.name(), "person");
}

#[test]
fn only_one_preferential_type_per_regexp() {
    let mut registry = registry_with(vec![capitalised("name").with_preference(true), capitalised("person")]);
    let err = registry
        .define_parameter_type(capitalised("place").with_preference(true))
        .unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Registry);
    assert_eq!(
        err.to_string(),
        "There can only be one preferential parameter type per regexp. \
         The regexp /[A-Z]+\\w+/ is used for two preferential parameter types, {name} and {place}"
    );
}

#[test]
fn custom_types_are_used_by_cucumber_expressions() {
    #[derive(Debug, PartialEq)]
    struct Colour(String);

    let colour = ParameterType::new("colour", ["red|blue|yellow"], "Colour", |args| {
        Ok(Value::custom(Colour(args[0].unwrap_or_default().to_string())))
    })
    .unwrap();
    let registry = registry_with(vec![colour]);
    let expression = CucumberExpression::new("I have a {colour} ball", &registry).unwrap();
    assert_eq!(expression.regex_source(), "^I have a (red|blue|yellow) ball$");

    let args = expression.match_text("I have a blue ball", &[]).unwrap().unwrap();
    let value = args[0].value().unwrap();
    assert_eq!(value.downcast_ref::<Colour>(), Some(&Colour("blue".into())));
}

struct Shouting;

impl ParameterByTypeTransformer for Shouting {
    fn transform(&self, from: Option<&str>, _to: &TypeHint) -> Result<Value, cukex::ExpressionError> {
        Ok(from.map_or(Value::Nil, |text| Value::Str(text.to_uppercase())))
    }
}

#[test]
fn the_default_transformer_can_be_replaced() {
    let mut registry = ParameterTypeRegistry::new();
    registry.set_default_transformer(Arc::new(Shouting));
    let expression = CucumberExpression::new("I say {}", &registry).unwrap();
    let args = expression.match_text("I say hello", &[]).unwrap().unwrap();
    assert_eq!(args[0].value().unwrap(), Value::Str("HELLO".into()));
}

#[test]
fn compiled_expressions_keep_their_default_transformer() {
    let mut registry = ParameterTypeRegistry::new();
    let expression = CucumberExpression::new("I say {}", &registry).unwrap();
    registry.set_default_transformer(Arc::new(Shouting));
    let args = expression.match_text("I say hello", &[]).unwrap().unwrap();
    assert_eq!(args[0].value().unwrap(), Value::Str("hello".into()));
}

#[test]
fn an_empty_registry_knows_no_types() {
    let mut registry = ParameterTypeRegistry::empty();
    let err = CucumberExpression::new("{int}", &registry).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::UndefinedParameterType);

    let int = ParameterType::new("int", [r"\d+"], "i64", |args| {
        Ok(Value::I64(args[0].unwrap_or_default().parse().unwrap_or_default()))
    })
    .unwrap();
    registry.define_parameter_type(int).unwrap();
    let found = registry.lookup_by_type_name("int").unwrap();
    assert_eq!(found.regexps(), [r"\d+".to_string()]);

    let expression = CucumberExpression::new("{int}", &registry).unwrap();
    let args = expression.match_text("42", &[]).unwrap().unwrap();
    assert_eq!(args[0].value().unwrap(), Value::I64(42));
}
