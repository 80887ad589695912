//! Step expressions: Cucumber Expressions and regular expressions behind one
//! trait, and the factory that tells them apart.

use regex::Regex;

use crate::argument::Argument;
use crate::parameters::{ParameterTypeRegistry, TypeHint};
use crate::{err_src, ErrorContext, ExpressionError};

pub mod cucumber;
pub mod regular;

pub use cucumber::CucumberExpression;
pub use regular::RegularExpression;

/// Anything step text can be matched against.
pub trait Expression {
    /// Matches `text`, returning one argument per parameter or `None` when
    /// the text does not match. `type_hints` are positional; missing hints
    /// mean `String`.
    fn match_text(&self, text: &str, type_hints: &[TypeHint]) -> Result<Option<Vec<Argument>>, ExpressionError>;

    fn regex(&self) -> &Regex;

    /// The expression as it was written.
    fn source(&self) -> &str;
}

pub(crate) fn hint_at(type_hints: &[TypeHint], index: usize) -> TypeHint {
    type_hints.get(index).cloned().unwrap_or_default()
}

/// Creates the right kind of [`Expression`] for a string.
///
/// - `^...` or `...$`: a regular expression, as is;
/// - `/.../`: a regular expression without the slashes;
/// - anything else: a Cucumber Expression.
///
/// # Examples
///
/// ```rust
/// use cukex::{Expression, ExpressionFactory, ParameterTypeRegistry};
/// let registry = ParameterTypeRegistry::new();
/// let factory = ExpressionFactory::new(&registry);
/// assert_eq!(factory.create_expression("/a+/").unwrap().regex().as_str(), "a+");
/// assert_eq!(factory.create_expression("a+").unwrap().regex().as_str(), r"^a\+$");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExpressionFactory<'r> {
    registry: &'r ParameterTypeRegistry,
}

impl<'r> ExpressionFactory<'r> {
    pub fn new(registry: &'r ParameterTypeRegistry) -> Self {
        Self { registry }
    }

    pub fn create_expression(&self, expression: &str) -> Result<Box<dyn Expression + 'r>, ExpressionError> {
        if expression.starts_with('^') || expression.ends_with('$') {
            return self.regular_with_anchors(expression);
        }
        if expression.len() >= 2 && expression.starts_with('/') && expression.ends_with('/') {
            let pattern = &expression[1..expression.len() - 1];
            return Ok(Box::new(RegularExpression::new(pattern, self.registry)?));
        }
        Ok(Box::new(CucumberExpression::new(expression, self.registry)?))
    }

    fn regular_with_anchors(&self, expression: &str) -> Result<Box<dyn Expression + 'r>, ExpressionError> {
        match RegularExpression::new(expression, self.registry) {
            Ok(regular) => Ok(Box::new(regular)),
            Err(err) if looks_like_cucumber_parameter(expression) => Err(err_src!(
                Syntax,
                format!(
                    "You cannot use anchors (^ or $) in Cucumber Expressions. Please remove them from {expression}"
                ),
                ErrorContext::none(),
                err
            )),
            Err(err) => Err(err),
        }
    }
}

/// `{name}` somewhere in the text, with a name free of braces.
fn looks_like_cucumber_parameter(expression: &str) -> bool {
    expression
        .split('{')
        .skip(1)
        .any(|rest| rest.find('}').is_some_and(|end| !rest[..end].contains('{')))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(expression: &str) -> Result<Box<dyn Expression + '_>, ExpressionError> {
        static REGISTRY: once_cell::sync::Lazy<ParameterTypeRegistry> =
            once_cell::sync::Lazy::new(ParameterTypeRegistry::new);
        ExpressionFactory::new(&REGISTRY).create_expression(expression)
    }

    #[test]
    fn anchors_make_regular_expressions() {
        assert_eq!(create("^a$").unwrap().regex().as_str(), "^a$");
        assert_eq!(create("a$").unwrap().regex().as_str(), "a$");
        assert_eq!(create("^a").unwrap().regex().as_str(), "^a");
    }

    #[test]
    fn slashes_make_regular_expressions() {
        assert_eq!(create("/(\\d+)/").unwrap().source(), "(\\d+)");
        assert_eq!(create("//").unwrap().regex().as_str(), "");
    }

    #[test]
    fn everything_else_is_a_cucumber_expression() {
        let expression = create("I have {int} cukes").unwrap();
        assert_eq!(expression.source(), "I have {int} cukes");
        assert!(expression.regex().as_str().starts_with("^I have ("));
    }

    #[test]
    fn anchored_cucumber_expressions_are_explained() {
        let err = create("^I have {int} cukes$").err().unwrap();
        assert_eq!(
            err.to_string(),
            "You cannot use anchors (^ or $) in Cucumber Expressions. Please remove them from ^I have {int} cukes$"
        );
    }

    #[test]
    fn detects_parameter_syntax() {
        assert!(looks_like_cucumber_parameter("a {int} b"));
        assert!(looks_like_cucumber_parameter("{}"));
        assert!(!looks_like_cucumber_parameter("no braces"));
    }
}
