//! Cucumber Expressions: a readable alternative to regular expressions for
//! matching Gherkin step text.
//!
//! ```rust
//! use cukex::{CucumberExpression, Expression, ParameterTypeRegistry, Value};
//!
//! let registry = ParameterTypeRegistry::new();
//! let expression = CucumberExpression::new("I have {int} cuke(s)", &registry).unwrap();
//! assert_eq!(expression.regex_source(), r"^I have ((?:-?\d+)|(?:\d+)) cuke(?:s)?$");
//!
//! let args = expression.match_text("I have 7 cukes", &[]).unwrap().unwrap();
//! assert_eq!(args[0].value().unwrap(), Value::I32(7));
//! ```

pub use crate::diagnostics::{ErrorContext, ErrorType, ExpressionError};

pub mod argument;
pub mod ast;
pub mod cli;
pub mod diagnostics;
pub mod expression;
pub mod fixtures;
pub mod generator;
pub mod parameters;
pub mod syntax;
pub mod tree_regexp;

pub use argument::Argument;
pub use expression::{CucumberExpression, Expression, ExpressionFactory, RegularExpression};
pub use generator::{CucumberExpressionGenerator, GeneratedExpression};
pub use parameters::{
    BuiltInParameterTransformer, NumberFormat, ParameterByTypeTransformer, ParameterType,
    ParameterTypeRegistry, TypeHint, Value,
};
pub use tree_regexp::{Group, TreeRegexp};
