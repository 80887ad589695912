//! The parameter type registry.
//!
//! A registry is built once and passed by reference to every expression that
//! is compiled against it. It owns the built-in parameter types, any user
//! defined ones, and the default transformer used for anonymous parameters.
//!
//! ## Usage Workflow
//! ```rust
//! use cukex::{CucumberExpression, Expression, ParameterType, ParameterTypeRegistry, Value};
//! // 1. Start from the built-in types
//! let mut registry = ParameterTypeRegistry::new();
//! // 2. Add your own
//! let color = ParameterType::new("color", ["red|blue|yellow"], "Color", |args| {
//!     Ok(Value::Str(args[0].unwrap_or_default().to_string()))
//! })
//! .unwrap();
//! registry.define_parameter_type(color).unwrap();
//! // 3. Compile expressions against the registry
//! let expression = CucumberExpression::new("I have a {color} ball", &registry).unwrap();
//! let args = expression.match_text("I have a red ball", &[]).unwrap().unwrap();
//! assert_eq!(args[0].value().unwrap(), Value::Str("red".into()));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::generator::CucumberExpressionGenerator;
use crate::parameters::number::NumberFormat;
use crate::parameters::parameter_type::{first, transformer, ParameterType};
use crate::parameters::transformer::{BuiltInParameterTransformer, ParameterByTypeTransformer, TypeHint};
use crate::parameters::value::Value;
use crate::{err_msg, ExpressionError};

// ============================================================================
// Built-in regexps
// ============================================================================

pub const INTEGER_REGEXPS: [&str; 2] = [r"-?\d+", r"\d+"];
pub const WORD_REGEXP: &str = r"[^\s]+";
pub const STRING_REGEXP: &str = r#""([^"\\]*(?:\\.[^"\\]*)*)"|'([^'\\]*(?:\\.[^'\\]*)*)'"#;
pub const ANONYMOUS_REGEXP: &str = ".*";

/// Weight of `{int}`; it wins generator ties against other numeric types.
const INT_WEIGHT: i32 = 1000;

// ============================================================================
// Registry
// ============================================================================

/// Parameter types by name and by regexp.
#[derive(Clone)]
pub struct ParameterTypeRegistry {
    parameter_types: Vec<Arc<ParameterType>>,
    by_name: HashMap<String, Arc<ParameterType>>,
    by_regexp: HashMap<String, Vec<Arc<ParameterType>>>,
    default_transformer: Arc<dyn ParameterByTypeTransformer>,
    number_format: NumberFormat,
}

impl Default for ParameterTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterTypeRegistry {
    /// A registry holding the built-in parameter types, with English number
    /// formatting.
    pub fn new() -> Self {
        Self::with_number_format(NumberFormat::english())
    }

    /// A registry without any parameter types, not even `{}`.
    pub fn empty() -> Self {
        Self::bare(NumberFormat::english())
    }

    pub fn with_number_format(number_format: NumberFormat) -> Self {
        let mut registry = Self::bare(number_format);
        registry.define_built_ins();
        registry
    }

    fn bare(number_format: NumberFormat) -> Self {
        Self {
            parameter_types: Vec::new(),
            by_name: HashMap::new(),
            by_regexp: HashMap::new(),
            default_transformer: Arc::new(BuiltInParameterTransformer::new(number_format)),
            number_format,
        }
    }

    fn define_built_ins(&mut self) {
        let internal = Arc::new(BuiltInParameterTransformer::new(self.number_format));
        let integers = || INTEGER_REGEXPS.iter().map(|r| r.to_string()).collect::<Vec<_>>();
        let float = self.number_format.float_regexp();

        let built_ins = [
            ParameterType::built_in("int", integers(), "i32", by_hint(&internal, TypeHint::I32))
                .with_preference(true)
                .with_weight(INT_WEIGHT),
            ParameterType::built_in("byte", integers(), "i8", by_hint(&internal, TypeHint::I8))
                .with_snippets(false),
            ParameterType::built_in("short", integers(), "i16", by_hint(&internal, TypeHint::I16))
                .with_snippets(false),
            ParameterType::built_in("long", integers(), "i64", by_hint(&internal, TypeHint::I64))
                .with_snippets(false),
            ParameterType::built_in(
                "biginteger",
                integers(),
                "i128",
                by_hint(&internal, TypeHint::I128),
            )
            .with_snippets(false),
            ParameterType::built_in("float", vec![float.clone()], "f32", by_hint(&internal, TypeHint::F32))
                .with_preference(true),
            ParameterType::built_in("double", vec![float], "f64", by_hint(&internal, TypeHint::F64))
                .with_snippets(false),
            ParameterType::built_in("word", vec![WORD_REGEXP.to_string()], "String", by_hint(&internal, TypeHint::String))
                .with_snippets(false),
            ParameterType::built_in("string", vec![STRING_REGEXP.to_string()], "String", transformer(unquote)),
            ParameterType::anonymous(ANONYMOUS_REGEXP),
        ];
        for parameter_type in built_ins {
            self.insert(Arc::new(parameter_type.with_strong_type_hint(false)));
        }
    }

    /// Adds a parameter type.
    ///
    /// # Errors
    /// - a parameter type with the same name exists;
    /// - the new type is preferential and a preferential type already uses
    ///   one of its regexps.
    pub fn define_parameter_type(&mut self, parameter_type: ParameterType) -> Result<(), ExpressionError> {
        let name = parameter_type.name();
        if self.by_name.contains_key(name) {
            return Err(if name.is_empty() {
                err_msg!(DuplicateTypeName, "The anonymous parameter type has already been defined")
            } else {
                err_msg!(DuplicateTypeName, "There is already a parameter type with name {}", name)
            });
        }
        if parameter_type.prefer_for_regexp_match() {
            for regexp in parameter_type.regexps() {
                let existing = self
                    .by_regexp
                    .get(regexp)
                    .and_then(|types| types.first())
                    .filter(|first| first.prefer_for_regexp_match());
                if let Some(existing) = existing {
                    return Err(err_msg!(
                        Registry,
                        "There can only be one preferential parameter type per regexp. \
                         The regexp /{}/ is used for two preferential parameter types, {{{}}} and {{{}}}",
                        regexp,
                        existing.name(),
                        name
                    ));
                }
            }
        }
        debug!(name, regexps = ?parameter_type.regexps(), "defining parameter type");
        self.insert(Arc::new(parameter_type));
        Ok(())
    }

    fn insert(&mut self, parameter_type: Arc<ParameterType>) {
        for regexp in parameter_type.regexps() {
            let types = self.by_regexp.entry(regexp.clone()).or_default();
            types.push(Arc::clone(&parameter_type));
            types.sort_by(|a, b| a.compare(b));
        }
        self.by_name
            .insert(parameter_type.name().to_string(), Arc::clone(&parameter_type));
        self.parameter_types.push(parameter_type);
    }

    pub fn lookup_by_type_name(&self, name: &str) -> Option<Arc<ParameterType>> {
        self.by_name.get(name).cloned()
    }

    /// The parameter type for a capture group of a regular expression.
    ///
    /// `expression_regexp` and `text` are only used to explain an ambiguity.
    ///
    /// # Errors
    /// Several types share `parameter_type_regexp` and none of them is
    /// preferential.
    pub fn lookup_by_regexp(
        &self,
        parameter_type_regexp: &str,
        expression_regexp: &str,
        text: &str,
    ) -> Result<Option<Arc<ParameterType>>, ExpressionError> {
        let Some(types) = self.by_regexp.get(parameter_type_regexp) else {
            return Ok(None);
        };
        match types.first() {
            Some(first) if types.len() > 1 && !first.prefer_for_regexp_match() => {
                let generated = CucumberExpressionGenerator::new(self).generate_expressions(text)?;
                Err(ambiguous(parameter_type_regexp, expression_regexp, types, &generated_sources(&generated)))
            }
            first => {
                debug!(regexp = parameter_type_regexp, found = first.map(|t| t.name()), "regexp lookup");
                Ok(first.cloned())
            }
        }
    }

    /// All parameter types in definition order.
    pub fn parameter_types(&self) -> impl Iterator<Item = &Arc<ParameterType>> {
        self.parameter_types.iter()
    }

    pub fn default_transformer(&self) -> Arc<dyn ParameterByTypeTransformer> {
        Arc::clone(&self.default_transformer)
    }

    pub fn set_default_transformer(&mut self, transformer: Arc<dyn ParameterByTypeTransformer>) {
        self.default_transformer = transformer;
    }

    pub fn number_format(&self) -> &NumberFormat {
        &self.number_format
    }
}

impl fmt::Debug for ParameterTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.parameter_types.iter().map(|t| t.name()).collect();
        f.debug_struct("ParameterTypeRegistry")
            .field("parameter_types", &names)
            .field("number_format", &self.number_format)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Internal Helpers
// ============================================================================

fn by_hint(internal: &Arc<BuiltInParameterTransformer>, hint: TypeHint) -> crate::parameters::Transformer {
    let internal = Arc::clone(internal);
    transformer(move |args| internal.transform(first(args), &hint))
}

/// `{string}`: the text between the quotes, with escaped quotes restored.
fn unquote(args: &[Option<&str>]) -> Result<Value, ExpressionError> {
    let text = match (first(args), args.get(1).copied().flatten()) {
        (Some(double), _) => double.replace("\\\"", "\""),
        (None, Some(single)) => single.replace("\\'", "'"),
        (None, None) => return Ok(Value::Nil),
    };
    Ok(Value::Str(text))
}

fn generated_sources(generated: &[crate::generator::GeneratedExpression]) -> Vec<String> {
    generated.iter().map(|g| g.source()).collect()
}

fn ambiguous(
    parameter_type_regexp: &str,
    expression_regexp: &str,
    types: &[Arc<ParameterType>],
    generated: &[String],
) -> ExpressionError {
    let names: Vec<String> = types.iter().map(|t| format!("{{{}}}", t.name())).collect();
    err_msg!(
        AmbiguousParameterType,
        "Your Regular Expression /{}/\n\
         matches multiple parameter types with regexp /{}/:\n   {}\n\n\
         I couldn't decide which one to use. You have two options:\n\n\
         1) Use a Cucumber Expression instead of a Regular Expression. Try one of these:\n   {}\n\n\
         2) Make one of the parameter types preferential and continue to use a Regular Expression.\n",
        expression_regexp,
        parameter_type_regexp,
        names.join("\n   "),
        generated.join("\n   ")
    )
}
