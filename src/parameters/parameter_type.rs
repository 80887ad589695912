//! Named parameter types: the `{int}` in `I have {int} cukes`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::parameters::value::Value;
use crate::{err_msg, ErrorContext, ExpressionError};

/// Converts the values of a parameter's capture groups into a [`Value`].
///
/// The slice holds one entry per capture group inside the parameter's regexp
/// (or the whole match when the regexp has none). `None` marks a group that
/// did not participate.
pub type Transformer =
    Arc<dyn Fn(&[Option<&str>]) -> Result<Value, ExpressionError> + Send + Sync>;

/// Boxes a closure as a [`Transformer`].
pub fn transformer<F>(f: F) -> Transformer
where
    F: Fn(&[Option<&str>]) -> Result<Value, ExpressionError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A named parameter type: the regexps it matches and how matches become
/// values.
///
/// # Examples
///
/// ```rust
/// use cukex::{ParameterType, Value};
/// let color = ParameterType::new("color", ["red|blue"], "Color", |args| {
///     Ok(Value::Str(args[0].unwrap_or_default().to_uppercase()))
/// })
/// .unwrap();
/// assert_eq!(color.transform(&[Some("red")]).unwrap(), Value::Str("RED".into()));
/// ```
#[derive(Clone)]
pub struct ParameterType {
    name: String,
    regexps: Vec<String>,
    type_name: String,
    transformer: Transformer,
    use_for_snippets: bool,
    prefer_for_regexp_match: bool,
    anonymous: bool,
    use_regexp_match_as_strong_type_hint: bool,
    weight: i32,
}

impl ParameterType {
    /// A parameter type used for snippets and not preferred for regexp
    /// matches. Adjust with the `with_*` builders.
    pub fn new<F>(
        name: &str,
        regexps: impl IntoIterator<Item = impl Into<String>>,
        type_name: &str,
        transformer: F,
    ) -> Result<Self, ExpressionError>
    where
        F: Fn(&[Option<&str>]) -> Result<Value, ExpressionError> + Send + Sync + 'static,
    {
        check_parameter_type_name(name)?;
        let regexps: Vec<String> = regexps.into_iter().map(Into::into).collect();
        if regexps.is_empty() {
            return Err(err_msg!(
                Registry,
                "Parameter type {{{}}} must have at least one regexp",
                name
            ));
        }
        Ok(Self::built_in(name, regexps, type_name, Arc::new(transformer)))
    }

    /// Unvalidated constructor for types whose name and regexps are known
    /// to be well formed.
    pub(crate) fn built_in(
        name: &str,
        regexps: Vec<String>,
        type_name: &str,
        transformer: Transformer,
    ) -> Self {
        Self {
            name: name.to_string(),
            regexps,
            type_name: type_name.to_string(),
            transformer,
            use_for_snippets: true,
            prefer_for_regexp_match: false,
            anonymous: false,
            use_regexp_match_as_strong_type_hint: true,
            weight: 0,
        }
    }

    /// The type behind `{}`: matches anything and returns the text as is.
    pub(crate) fn anonymous(regexp: &str) -> Self {
        Self {
            name: String::new(),
            regexps: vec![regexp.to_string()],
            type_name: "any".to_string(),
            transformer: Arc::new(as_text),
            use_for_snippets: false,
            prefer_for_regexp_match: true,
            anonymous: true,
            use_regexp_match_as_strong_type_hint: false,
            weight: 0,
        }
    }

    /// An anonymous type with a concrete transformer, created at match time
    /// for `{}` parameters and for regexp groups without a parameter type.
    pub(crate) fn deanonymize(&self, type_name: &str, transformer: Transformer) -> Self {
        Self {
            name: "anonymous".to_string(),
            type_name: type_name.to_string(),
            transformer,
            ..self.clone()
        }
    }

    pub fn with_snippets(mut self, use_for_snippets: bool) -> Self {
        self.use_for_snippets = use_for_snippets;
        self
    }

    pub fn with_preference(mut self, prefer_for_regexp_match: bool) -> Self {
        self.prefer_for_regexp_match = prefer_for_regexp_match;
        self
    }

    pub fn with_strong_type_hint(mut self, strong: bool) -> Self {
        self.use_regexp_match_as_strong_type_hint = strong;
        self
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn regexps(&self) -> &[String] {
        &self.regexps
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn use_for_snippets(&self) -> bool {
        self.use_for_snippets
    }

    pub fn prefer_for_regexp_match(&self) -> bool {
        self.prefer_for_regexp_match
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    pub fn use_regexp_match_as_strong_type_hint(&self) -> bool {
        self.use_regexp_match_as_strong_type_hint
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    /// Runs the transformer. Failures are wrapped in a message naming the
    /// parameter type and the group values; the cause is kept as the source.
    pub fn transform(&self, group_values: &[Option<&str>]) -> Result<Value, ExpressionError> {
        (self.transformer)(group_values).map_err(|cause| ExpressionError::Transform {
            message: format!(
                "ParameterType {{{}}} failed to transform {} to {}",
                self.name,
                format_values(group_values),
                self.type_name
            ),
            ctx: ErrorContext::none(),
            source: Some(Box::new(cause)),
        })
    }

    /// Preferential types sort first, then by name.
    pub fn compare(&self, other: &ParameterType) -> Ordering {
        other
            .prefer_for_regexp_match
            .cmp(&self.prefer_for_regexp_match)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl fmt::Debug for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterType")
            .field("name", &self.name)
            .field("regexps", &self.regexps)
            .field("type_name", &self.type_name)
            .field("use_for_snippets", &self.use_for_snippets)
            .field("prefer_for_regexp_match", &self.prefer_for_regexp_match)
            .field("anonymous", &self.anonymous)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

pub fn check_parameter_type_name(name: &str) -> Result<(), ExpressionError> {
    if is_valid_parameter_type_name(name) {
        Ok(())
    } else {
        Err(err_msg!(
            Registry,
            "Illegal character in parameter name {{{}}}. Parameter names may not contain '{{', '}}', '(', ')', '\\' or '/'",
            name
        ))
    }
}

pub fn is_valid_parameter_type_name(name: &str) -> bool {
    !name.chars().any(|c| matches!(c, '{' | '}' | '(' | ')' | '\\' | '/'))
}

pub(crate) fn first<'a>(args: &[Option<&'a str>]) -> Option<&'a str> {
    args.first().copied().flatten()
}

fn as_text(args: &[Option<&str>]) -> Result<Value, ExpressionError> {
    Ok(first(args).map_or(Value::Nil, |s| Value::Str(s.to_string())))
}

fn format_values(values: &[Option<&str>]) -> String {
    let items: Vec<&str> = values.iter().map(|v| v.unwrap_or("null")).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper(name: &str) -> ParameterType {
        ParameterType::new(name, ["[a-z]+"], "String", |args| {
            Ok(Value::Str(first(args).unwrap_or_default().to_uppercase()))
        })
        .unwrap()
    }

    #[test]
    fn rejects_illegal_names() {
        assert!(is_valid_parameter_type_name("[string]"));
        for name in ["{x}", "x(y)", "a/b", "a\\b"] {
            let err = ParameterType::new(name, ["."], "String", |_| Ok(Value::Nil)).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!(
                    "Illegal character in parameter name {{{name}}}. \
                     Parameter names may not contain '{{', '}}', '(', ')', '\\' or '/'"
                )
            );
        }
    }

    #[test]
    fn requires_a_regexp() {
        let none: [&str; 0] = [];
        assert!(ParameterType::new("x", none, "String", |_| Ok(Value::Nil)).is_err());
    }

    #[test]
    fn wraps_transformer_failures() {
        let failing = ParameterType::new("bad", [".+"], "Bad", |_| {
            Err(err_msg!(Transform, "boom"))
        })
        .unwrap();
        let err = failing.transform(&[Some("x"), None]).unwrap_err();
        assert_eq!(err.to_string(), "ParameterType {bad} failed to transform [x, null] to Bad");
        let cause = std::error::Error::source(&err).unwrap();
        assert_eq!(cause.to_string(), "boom");
    }

    #[test]
    fn preferential_types_sort_first() {
        let a = upper("a");
        let b = upper("b").with_preference(true);
        assert_eq!(b.compare(&a), Ordering::Less);
        assert_eq!(a.compare(&upper("c")), Ordering::Less);
    }

    #[test]
    fn anonymous_type_returns_text() {
        let anonymous = ParameterType::anonymous(".*");
        assert!(anonymous.is_anonymous());
        assert_eq!(anonymous.name(), "");
        assert_eq!(anonymous.transform(&[Some("x")]).unwrap(), Value::Str("x".into()));
        assert_eq!(anonymous.transform(&[None]).unwrap(), Value::Nil);
    }
}
