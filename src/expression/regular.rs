//! Plain regular expressions used as step expressions.

use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::argument::Argument;
use crate::expression::{hint_at, Expression};
use crate::parameters::parameter_type::first;
use crate::parameters::{transformer, ParameterType, ParameterTypeRegistry, TypeHint};
use crate::tree_regexp::TreeRegexp;
use crate::ExpressionError;

/// A regular expression whose capture groups are converted by the parameter
/// types registered for the same regexp.
///
/// Groups are resolved against the registry on every match, because the
/// choice depends on the caller's type hints.
///
/// # Examples
///
/// ```rust
/// use cukex::{Expression, ParameterTypeRegistry, RegularExpression, TypeHint, Value};
/// let registry = ParameterTypeRegistry::new();
/// let expression = RegularExpression::new(r"^I have (\d+) cukes in my (.*)$", &registry).unwrap();
/// let args = expression.match_text("I have 22 cukes in my belly", &[]).unwrap().unwrap();
/// assert_eq!(args[0].value().unwrap(), Value::I32(22));
/// assert_eq!(args[1].value().unwrap(), Value::Str("belly".into()));
/// ```
#[derive(Debug, Clone)]
pub struct RegularExpression<'r> {
    tree_regexp: TreeRegexp,
    registry: &'r ParameterTypeRegistry,
}

impl<'r> RegularExpression<'r> {
    pub fn new(pattern: &str, registry: &'r ParameterTypeRegistry) -> Result<Self, ExpressionError> {
        Ok(Self {
            tree_regexp: TreeRegexp::new(pattern)?,
            registry,
        })
    }

    pub fn tree_regexp(&self) -> &TreeRegexp {
        &self.tree_regexp
    }

    fn parameter_type_for(
        &self,
        parameter_type_regexp: &str,
        text: &str,
        hint: Option<&TypeHint>,
    ) -> Result<Arc<ParameterType>, ExpressionError> {
        let found = self
            .registry
            .lookup_by_regexp(parameter_type_regexp, self.tree_regexp.pattern(), text)?
            // A weak parameter type gives way to a conflicting hint.
            .filter(|parameter_type| match hint {
                Some(hint) if !parameter_type.use_regexp_match_as_strong_type_hint() => {
                    parameter_type.type_name() == hint.type_name()
                }
                _ => true,
            });
        let parameter_type = match found {
            Some(parameter_type) if !parameter_type.is_anonymous() => return Ok(parameter_type),
            Some(anonymous) => anonymous,
            None => Arc::new(ParameterType::anonymous(parameter_type_regexp)),
        };
        let hint = hint.cloned().unwrap_or_default();
        let default_transformer = self.registry.default_transformer();
        let type_name = hint.type_name();
        Ok(Arc::new(parameter_type.deanonymize(
            &type_name,
            transformer(move |args| default_transformer.transform(first(args), &hint)),
        )))
    }
}

impl Expression for RegularExpression<'_> {
    fn match_text(&self, text: &str, type_hints: &[TypeHint]) -> Result<Option<Vec<Argument>>, ExpressionError> {
        let mut parameter_types = Vec::new();
        for (i, group_builder) in self.tree_regexp.group_builder().children.iter().enumerate() {
            let hint = type_hints.get(i);
            parameter_types.push(self.parameter_type_for(&group_builder.source, text, hint)?);
        }
        debug!(
            pattern = self.tree_regexp.pattern(),
            types = ?parameter_types.iter().map(|t| t.name()).collect::<Vec<_>>(),
            "resolved regular expression groups"
        );
        match self.tree_regexp.match_text(text) {
            Some(group) => Argument::build(&self.tree_regexp, group, &parameter_types).map(Some),
            None => Ok(None),
        }
    }

    fn regex(&self) -> &Regex {
        self.tree_regexp.regex()
    }

    fn source(&self) -> &str {
        self.tree_regexp.pattern()
    }
}
