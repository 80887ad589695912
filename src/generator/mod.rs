//! Snippet generation: proposes Cucumber Expressions for undefined steps.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::parameters::{ParameterType, ParameterTypeRegistry};
use crate::ExpressionError;

pub mod combinatorial;
pub mod generated;
pub mod matcher;

pub use combinatorial::{CombinatorialGeneratedExpressionFactory, MAX_EXPRESSIONS};
pub use generated::{GeneratedExpression, GeneratedSummary};
pub use matcher::{ParameterTypeMatch, ParameterTypeMatcher};

/// Characters that may surround a parameter: separators, punctuation and
/// symbols.
pub(crate) const SEPARATOR_REGEXP: &str = r"^[\p{Z}\p{P}\p{S}]$";

static SEPARATOR: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(SEPARATOR_REGEXP));

/// Generates expressions from step text using the snippet-enabled parameter
/// types of a registry.
///
/// # Examples
///
/// ```rust
/// use cukex::{CucumberExpressionGenerator, ParameterTypeRegistry};
/// let registry = ParameterTypeRegistry::new();
/// let generator = CucumberExpressionGenerator::new(&registry);
/// let generated = generator.generate_expressions("I have 2 cukes and 1.5 tomatoes").unwrap();
/// assert_eq!(generated[0].source(), "I have {int} cukes and {float} tomatoes");
/// assert_eq!(generated[1].source(), "I have {float} cukes and {float} tomatoes");
/// ```
pub struct CucumberExpressionGenerator<'r> {
    registry: &'r ParameterTypeRegistry,
}

impl<'r> CucumberExpressionGenerator<'r> {
    pub fn new(registry: &'r ParameterTypeRegistry) -> Self {
        Self { registry }
    }

    pub fn generate_expressions(&self, text: &str) -> Result<Vec<GeneratedExpression>, ExpressionError> {
        let separator = SEPARATOR.as_ref().map_err(|e| ExpressionError::from(e.clone()))?;
        let matchers = self.create_parameter_type_matchers(text)?;
        let mut combinations: Vec<Vec<Arc<ParameterType>>> = Vec::new();
        let mut literals = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            let mut matches: Vec<ParameterTypeMatch> = matchers
                .iter()
                .filter_map(|matcher| matcher.find_from(pos, separator))
                .collect();
            matches.sort_by(ParameterTypeMatch::compare);
            let Some(best) = matches.first().cloned() else {
                break;
            };

            let mut parameter_types: Vec<Arc<ParameterType>> = Vec::new();
            for m in matches.iter().filter(|m| m.start == best.start && m.len() == best.len()) {
                if !parameter_types.iter().any(|t| Arc::ptr_eq(t, &m.parameter_type)) {
                    parameter_types.push(Arc::clone(&m.parameter_type));
                }
            }
            combinations.push(parameter_types);
            literals.push(escape(&text[pos..best.start]));
            pos = best.end;
        }
        literals.push(escape(&text[pos..]));

        debug!(text, slots = combinations.len(), "generating expressions");
        Ok(CombinatorialGeneratedExpressionFactory::new(literals, combinations).generate_expressions())
    }

    fn create_parameter_type_matchers<'t>(
        &self,
        text: &'t str,
    ) -> Result<Vec<ParameterTypeMatcher<'t>>, ExpressionError> {
        let mut matchers = Vec::new();
        for parameter_type in self.registry.parameter_types().filter(|t| t.use_for_snippets()) {
            for regexp in parameter_type.regexps() {
                matchers.push(ParameterTypeMatcher::new(Arc::clone(parameter_type), regexp, text)?);
            }
        }
        Ok(matchers)
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '(' | '{' | '/') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(text: &str) -> Vec<String> {
        let registry = ParameterTypeRegistry::new();
        CucumberExpressionGenerator::new(&registry)
            .generate_expressions(text)
            .unwrap()
            .iter()
            .map(GeneratedExpression::source)
            .collect()
    }

    #[test]
    fn plain_text() {
        assert_eq!(sources("hello"), vec!["hello"]);
        assert_eq!(sources(""), vec![""]);
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(sources("I have (many) {cukes} a/b"), vec![r"I have \(many) \{cukes} a\/b"]);
    }

    #[test]
    fn repeated_types_get_numbered_names() {
        let registry = ParameterTypeRegistry::new();
        let generated = CucumberExpressionGenerator::new(&registry)
            .generate_expressions("I have 2 cukes and 3 more")
            .unwrap();
        assert_eq!(generated[0].source(), "I have {int} cukes and {int} more");
        assert_eq!(generated[0].parameter_names(), vec!["int", "int2"]);
        assert_eq!(generated.len(), 4);
    }

    #[test]
    fn quoted_strings() {
        assert_eq!(sources(r#"I like "bangers/mash""#), vec!["I like {string}"]);
    }

    #[test]
    fn ignores_numbers_inside_words() {
        assert_eq!(sources("I have a sha1 hash"), vec!["I have a sha1 hash"]);
    }
}
