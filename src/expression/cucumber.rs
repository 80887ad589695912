//! Cucumber Expressions compiled to anchored regular expressions.

use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::argument::Argument;
use crate::ast::{Node, NodeType};
use crate::expression::{hint_at, Expression};
use crate::parameters::{transformer, ParameterByTypeTransformer, ParameterType, ParameterTypeRegistry, TypeHint};
use crate::parameters::parameter_type::{first, is_valid_parameter_type_name};
use crate::syntax::{error, parse};
use crate::tree_regexp::TreeRegexp;
use crate::ExpressionError;

/// A compiled Cucumber Expression.
///
/// # Examples
///
/// ```rust
/// use cukex::{CucumberExpression, Expression, ParameterTypeRegistry, Value};
/// let registry = ParameterTypeRegistry::new();
/// let expression = CucumberExpression::new("I have {int} cuke(s)", &registry).unwrap();
/// assert_eq!(expression.regex_source(), r"^I have ((?:-?\d+)|(?:\d+)) cuke(?:s)?$");
/// let args = expression.match_text("I have 7 cukes", &[]).unwrap().unwrap();
/// assert_eq!(args[0].value().unwrap(), Value::I32(7));
/// assert!(expression.match_text("I have many cukes", &[]).unwrap().is_none());
/// ```
#[derive(Clone)]
pub struct CucumberExpression {
    source: String,
    parameter_types: Vec<Arc<ParameterType>>,
    tree_regexp: TreeRegexp,
    default_transformer: Arc<dyn ParameterByTypeTransformer>,
}

impl CucumberExpression {
    /// Parses and compiles `expression`. Parameter types and the default
    /// transformer for anonymous parameters are both taken from `registry`
    /// at this point; later changes to the registry do not affect the
    /// compiled expression.
    pub fn new(expression: &str, registry: &ParameterTypeRegistry) -> Result<Self, ExpressionError> {
        let ast = parse(expression)?;
        let mut compiler = Compiler {
            expression,
            registry,
            parameter_types: Vec::new(),
        };
        let pattern = compiler.rewrite(&ast)?;
        debug!(expression, pattern = %pattern, "compiled cucumber expression");
        Ok(Self {
            source: expression.to_string(),
            tree_regexp: TreeRegexp::new(&pattern)?,
            parameter_types: compiler.parameter_types,
            default_transformer: registry.default_transformer(),
        })
    }

    pub fn regex_source(&self) -> &str {
        self.tree_regexp.pattern()
    }

    /// Parameter types in the order they appear in the expression.
    pub fn parameter_types(&self) -> &[Arc<ParameterType>] {
        &self.parameter_types
    }

    pub fn tree_regexp(&self) -> &TreeRegexp {
        &self.tree_regexp
    }
}

impl Expression for CucumberExpression {
    fn match_text(&self, text: &str, type_hints: &[TypeHint]) -> Result<Option<Vec<Argument>>, ExpressionError> {
        let parameter_types: Vec<Arc<ParameterType>> = self
            .parameter_types
            .iter()
            .enumerate()
            .map(|(i, parameter_type)| {
                if !parameter_type.is_anonymous() {
                    return Arc::clone(parameter_type);
                }
                let hint = hint_at(type_hints, i);
                let default_transformer = Arc::clone(&self.default_transformer);
                let type_name = hint.type_name();
                Arc::new(parameter_type.deanonymize(
                    &type_name,
                    transformer(move |args| default_transformer.transform(first(args), &hint)),
                ))
            })
            .collect();
        match self.tree_regexp.match_text(text) {
            Some(group) => Argument::build(&self.tree_regexp, group, &parameter_types).map(Some),
            None => Ok(None),
        }
    }

    fn regex(&self) -> &Regex {
        self.tree_regexp.regex()
    }

    fn source(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Debug for CucumberExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CucumberExpression")
            .field("source", &self.source)
            .field("regex", &self.regex_source())
            .field("parameter_types", &self.parameter_types)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Compiler
// ============================================================================

struct Compiler<'a> {
    expression: &'a str,
    registry: &'a ParameterTypeRegistry,
    parameter_types: Vec<Arc<ParameterType>>,
}

impl Compiler<'_> {
    fn rewrite(&mut self, node: &Node) -> Result<String, ExpressionError> {
        match node.node_type {
            NodeType::TextNode => Ok(escape_regex(&node.text())),
            NodeType::OptionalNode => self.rewrite_optional(node),
            NodeType::AlternationNode => self.rewrite_alternation(node),
            NodeType::AlternativeNode => self.rewrite_children(node, "", ""),
            NodeType::ParameterNode => self.rewrite_parameter(node),
            NodeType::ExpressionNode => self.rewrite_children(node, "^", "$"),
        }
    }

    fn rewrite_children(&mut self, node: &Node, prefix: &str, suffix: &str) -> Result<String, ExpressionError> {
        let mut regex = String::from(prefix);
        for child in &node.nodes {
            regex.push_str(&self.rewrite(child)?);
        }
        regex.push_str(suffix);
        Ok(regex)
    }

    fn rewrite_optional(&mut self, node: &Node) -> Result<String, ExpressionError> {
        if let Some(parameter) = node.nodes.iter().find(|n| n.node_type == NodeType::ParameterNode) {
            return Err(error::parameter_is_not_allowed_in_optional(parameter, self.expression));
        }
        if !has_text(node) {
            return Err(error::optional_may_not_be_empty(node, self.expression));
        }
        self.rewrite_children(node, "(?:", ")?")
    }

    fn rewrite_alternation(&mut self, node: &Node) -> Result<String, ExpressionError> {
        for alternative in &node.nodes {
            if alternative.nodes.is_empty() {
                return Err(error::alternative_is_empty(alternative, self.expression));
            }
            if !has_text(alternative) {
                return Err(error::alternative_may_exclusively_contain_optionals(
                    alternative,
                    self.expression,
                ));
            }
        }
        let alternatives = node
            .nodes
            .iter()
            .map(|alternative| self.rewrite(alternative))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("(?:{})", alternatives.join("|")))
    }

    fn rewrite_parameter(&mut self, node: &Node) -> Result<String, ExpressionError> {
        let name = node.text();
        if !is_valid_parameter_type_name(&name) {
            return Err(error::invalid_parameter_type_name(node, self.expression));
        }
        let parameter_type = self
            .registry
            .lookup_by_type_name(&name)
            .ok_or_else(|| error::undefined_parameter_type(node, self.expression, &name))?;
        let regex = match parameter_type.regexps() {
            [single] => format!("({single})"),
            regexps => format!("((?:{}))", regexps.join(")|(?:")),
        };
        self.parameter_types.push(parameter_type);
        Ok(regex)
    }
}

fn has_text(node: &Node) -> bool {
    node.nodes.iter().any(|n| n.node_type == NodeType::TextNode)
}

/// Backslash-escapes the characters that are special in a regex.
pub fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '^' | '[' | '(' | '{' | '$' | '.' | '|' | '?' | '*' | '+' | '}' | ')' | ']'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
