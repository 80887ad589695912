// =============================================================================
// SECTION 1: MODULE DOCUMENTATION & IMPORTS
// =============================================================================

//! Builders for the problems a Cucumber Expression can have.
//!
//! All of them share one layout:
//!
//! ```text
//! This Cucumber Expression has a problem at column 5:
//!
//! three (blind) mice/rats)
//!     ^
//! <problem>.
//! <solution>
//! ```

use crate::ast::{Located, Node, Span, Token, TokenType};
use crate::diagnostics::ErrorContext;
use crate::{err_ctx, ExpressionError};

// =============================================================================
// SECTION 2: POINTERS AND LAYOUT
// =============================================================================

fn point_at(index: usize) -> String {
    let mut pointer = " ".repeat(index);
    pointer.push('^');
    pointer
}

fn point_at_located(node: &impl Located) -> String {
    let mut pointer = point_at(node.start());
    if node.start() + 1 < node.end() {
        for _ in node.start() + 1..node.end() - 1 {
            pointer.push('-');
        }
        pointer.push('^');
    }
    pointer
}

fn message(index: usize, expression: &str, pointer: &str, problem: &str, solution: &str) -> String {
    format!(
        "This Cucumber Expression has a problem at column {}:\n\n{}\n{}\n{}.\n{}",
        index + 1,
        expression,
        pointer,
        problem,
        solution
    )
}

fn syntax_error(expression: &str, span: Span, pointer: &str, problem: &str, solution: &str) -> ExpressionError {
    let ctx = ErrorContext::for_expression(expression, span, problem, solution);
    err_ctx!(
        Syntax,
        message(span.start, expression, pointer, problem, solution),
        ctx
    )
}

fn node_error(node: &impl Located, expression: &str, problem: &str, solution: &str) -> ExpressionError {
    syntax_error(expression, node.span(), &point_at_located(node), problem, solution)
}

// =============================================================================
// SECTION 3: TOKENIZER PROBLEMS
// =============================================================================

pub(crate) fn cant_escape(expression: &str, index: usize) -> ExpressionError {
    syntax_error(
        expression,
        Span::new(index, index + 1),
        &point_at(index),
        "Only the characters '{', '}', '(', ')', '\\', '/' and whitespace can be escaped",
        "If you did mean to use an '\\' you can use '\\\\' to escape it",
    )
}

pub(crate) fn end_of_line_can_not_be_escaped(expression: &str) -> ExpressionError {
    let index = expression.chars().count();
    syntax_error(
        expression,
        Span::new(index, index),
        &point_at(index),
        "The end of line can not be escaped",
        "You can use '\\\\' to escape the the '\\'",
    )
}

// =============================================================================
// SECTION 4: PARSER PROBLEMS
// =============================================================================

pub(crate) fn missing_end_token(
    expression: &str,
    begin: TokenType,
    end: TokenType,
    current: &Token,
) -> ExpressionError {
    let begin_symbol = begin.symbol().unwrap_or_default();
    let end_symbol = end.symbol().unwrap_or_default();
    let purpose = begin.purpose().unwrap_or_default();
    node_error(
        current,
        expression,
        &format!("The '{begin_symbol}' does not have a matching '{end_symbol}'"),
        &format!("If you did not intend to use {purpose} you can use '\\{begin_symbol}' to escape the {purpose}"),
    )
}

// =============================================================================
// SECTION 5: COMPILER PROBLEMS
// =============================================================================

pub(crate) fn alternative_is_empty(node: &Node, expression: &str) -> ExpressionError {
    node_error(
        node,
        expression,
        "Alternative may not be empty",
        "If you did not mean to use an alternative you can use '\\/' to escape the the '/'",
    )
}

pub(crate) fn parameter_is_not_allowed_in_optional(node: &Node, expression: &str) -> ExpressionError {
    node_error(
        node,
        expression,
        "An optional may not contain a parameter type",
        "If you did not mean to use an parameter type you can use '\\{' to escape the the '{'",
    )
}

pub(crate) fn optional_may_not_be_empty(node: &Node, expression: &str) -> ExpressionError {
    node_error(
        node,
        expression,
        "An optional must contain some text",
        "If you did not mean to use an optional you can use '\\(' to escape the the '('",
    )
}

pub(crate) fn alternative_may_exclusively_contain_optionals(node: &Node, expression: &str) -> ExpressionError {
    node_error(
        node,
        expression,
        "An alternative may not exclusively contain optionals",
        "If you did not mean to use an optional you can use '\\(' to escape the the '('",
    )
}

pub(crate) fn invalid_parameter_type_name(node: &Node, expression: &str) -> ExpressionError {
    node_error(
        node,
        expression,
        "Parameter names may not contain '{', '}', '(', ')', '\\' or '/'",
        "Did you mean to use a regular expression?",
    )
}

pub(crate) fn undefined_parameter_type(node: &Node, expression: &str, name: &str) -> ExpressionError {
    let problem = format!("Undefined parameter type '{name}'");
    let solution = format!("Please register a ParameterType for '{name}'");
    let ctx = ErrorContext::for_expression(expression, node.span(), &problem, &solution);
    err_ctx!(
        UndefinedParameterType,
        message(node.start, expression, &point_at_located(node), &problem, &solution),
        ctx
    )
}
