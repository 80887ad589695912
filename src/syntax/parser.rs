//! Cucumber Expression Parser
//!
//! Converts the token stream into an [`EXPRESSION_NODE`](NodeType::ExpressionNode)
//! tree. This parser is purely syntactic: parameter names are not resolved and
//! empty optionals or alternatives are left for the compiler to reject.
//!
//! ```text
//! cucumber-expression := ( alternation | optional | parameter | text )*
//! alternation := (?<=left-boundary) alternative* ( '/' alternative* )+ (?=right-boundary)
//! left-boundary := whitespace | } | ^
//! right-boundary := whitespace | { | $
//! alternative := optional | parameter | text
//! optional := '(' option* ')'
//! option := optional | parameter | text
//! parameter := '{' name* '}'
//! name := whitespace | .
//! text := whitespace | ')' | '}' | .
//! ```

use crate::ast::{Node, NodeType, Token, TokenType};
use crate::syntax::{error, tokenize};
use crate::ExpressionError;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse a Cucumber Expression into its AST.
///
/// # Examples
///
/// ```rust
/// use cukex::ast::NodeType;
/// use cukex::syntax::parse;
/// let ast = parse("three (blind) mice").unwrap();
/// assert_eq!(ast.node_type, NodeType::ExpressionNode);
/// assert_eq!(ast.nodes[2].node_type, NodeType::OptionalNode);
/// assert_eq!(ast.text(), "three blind mice");
/// ```
pub fn parse(expression: &str) -> Result<Node, ExpressionError> {
    let tokens = tokenize(expression)?;
    let parser = Parser {
        expression,
        tokens: &tokens,
    };
    let parsed = parser.between(
        0,
        NodeType::ExpressionNode,
        TokenType::StartOfLine,
        TokenType::EndOfLine,
        Rule::Expression,
    )?;
    parsed.nodes.into_iter().next().ok_or_else(|| {
        crate::err_msg!(Syntax, "Failed to parse '{}': no expression node was produced", expression)
    })
}

// ============================================================================
// PARSER STATE
// ============================================================================

/// Outcome of one parse attempt: tokens consumed and nodes produced.
struct Parsed {
    consumed: usize,
    nodes: Vec<Node>,
}

impl Parsed {
    fn none() -> Self {
        Self {
            consumed: 0,
            nodes: Vec::new(),
        }
    }

    fn one(consumed: usize, node: Node) -> Self {
        Self {
            consumed,
            nodes: vec![node],
        }
    }
}

/// The sets of sub-parsers tried, in order, at each position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    /// alternation | optional | parameter | text
    Expression,
    /// optional | parameter | text
    Option,
    /// name
    Name,
    /// '/' | optional | parameter | text
    Alternative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sub {
    Alternation,
    AlternativeSeparator,
    Optional,
    Parameter,
    Text,
    Name,
}

impl Rule {
    fn parsers(self) -> &'static [Sub] {
        match self {
            Rule::Expression => &[Sub::Alternation, Sub::Optional, Sub::Parameter, Sub::Text],
            Rule::Option => &[Sub::Optional, Sub::Parameter, Sub::Text],
            Rule::Name => &[Sub::Name],
            Rule::Alternative => &[Sub::AlternativeSeparator, Sub::Optional, Sub::Parameter, Sub::Text],
        }
    }
}

struct Parser<'a> {
    expression: &'a str,
    tokens: &'a [Token],
}

impl<'a> Parser<'a> {
    // ========================================================================
    // TOKEN LOOKAHEAD
    // ========================================================================

    fn looking_at(&self, at: isize, token_type: TokenType) -> bool {
        if at < 0 {
            return token_type == TokenType::StartOfLine;
        }
        match self.tokens.get(at as usize) {
            Some(token) => token.token_type == token_type,
            None => token_type == TokenType::EndOfLine,
        }
    }

    fn looking_at_any(&self, at: isize, token_types: &[TokenType]) -> bool {
        token_types.iter().any(|t| self.looking_at(at, *t))
    }

    fn token(&self, at: usize) -> &'a Token {
        // The token stream always ends with END_OF_LINE and no rule consumes it
        // without matching, so `at` never runs past the last token.
        &self.tokens[at.min(self.tokens.len() - 1)]
    }

    // ========================================================================
    // COMBINATORS
    // ========================================================================

    fn between(
        &self,
        current: usize,
        node_type: NodeType,
        begin: TokenType,
        end: TokenType,
        rule: Rule,
    ) -> Result<Parsed, ExpressionError> {
        if !self.looking_at(current as isize, begin) {
            return Ok(Parsed::none());
        }
        let mut sub_current = current + 1;
        let parsed = self.until(rule, sub_current, &[end, TokenType::EndOfLine])?;
        sub_current += parsed.consumed;

        if !self.looking_at(sub_current as isize, end) {
            return Err(error::missing_end_token(self.expression, begin, end, self.token(current)));
        }
        let start = self.token(current).start;
        let stop = self.token(sub_current).end;
        Ok(Parsed::one(
            sub_current + 1 - current,
            Node::branch(node_type, start, stop, parsed.nodes),
        ))
    }

    fn until(&self, rule: Rule, start_at: usize, end_tokens: &[TokenType]) -> Result<Parsed, ExpressionError> {
        let mut current = start_at;
        let mut nodes = Vec::new();
        while current < self.tokens.len() {
            if self.looking_at_any(current as isize, end_tokens) {
                break;
            }
            let parsed = self.first_of(rule, current)?;
            if parsed.consumed == 0 {
                return Err(crate::err_msg!(
                    Syntax,
                    "No eligible parsers for token {} at {} in '{}'",
                    self.token(current).token_type,
                    self.token(current).start,
                    self.expression
                ));
            }
            current += parsed.consumed;
            nodes.extend(parsed.nodes);
        }
        Ok(Parsed {
            consumed: current - start_at,
            nodes,
        })
    }

    fn first_of(&self, rule: Rule, current: usize) -> Result<Parsed, ExpressionError> {
        for sub in rule.parsers() {
            let parsed = self.apply(*sub, current)?;
            if parsed.consumed != 0 {
                return Ok(parsed);
            }
        }
        Ok(Parsed::none())
    }

    fn apply(&self, sub: Sub, current: usize) -> Result<Parsed, ExpressionError> {
        match sub {
            Sub::Alternation => self.alternation(current),
            Sub::AlternativeSeparator => Ok(self.alternative_separator(current)),
            Sub::Optional => self.between(
                current,
                NodeType::OptionalNode,
                TokenType::BeginOptional,
                TokenType::EndOptional,
                Rule::Option,
            ),
            Sub::Parameter => self.between(
                current,
                NodeType::ParameterNode,
                TokenType::BeginParameter,
                TokenType::EndParameter,
                Rule::Name,
            ),
            Sub::Text => Ok(self.text(current)),
            Sub::Name => Ok(self.name(current)),
        }
    }

    // ========================================================================
    // LEAF PARSERS
    // ========================================================================

    fn text(&self, current: usize) -> Parsed {
        let token = self.token(current);
        match token.token_type {
            TokenType::WhiteSpace
            | TokenType::Text
            | TokenType::EndParameter
            | TokenType::EndOptional
            | TokenType::Alternation => Parsed::one(
                1,
                Node::leaf(NodeType::TextNode, token.start, token.end, token.text.clone()),
            ),
            _ => Parsed::none(),
        }
    }

    fn name(&self, current: usize) -> Parsed {
        let token = self.token(current);
        match token.token_type {
            TokenType::StartOfLine | TokenType::EndOfLine => Parsed::none(),
            _ => Parsed::one(
                1,
                Node::leaf(NodeType::TextNode, token.start, token.end, token.text.clone()),
            ),
        }
    }

    fn alternative_separator(&self, current: usize) -> Parsed {
        if !self.looking_at(current as isize, TokenType::Alternation) {
            return Parsed::none();
        }
        let token = self.token(current);
        Parsed::one(
            1,
            Node::leaf(NodeType::AlternativeNode, token.start, token.end, token.text.clone()),
        )
    }

    // ========================================================================
    // ALTERNATION
    // ========================================================================

    fn alternation(&self, current: usize) -> Result<Parsed, ExpressionError> {
        let previous = current as isize - 1;
        if !self.looking_at_any(
            previous,
            &[TokenType::StartOfLine, TokenType::WhiteSpace, TokenType::EndParameter],
        ) {
            return Ok(Parsed::none());
        }

        let parsed = self.until(
            Rule::Alternative,
            current,
            &[TokenType::WhiteSpace, TokenType::EndOfLine, TokenType::BeginParameter],
        )?;
        let sub_current = current + parsed.consumed;
        if !parsed
            .nodes
            .iter()
            .any(|node| node.node_type == NodeType::AlternativeNode)
        {
            return Ok(Parsed::none());
        }

        let start = self.token(current).start;
        let end = self.token(sub_current).start;
        // The right hand boundary token is left for the caller.
        Ok(Parsed::one(
            parsed.consumed,
            Node::branch(
                NodeType::AlternationNode,
                start,
                end,
                split_alternatives(start, end, parsed.nodes),
            ),
        ))
    }
}

/// Splits the flat alternation content on its separator nodes.
fn split_alternatives(start: usize, end: usize, alternation: Vec<Node>) -> Vec<Node> {
    let mut separators = Vec::new();
    let mut alternatives = Vec::new();
    let mut alternative = Vec::new();
    for node in alternation {
        if node.node_type == NodeType::AlternativeNode {
            separators.push(node);
            alternatives.push(std::mem::take(&mut alternative));
        } else {
            alternative.push(node);
        }
    }
    alternatives.push(alternative);

    let last = alternatives.len() - 1;
    alternatives
        .into_iter()
        .enumerate()
        .map(|(i, nodes)| {
            let left = if i == 0 { start } else { separators[i - 1].end };
            let right = if i == last { end } else { separators[i].start };
            Node::branch(NodeType::AlternativeNode, left, right, nodes)
        })
        .collect()
}
