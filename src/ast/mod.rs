//! AST module for Cucumber Expressions
//!
//! This module provides the token and node types produced by the tokenizer and
//! parser. Positions are character (code point) indices into the expression,
//! not byte offsets.

// ============================================================================
// IMPORTS
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Represents a span in the expression, in characters.
///
/// # Examples
///
/// ```rust
/// use cukex::ast::Span;
/// let span = Span { start: 0, end: 5 };
/// assert_eq!(span.len(), 5);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Anything that occupies a range of the expression.
pub trait Located {
    fn start(&self) -> usize;
    fn end(&self) -> usize;

    fn span(&self) -> Span {
        Span::new(self.start(), self.end())
    }
}

impl Located for Span {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

// ============================================================================
// TOKENS
// ============================================================================

pub const ESCAPE_CHARACTER: char = '\\';
pub const ALTERNATION_CHARACTER: char = '/';
pub const BEGIN_PARAMETER_CHARACTER: char = '{';
pub const END_PARAMETER_CHARACTER: char = '}';
pub const BEGIN_OPTIONAL_CHARACTER: char = '(';
pub const END_OPTIONAL_CHARACTER: char = ')';

/// The kinds of token the tokenizer emits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    StartOfLine,
    EndOfLine,
    WhiteSpace,
    BeginOptional,
    EndOptional,
    BeginParameter,
    EndParameter,
    Alternation,
    Text,
}

impl TokenType {
    /// The character that produces this token, for delimiter tokens.
    pub fn symbol(&self) -> Option<char> {
        match self {
            TokenType::BeginOptional => Some(BEGIN_OPTIONAL_CHARACTER),
            TokenType::EndOptional => Some(END_OPTIONAL_CHARACTER),
            TokenType::BeginParameter => Some(BEGIN_PARAMETER_CHARACTER),
            TokenType::EndParameter => Some(END_PARAMETER_CHARACTER),
            TokenType::Alternation => Some(ALTERNATION_CHARACTER),
            _ => None,
        }
    }

    /// What the delimiter is used for, as worded in error messages.
    pub fn purpose(&self) -> Option<&'static str> {
        match self {
            TokenType::BeginOptional | TokenType::EndOptional => Some("optional text"),
            TokenType::BeginParameter | TokenType::EndParameter => Some("a parameter"),
            TokenType::Alternation => Some("alternation"),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::StartOfLine => "START_OF_LINE",
            TokenType::EndOfLine => "END_OF_LINE",
            TokenType::WhiteSpace => "WHITE_SPACE",
            TokenType::BeginOptional => "BEGIN_OPTIONAL",
            TokenType::EndOptional => "END_OPTIONAL",
            TokenType::BeginParameter => "BEGIN_PARAMETER",
            TokenType::EndParameter => "END_PARAMETER",
            TokenType::Alternation => "ALTERNATION",
            TokenType::Text => "TEXT",
        }
    }

    /// Classifies a single unescaped character.
    pub fn of(c: char) -> TokenType {
        if c.is_whitespace() {
            return TokenType::WhiteSpace;
        }
        match c {
            ALTERNATION_CHARACTER => TokenType::Alternation,
            BEGIN_PARAMETER_CHARACTER => TokenType::BeginParameter,
            END_PARAMETER_CHARACTER => TokenType::EndParameter,
            BEGIN_OPTIONAL_CHARACTER => TokenType::BeginOptional,
            END_OPTIONAL_CHARACTER => TokenType::EndOptional,
            _ => TokenType::Text,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_escape_character(c: char) -> bool {
    c == ESCAPE_CHARACTER
}

/// Whether `c` may follow a backslash.
pub fn can_escape(c: char) -> bool {
    if c.is_whitespace() {
        return true;
    }
    matches!(
        c,
        ESCAPE_CHARACTER
            | ALTERNATION_CHARACTER
            | BEGIN_PARAMETER_CHARACTER
            | END_PARAMETER_CHARACTER
            | BEGIN_OPTIONAL_CHARACTER
            | END_OPTIONAL_CHARACTER
    )
}

/// A lexical token. `text` is unescaped, while `start`/`end` cover the
/// escaping backslashes too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Token {
    pub fn new(text: impl Into<String>, token_type: TokenType, start: usize, end: usize) -> Self {
        Self {
            token_type,
            start,
            end,
            text: text.into(),
        }
    }
}

impl Located for Token {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

// ============================================================================
// NODES
// ============================================================================

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    TextNode,
    OptionalNode,
    AlternationNode,
    AlternativeNode,
    ParameterNode,
    ExpressionNode,
}

/// A node of the parsed expression. Leaves carry `token`, everything else
/// carries `nodes`.
///
/// # Examples
///
/// ```rust
/// use cukex::ast::{Node, NodeType};
/// let name = Node::leaf(NodeType::TextNode, 1, 4, "int");
/// let param = Node::branch(NodeType::ParameterNode, 0, 5, vec![name]);
/// assert_eq!(param.text(), "int");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,
}

impl Node {
    pub fn leaf(node_type: NodeType, start: usize, end: usize, token: impl Into<String>) -> Self {
        Self {
            node_type,
            start,
            end,
            token: Some(token.into()),
            nodes: Vec::new(),
        }
    }

    pub fn branch(node_type: NodeType, start: usize, end: usize, nodes: Vec<Node>) -> Self {
        Self {
            node_type,
            start,
            end,
            token: None,
            nodes,
        }
    }

    /// Concatenated text of all leaves below this node.
    pub fn text(&self) -> String {
        match &self.token {
            Some(token) => token.clone(),
            None => self.nodes.iter().map(Node::text).collect(),
        }
    }

    /// Renders the tree one node per line, for `cukex ast`.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0);
        out
    }

    fn write_pretty(&self, out: &mut String, depth: usize) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{:?} {}..{}", self.node_type, self.start, self.end));
        if let Some(token) = &self.token {
            out.push_str(&format!(" {:?}", token));
        }
        out.push('\n');
        for child in &self.nodes {
            child.write_pretty(out, depth + 1);
        }
    }
}

impl Located for Node {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapable_characters() {
        for c in ['\\', '/', '{', '}', '(', ')', ' ', '\t'] {
            assert!(can_escape(c), "{c:?} should be escapable");
        }
        assert!(!can_escape('['));
        assert!(!can_escape('a'));
    }

    #[test]
    fn delimiter_purposes() {
        assert_eq!(TokenType::BeginOptional.purpose(), Some("optional text"));
        assert_eq!(TokenType::EndParameter.purpose(), Some("a parameter"));
        assert_eq!(TokenType::Text.symbol(), None);
    }

    #[test]
    fn node_text_joins_leaves() {
        let node = Node::branch(
            NodeType::OptionalNode,
            0,
            4,
            vec![
                Node::leaf(NodeType::TextNode, 1, 2, "a"),
                Node::leaf(NodeType::TextNode, 2, 3, "b"),
            ],
        );
        assert_eq!(node.text(), "ab");
        assert_eq!(node.span(), Span::new(0, 4));
    }

    #[test]
    fn token_serializes_with_fixture_names() {
        let token = Token::new("", TokenType::StartOfLine, 0, 0);
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, r#"{"type":"START_OF_LINE","start":0,"end":0,"text":""}"#);
    }
}
