//! Cucumber Expression tokenizer.
//!
//! Splits an expression into [`Token`]s. Runs of whitespace and runs of text
//! are merged; every delimiter is a token of its own. A backslash turns the
//! next character into text.

use crate::ast::{can_escape, is_escape_character, Token, TokenType};
use crate::syntax::error;
use crate::ExpressionError;

/// Tokenize a Cucumber Expression.
///
/// # Examples
///
/// ```rust
/// use cukex::ast::TokenType;
/// use cukex::syntax::tokenize;
/// let tokens = tokenize("three {int}").unwrap();
/// let types: Vec<_> = tokens.iter().map(|t| t.token_type).collect();
/// assert_eq!(
///     types,
///     vec![
///         TokenType::StartOfLine,
///         TokenType::Text,
///         TokenType::WhiteSpace,
///         TokenType::BeginParameter,
///         TokenType::Text,
///         TokenType::EndParameter,
///         TokenType::EndOfLine,
///     ]
/// );
/// ```
pub fn tokenize(expression: &str) -> Result<Vec<Token>, ExpressionError> {
    let mut tokenizer = Tokenizer::default();
    let mut tokens = vec![tokenizer.take(TokenType::StartOfLine)];

    let mut previous = TokenType::StartOfLine;
    let mut treat_as_text = false;

    for c in expression.chars() {
        if !treat_as_text && is_escape_character(c) {
            tokenizer.escaped += 1;
            treat_as_text = true;
            continue;
        }
        let current = if treat_as_text {
            if !can_escape(c) {
                return Err(error::cant_escape(expression, tokenizer.position()));
            }
            TokenType::Text
        } else {
            TokenType::of(c)
        };
        treat_as_text = false;

        if previous != TokenType::StartOfLine && !continues(previous, current) {
            tokens.push(tokenizer.take(previous));
        }
        tokenizer.buffer.push(c);
        previous = current;
    }

    if !tokenizer.buffer.is_empty() {
        tokens.push(tokenizer.take(previous));
    }
    if treat_as_text {
        return Err(error::end_of_line_can_not_be_escaped(expression));
    }
    tokens.push(tokenizer.take(TokenType::EndOfLine));
    Ok(tokens)
}

fn continues(previous: TokenType, current: TokenType) -> bool {
    current == previous && matches!(current, TokenType::WhiteSpace | TokenType::Text)
}

/// Pending characters of the token being built.
#[derive(Default)]
struct Tokenizer {
    buffer: String,
    buffer_start: usize,
    escaped: usize,
}

impl Tokenizer {
    /// Character index just past what has been consumed so far.
    fn position(&self) -> usize {
        self.buffer_start + self.buffer.chars().count() + self.escaped
    }

    fn take(&mut self, token_type: TokenType) -> Token {
        let escaped = if token_type == TokenType::Text {
            std::mem::take(&mut self.escaped)
        } else {
            0
        };
        let end = self.buffer_start + self.buffer.chars().count() + escaped;
        let token = Token::new(std::mem::take(&mut self.buffer), token_type, self.buffer_start, end);
        self.buffer_start = end;
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, token_type: TokenType, start: usize, end: usize) -> Token {
        Token::new(text, token_type, start, end)
    }

    #[test]
    fn empty_expression() {
        assert_eq!(
            tokenize("").unwrap(),
            vec![
                token("", TokenType::StartOfLine, 0, 0),
                token("", TokenType::EndOfLine, 0, 0),
            ]
        );
    }

    #[test]
    fn merges_whitespace_and_text() {
        assert_eq!(
            tokenize("three  blind").unwrap(),
            vec![
                token("", TokenType::StartOfLine, 0, 0),
                token("three", TokenType::Text, 0, 5),
                token("  ", TokenType::WhiteSpace, 5, 7),
                token("blind", TokenType::Text, 7, 12),
                token("", TokenType::EndOfLine, 12, 12),
            ]
        );
    }

    #[test]
    fn adjacent_delimiters_are_separate_tokens() {
        assert_eq!(
            tokenize("((").unwrap(),
            vec![
                token("", TokenType::StartOfLine, 0, 0),
                token("(", TokenType::BeginOptional, 0, 1),
                token("(", TokenType::BeginOptional, 1, 2),
                token("", TokenType::EndOfLine, 2, 2),
            ]
        );
    }

    #[test]
    fn escaped_characters_become_text() {
        assert_eq!(
            tokenize("\\(blind\\)").unwrap(),
            vec![
                token("", TokenType::StartOfLine, 0, 0),
                token("(blind)", TokenType::Text, 0, 9),
                token("", TokenType::EndOfLine, 9, 9),
            ]
        );
    }

    #[test]
    fn escaped_space_joins_text() {
        assert_eq!(
            tokenize("a\\ b").unwrap(),
            vec![
                token("", TokenType::StartOfLine, 0, 0),
                token("a b", TokenType::Text, 0, 4),
                token("", TokenType::EndOfLine, 4, 4),
            ]
        );
    }

    #[test]
    fn positions_count_characters() {
        let tokens = tokenize("ü {int}").unwrap();
        assert_eq!(tokens[3], token("{", TokenType::BeginParameter, 2, 3));
    }

    #[test]
    fn unescapable_character() {
        let err = tokenize("\\[").unwrap_err();
        assert_eq!(
            err.to_string(),
            "This Cucumber Expression has a problem at column 2:\n\n\\[\n ^\n\
             Only the characters '{', '}', '(', ')', '\\', '/' and whitespace can be escaped.\n\
             If you did mean to use an '\\' you can use '\\\\' to escape it"
        );
    }

    #[test]
    fn trailing_backslash() {
        let err = tokenize("\\").unwrap_err();
        assert_eq!(
            err.to_string(),
            "This Cucumber Expression has a problem at column 2:\n\n\\\n ^\n\
             The end of line can not be escaped.\n\
             You can use '\\\\' to escape the the '\\'"
        );
    }
}
