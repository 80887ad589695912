//! Regular expressions whose capture groups form a tree.
//!
//! The regex engine reports captures as a flat list. Parameter types whose
//! own regexps contain groups need them nested under the parameter's group,
//! so the pattern is parsed once with `regex-syntax` and the group structure
//! is kept alongside the compiled [`Regex`].
//!
//! In the compiled regex `\d` and `\D` cover ASCII digits only;
//! [`TreeRegexp::pattern`] keeps the source as written.

use std::borrow::Cow;

use regex::{Captures, Regex};
use regex_syntax::ast::{self, Ast};
use serde::Serialize;

use crate::{err_src, ErrorContext, ExpressionError};

/// A compiled pattern plus the tree of its capturing groups.
///
/// # Examples
///
/// ```rust
/// use cukex::TreeRegexp;
/// let tree = TreeRegexp::new(r"^(\d+) x ((\d+)|n)$").unwrap();
/// let group = tree.match_text("3 x 4").unwrap();
/// assert_eq!(group.children[0].value.as_deref(), Some("3"));
/// assert_eq!(group.children[1].children[0].value.as_deref(), Some("4"));
/// ```
#[derive(Debug, Clone)]
pub struct TreeRegexp {
    pattern: String,
    regex: Regex,
    group_builder: GroupBuilder,
}

impl TreeRegexp {
    pub fn new(pattern: &str) -> Result<Self, ExpressionError> {
        let regex = Regex::new(&ascii_digits(pattern))?;
        let parsed = ast::parse::Parser::new().parse(pattern).map_err(|e| {
            err_src!(
                Regex,
                format!("{pattern}: {}", e.kind()),
                ErrorContext::none(),
                e
            )
        })?;
        let mut children = Vec::new();
        collect_groups(&parsed, pattern, &mut children);
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            group_builder: GroupBuilder {
                source: pattern.to_string(),
                children,
            },
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compiled matcher. Its source differs from [`TreeRegexp::pattern`]
    /// wherever `\d` or `\D` was narrowed to ASCII.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The root builder; its children are the top-level capture groups.
    pub fn group_builder(&self) -> &GroupBuilder {
        &self.group_builder
    }

    /// Finds the first match in `text` and returns the whole match as the
    /// root group.
    pub fn match_text(&self, text: &str) -> Option<Group> {
        let captures = self.regex.captures(text)?;
        let mut index = 0;
        Some(self.group_builder.build(&captures, &mut index))
    }
}

/// The static shape of a capture group: its source and nested groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBuilder {
    pub source: String,
    pub children: Vec<GroupBuilder>,
}

impl GroupBuilder {
    /// Capture indices follow the order of opening parentheses, so a
    /// pre-order walk lines builders up with `captures`.
    fn build(&self, captures: &Captures<'_>, index: &mut usize) -> Group {
        let matched = captures.get(*index);
        *index += 1;
        let children = self
            .children
            .iter()
            .map(|child| child.build(captures, index))
            .collect();
        Group {
            value: matched.map(|m| m.as_str().to_string()),
            start: matched.map(|m| m.start()),
            end: matched.map(|m| m.end()),
            children,
        }
    }
}

/// A matched capture group. Positions are byte offsets into the text;
/// groups that did not participate have no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub value: Option<String>,
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub children: Vec<Group>,
}

impl Group {
    /// The children's values, or this group's own value when it has none.
    pub fn values(&self) -> Vec<Option<&str>> {
        if self.children.is_empty() {
            vec![self.value.as_deref()]
        } else {
            self.children.iter().map(|c| c.value.as_deref()).collect()
        }
    }
}

/// Rewrites `\d` to `[0-9]` and `\D` to `[^0-9]`. Both forms are also
/// valid inside a character class, where they nest.
pub(crate) fn ascii_digits(pattern: &str) -> Cow<'_, str> {
    if !pattern.contains("\\d") && !pattern.contains("\\D") {
        return Cow::Borrowed(pattern);
    }
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('d') => out.push_str("[0-9]"),
            Some('D') => out.push_str("[^0-9]"),
            Some(escaped) => {
                out.push('\\');
                out.push(escaped);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}

fn collect_groups(node: &Ast, pattern: &str, out: &mut Vec<GroupBuilder>) {
    match node {
        Ast::Group(group) => {
            if matches!(group.kind, ast::GroupKind::NonCapturing(_)) {
                collect_groups(&group.ast, pattern, out);
                return;
            }
            let mut children = Vec::new();
            collect_groups(&group.ast, pattern, &mut children);
            let inner = group.ast.span();
            out.push(GroupBuilder {
                source: pattern[inner.start.offset..inner.end.offset].to_string(),
                children,
            });
        }
        Ast::Concat(concat) => {
            for child in &concat.asts {
                collect_groups(child, pattern, out);
            }
        }
        Ast::Alternation(alternation) => {
            for child in &alternation.asts {
                collect_groups(child, pattern, out);
            }
        }
        Ast::Repetition(repetition) => collect_groups(&repetition.ast, pattern, out),
        _ => {}
    }
}
