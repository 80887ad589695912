//! Whole-word matches of one parameter type regexp in snippet text.

use std::cmp::Ordering;
use std::sync::Arc;

use regex::Regex;

use crate::parameters::ParameterType;
use crate::tree_regexp::ascii_digits;
use crate::ExpressionError;

/// Finds occurrences of one of a parameter type's regexps in `text`.
pub struct ParameterTypeMatcher<'t> {
    parameter_type: Arc<ParameterType>,
    regex: Regex,
    text: &'t str,
}

/// One whole-word occurrence. `start` and `end` are byte offsets.
#[derive(Debug, Clone)]
pub struct ParameterTypeMatch {
    pub parameter_type: Arc<ParameterType>,
    pub start: usize,
    pub end: usize,
}

impl ParameterTypeMatch {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Earlier first, then longer, then heavier.
    pub fn compare(&self, other: &ParameterTypeMatch) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| other.len().cmp(&self.len()))
            .then_with(|| other.parameter_type.weight().cmp(&self.parameter_type.weight()))
    }
}

impl<'t> ParameterTypeMatcher<'t> {
    pub fn new(parameter_type: Arc<ParameterType>, regexp: &str, text: &'t str) -> Result<Self, ExpressionError> {
        Ok(Self {
            parameter_type,
            regex: Regex::new(&format!("(?:{})", ascii_digits(regexp)))?,
            text,
        })
    }

    /// The first non-empty whole-word match starting at or after `pos`.
    pub fn find_from(&self, pos: usize, separator: &Regex) -> Option<ParameterTypeMatch> {
        let rest = self.text.get(pos..)?;
        for (offset, _) in rest.char_indices() {
            let found = self.regex.find_at(self.text, pos + offset)?;
            if !found.as_str().is_empty() && self.is_whole_word(found.start(), found.end(), separator) {
                return Some(ParameterTypeMatch {
                    parameter_type: Arc::clone(&self.parameter_type),
                    start: found.start(),
                    end: found.end(),
                });
            }
        }
        None
    }

    fn is_whole_word(&self, start: usize, end: usize, separator: &Regex) -> bool {
        let is_separator = |c: char| separator.is_match(c.encode_utf8(&mut [0; 4]));
        let before = self.text[..start].chars().next_back();
        let after = self.text[end..].chars().next();
        before.map_or(true, is_separator) && after.map_or(true, is_separator)
    }
}
