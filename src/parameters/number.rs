//! Locale-style number formatting for `{float}` and `{double}`.

use std::num::ParseFloatError;

use serde::{Deserialize, Serialize};

use crate::{err_msg, ExpressionError};

/// Separators used when matching and parsing decimal numbers.
///
/// There is no locale database behind this: callers pick the separators.
///
/// # Examples
///
/// ```rust
/// use cukex::NumberFormat;
/// let german = NumberFormat::new(',', '.').unwrap();
/// assert_eq!(german.parse_f64("1.000,5").unwrap(), 1000.5);
/// assert_eq!(NumberFormat::english().parse_f64("-1,000.25").unwrap(), -1000.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub minus_sign: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::english()
    }
}

impl NumberFormat {
    pub fn english() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
            minus_sign: '-',
        }
    }

    /// # Errors
    /// The two separators are the same character.
    pub fn new(decimal_separator: char, grouping_separator: char) -> Result<Self, ExpressionError> {
        if decimal_separator == grouping_separator {
            return Err(err_msg!(
                Registry,
                "Decimal separator '{}' must differ from the grouping separator",
                decimal_separator
            ));
        }
        Ok(Self {
            decimal_separator,
            grouping_separator,
            minus_sign: '-',
        })
    }

    /// The grouping separator conventionally paired with
    /// `decimal_separator`: `.` for `,`, and `,` otherwise.
    pub fn grouping_for(decimal_separator: char) -> char {
        if decimal_separator == ',' {
            '.'
        } else {
            ','
        }
    }

    /// Regexp matching a decimal number in this format, with an optional
    /// exponent. Contains no capture groups.
    pub fn float_regexp(&self) -> String {
        let minus = escape(self.minus_sign);
        let group = escape(self.grouping_separator);
        let decimal = escape(self.decimal_separator);
        format!(
            r"[-+{minus}]?(?:\d+(?:[{group}]?\d+)*(?:[{decimal}]\d+)?|[{decimal}]\d+)(?:E[-+]?\d+)?"
        )
    }

    /// Rewrites `text` into the form Rust's float parser accepts.
    pub fn normalize(&self, text: &str) -> String {
        text.chars()
            .filter(|c| *c != self.grouping_separator)
            .map(|c| {
                if c == self.decimal_separator {
                    '.'
                } else if c == self.minus_sign {
                    '-'
                } else {
                    c
                }
            })
            .collect()
    }

    pub fn parse_f64(&self, text: &str) -> Result<f64, ParseFloatError> {
        self.normalize(text).parse()
    }

    pub fn parse_f32(&self, text: &str) -> Result<f32, ParseFloatError> {
        self.normalize(text).parse()
    }
}

fn escape(c: char) -> String {
    regex::escape(c.encode_utf8(&mut [0; 4]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn full_match(format: &NumberFormat, text: &str) -> bool {
        let re = Regex::new(&format!("^(?:{})$", format.float_regexp())).unwrap();
        re.is_match(text)
    }

    #[test]
    fn english_float_regexp() {
        let english = NumberFormat::english();
        for text in ["1", "-1.5", ".5", "+3", "1,000.25", "1.5E-10"] {
            assert!(full_match(&english, text), "{text}");
        }
        for text in ["", "1.", "abc", "1,5,"] {
            assert!(!full_match(&english, text), "{text}");
        }
    }

    #[test]
    fn swapped_separators() {
        let german = NumberFormat::new(',', '.').unwrap();
        assert!(full_match(&german, "1.000,5"));
        assert_eq!(german.parse_f32("-0,25").unwrap(), -0.25);
    }

    #[test]
    fn equal_separators_are_rejected() {
        let err = NumberFormat::new(',', ',').unwrap_err();
        assert_eq!(err.error_type(), crate::ErrorType::Registry);
        assert_eq!(
            err.to_string(),
            "Decimal separator ',' must differ from the grouping separator"
        );
        assert_eq!(NumberFormat::grouping_for(','), '.');
        assert_eq!(NumberFormat::grouping_for('.'), ',');
    }

    #[test]
    fn exponents_parse() {
        assert_eq!(NumberFormat::english().parse_f64("1.5E2").unwrap(), 150.0);
    }
}
