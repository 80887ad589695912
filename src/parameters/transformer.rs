//! Conversion of matched text into typed [`Value`]s.
//!
//! Anonymous parameters (`{}` and unmatched regexp groups) have no
//! transformer of their own. Their text is converted by a
//! [`ParameterByTypeTransformer`] using the caller's [`TypeHint`].

use std::fmt;
use std::str::FromStr;

use crate::parameters::number::NumberFormat;
use crate::parameters::value::Value;
use crate::{err_msg, ErrorContext, ExpressionError};

/// The type a caller wants a matched group converted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TypeHint {
    #[default]
    String,
    I8,
    I16,
    I32,
    I64,
    I128,
    F32,
    F64,
    Bool,
    Optional(Box<TypeHint>),
    Enum { name: String, variants: Vec<String> },
    /// A type the built-in transformer knows nothing about.
    Other(String),
}

impl TypeHint {
    pub fn type_name(&self) -> String {
        match self {
            TypeHint::String => "String".to_string(),
            TypeHint::I8 => "i8".to_string(),
            TypeHint::I16 => "i16".to_string(),
            TypeHint::I32 => "i32".to_string(),
            TypeHint::I64 => "i64".to_string(),
            TypeHint::I128 => "i128".to_string(),
            TypeHint::F32 => "f32".to_string(),
            TypeHint::F64 => "f64".to_string(),
            TypeHint::Bool => "bool".to_string(),
            TypeHint::Optional(inner) => format!("Option<{}>", inner.type_name()),
            TypeHint::Enum { name, .. } => name.clone(),
            TypeHint::Other(name) => name.clone(),
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Parses the names printed by [`TypeHint::type_name`]. Unknown names
/// become [`TypeHint::Other`].
impl FromStr for TypeHint {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(inner) = s.strip_prefix("Option<").and_then(|rest| rest.strip_suffix('>')) {
            return Ok(TypeHint::Optional(Box::new(inner.parse()?)));
        }
        let hint = match s {
            "" => return Err(err_msg!(Transform, "A type hint may not be empty")),
            "String" | "string" | "str" => TypeHint::String,
            "i8" | "byte" => TypeHint::I8,
            "i16" | "short" => TypeHint::I16,
            "i32" | "int" => TypeHint::I32,
            "i64" | "long" => TypeHint::I64,
            "i128" | "biginteger" => TypeHint::I128,
            "f32" | "float" => TypeHint::F32,
            "f64" | "double" => TypeHint::F64,
            "bool" | "boolean" => TypeHint::Bool,
            other => TypeHint::Other(other.to_string()),
        };
        Ok(hint)
    }
}

/// Converts a matched group (or `None` when it did not participate) into a
/// value of the hinted type.
pub trait ParameterByTypeTransformer: Send + Sync {
    fn transform(&self, from: Option<&str>, to: &TypeHint) -> Result<Value, ExpressionError>;
}

/// The default [`ParameterByTypeTransformer`], covering strings, numbers,
/// booleans, enums and optionals.
///
/// # Examples
///
/// ```rust
/// use cukex::{BuiltInParameterTransformer, NumberFormat, ParameterByTypeTransformer, TypeHint, Value};
/// let transformer = BuiltInParameterTransformer::new(NumberFormat::english());
/// assert_eq!(transformer.transform(Some("0x1F"), &TypeHint::I32).unwrap(), Value::I32(31));
/// assert_eq!(transformer.transform(None, &TypeHint::I32).unwrap(), Value::Nil);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BuiltInParameterTransformer {
    number_format: NumberFormat,
}

impl BuiltInParameterTransformer {
    pub fn new(number_format: NumberFormat) -> Self {
        Self { number_format }
    }

    pub fn number_format(&self) -> &NumberFormat {
        &self.number_format
    }
}

impl ParameterByTypeTransformer for BuiltInParameterTransformer {
    fn transform(&self, from: Option<&str>, to: &TypeHint) -> Result<Value, ExpressionError> {
        match (from, to) {
            (None, TypeHint::Optional(_)) => Ok(Value::Optional(None)),
            (None, _) => Ok(Value::Nil),
            (Some(from), to) => self.convert(from, to),
        }
    }
}

impl BuiltInParameterTransformer {
    fn convert(&self, from: &str, to: &TypeHint) -> Result<Value, ExpressionError> {
        let failed = |cause: Cause| ExpressionError::Transform {
            message: format!("Can't transform '{from}' to {to}"),
            ctx: ErrorContext::none(),
            source: Some(cause),
        };
        let value = match to {
            TypeHint::String => Value::Str(from.to_string()),
            TypeHint::I8 => Value::I8(decode(from).and_then(narrow).map_err(failed)?),
            TypeHint::I16 => Value::I16(decode(from).and_then(narrow).map_err(failed)?),
            TypeHint::I32 => Value::I32(decode(from).and_then(narrow).map_err(failed)?),
            TypeHint::I64 => Value::I64(decode(from).and_then(narrow).map_err(failed)?),
            TypeHint::I128 => Value::I128(from.parse().map_err(|e| failed(Box::new(e)))?),
            TypeHint::F32 => Value::F32(
                self.number_format
                    .parse_f32(from)
                    .map_err(|e| failed(Box::new(e)))?,
            ),
            TypeHint::F64 => Value::F64(
                self.number_format
                    .parse_f64(from)
                    .map_err(|e| failed(Box::new(e)))?,
            ),
            TypeHint::Bool => Value::Bool(from.eq_ignore_ascii_case("true")),
            TypeHint::Optional(inner) => Value::Optional(Some(Box::new(self.convert(from, inner)?))),
            TypeHint::Enum { name, variants } => {
                let variant = variants.iter().find(|v| v.as_str() == from).ok_or_else(|| {
                    err_msg!(Transform, "Can't transform '{}' to {}. Not an enum constant", from, name)
                })?;
                Value::Enum {
                    type_name: name.clone(),
                    variant: variant.clone(),
                }
            }
            TypeHint::Other(name) => {
                return Err(err_msg!(
                    Transform,
                    "Can't transform '{}' to {}\n\
                     BuiltInParameterTransformer only supports a limited number of class types\n\
                     Consider using a different object mapper or register a parameter type for {}",
                    from,
                    name,
                    name
                ))
            }
        };
        Ok(value)
    }
}

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Integer decoding: an optional sign, then a `0x`, `0X` or `#` hex prefix
/// or a leading `0` for octal.
fn decode(text: &str) -> Result<i128, Cause> {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, digits) = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (16, hex)
    } else if let Some(hex) = rest.strip_prefix('#') {
        (16, hex)
    } else if rest.len() > 1 && rest.starts_with('0') {
        (8, &rest[1..])
    } else {
        (10, rest)
    };
    if digits.starts_with('-') || digits.starts_with('+') {
        return Err(format!("Sign character in wrong position: {text}").into());
    }
    let magnitude = i128::from_str_radix(digits, radix)?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn narrow<T: TryFrom<i128, Error = std::num::TryFromIntError>>(n: i128) -> Result<T, Cause> {
    Ok(T::try_from(n)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(from: Option<&str>, to: TypeHint) -> Result<Value, ExpressionError> {
        BuiltInParameterTransformer::default().transform(from, &to)
    }

    #[test]
    fn decodes_integers() {
        assert_eq!(transform(Some("42"), TypeHint::I32).unwrap(), Value::I32(42));
        assert_eq!(transform(Some("-0x10"), TypeHint::I64).unwrap(), Value::I64(-16));
        assert_eq!(transform(Some("#ff"), TypeHint::I16).unwrap(), Value::I16(255));
        assert_eq!(transform(Some("010"), TypeHint::I32).unwrap(), Value::I32(8));
        assert_eq!(transform(Some("0"), TypeHint::I8).unwrap(), Value::I8(0));
    }

    #[test]
    fn rejects_out_of_range_and_misplaced_signs() {
        let err = transform(Some("128"), TypeHint::I8).unwrap_err();
        assert_eq!(err.to_string(), "Can't transform '128' to i8");
        assert!(transform(Some("0x-1"), TypeHint::I32).is_err());
        assert!(transform(Some("abc"), TypeHint::I32).is_err());
    }

    #[test]
    fn big_integers_are_plain_decimal() {
        assert_eq!(
            transform(Some("170141183460469231731687303715884105727"), TypeHint::I128).unwrap(),
            Value::I128(i128::MAX)
        );
    }

    #[test]
    fn floats_follow_the_number_format() {
        let german = BuiltInParameterTransformer::new(NumberFormat::new(',', '.').unwrap());
        assert_eq!(
            german.transform(Some("1.250,5"), &TypeHint::F64).unwrap(),
            Value::F64(1250.5)
        );
        assert_eq!(transform(Some("-.5"), TypeHint::F32).unwrap(), Value::F32(-0.5));
    }

    #[test]
    fn booleans_are_lenient() {
        assert_eq!(transform(Some("TRUE"), TypeHint::Bool).unwrap(), Value::Bool(true));
        assert_eq!(transform(Some("yes"), TypeHint::Bool).unwrap(), Value::Bool(false));
    }

    #[test]
    fn enums_and_optionals() {
        let color = TypeHint::Enum {
            name: "Color".into(),
            variants: vec!["RED".into(), "BLUE".into()],
        };
        assert_eq!(
            transform(Some("RED"), color.clone()).unwrap(),
            Value::Enum {
                type_name: "Color".into(),
                variant: "RED".into()
            }
        );
        assert_eq!(
            transform(Some("red"), color).unwrap_err().to_string(),
            "Can't transform 'red' to Color. Not an enum constant"
        );
        let optional = TypeHint::Optional(Box::new(TypeHint::I32));
        assert_eq!(transform(None, optional.clone()).unwrap(), Value::Optional(None));
        assert_eq!(
            transform(Some("3"), optional).unwrap(),
            Value::Optional(Some(Box::new(Value::I32(3))))
        );
    }

    #[test]
    fn unknown_types_fail_only_with_input() {
        let other = TypeHint::Other("Point".into());
        assert_eq!(transform(None, other.clone()).unwrap(), Value::Nil);
        let err = transform(Some("1,2"), other).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Can't transform '1,2' to Point\n\
             BuiltInParameterTransformer only supports a limited number of class types\n\
             Consider using a different object mapper or register a parameter type for Point"
        );
    }

    #[test]
    fn hints_parse_from_names() {
        assert_eq!("int".parse::<TypeHint>().unwrap(), TypeHint::I32);
        assert_eq!(
            "Option<f64>".parse::<TypeHint>().unwrap(),
            TypeHint::Optional(Box::new(TypeHint::F64))
        );
        assert_eq!("Point".parse::<TypeHint>().unwrap(), TypeHint::Other("Point".into()));
        assert_eq!(TypeHint::Optional(Box::new(TypeHint::I8)).to_string(), "Option<i8>");
    }
}
