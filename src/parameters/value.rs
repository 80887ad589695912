//! Values produced by parameter type transformers.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// The result of transforming a matched group.
///
/// Built-in parameter types produce the primitive variants; user-defined
/// parameter types usually wrap their own type in [`Value::Custom`].
///
/// # Examples
///
/// ```rust
/// use cukex::Value;
/// #[derive(Debug, PartialEq)]
/// struct Color(String);
/// let value = Value::custom(Color("red".into()));
/// assert_eq!(value.downcast_ref::<Color>(), Some(&Color("red".into())));
/// assert_eq!(Value::I32(42).as_i64(), Some(42));
/// ```
#[derive(Clone, Default)]
pub enum Value {
    /// The group did not participate in the match.
    #[default]
    Nil,
    Str(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    F32(f32),
    F64(f64),
    Bool(bool),
    Enum {
        type_name: String,
        variant: String,
    },
    Optional(Option<Box<Value>>),
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Value {
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Value::Custom(Arc::new(value))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Enum { variant, .. } => Some(variant),
            _ => None,
        }
    }

    /// Any integer variant widened to `i64`, when it fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I8(n) => Some(i64::from(*n)),
            Value::I16(n) => Some(i64::from(*n)),
            Value::I32(n) => Some(i64::from(*n)),
            Value::I64(n) => Some(*n),
            Value::I128(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Any numeric variant as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(n) => Some(f64::from(*n)),
            Value::F64(n) => Some(*n),
            other => other.as_i64().map(|n| n as f64),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::I8(n) => f.debug_tuple("I8").field(n).finish(),
            Value::I16(n) => f.debug_tuple("I16").field(n).finish(),
            Value::I32(n) => f.debug_tuple("I32").field(n).finish(),
            Value::I64(n) => f.debug_tuple("I64").field(n).finish(),
            Value::I128(n) => f.debug_tuple("I128").field(n).finish(),
            Value::F32(n) => f.debug_tuple("F32").field(n).finish(),
            Value::F64(n) => f.debug_tuple("F64").field(n).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Enum { type_name, variant } => f
                .debug_struct("Enum")
                .field("type_name", type_name)
                .field("variant", variant)
                .finish(),
            Value::Optional(inner) => f.debug_tuple("Optional").field(inner).finish(),
            Value::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::I128(a), Value::I128(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (
                Value::Enum {
                    type_name: ta,
                    variant: va,
                },
                Value::Enum {
                    type_name: tb,
                    variant: vb,
                },
            ) => ta == tb && va == vb,
            (Value::Optional(a), Value::Optional(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil | Value::Optional(None) => write!(f, "null"),
            Value::Str(s) => write!(f, "{s}"),
            Value::I8(n) => write!(f, "{n}"),
            Value::I16(n) => write!(f, "{n}"),
            Value::I32(n) => write!(f, "{n}"),
            Value::I64(n) => write!(f, "{n}"),
            Value::I128(n) => write!(f, "{n}"),
            Value::F32(n) => write!(f, "{n}"),
            Value::F64(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Enum { variant, .. } => write!(f, "{variant}"),
            Value::Optional(Some(inner)) => write!(f, "{inner}"),
            Value::Custom(_) => write!(f, "<custom>"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Str(s) => serializer.serialize_str(s),
            Value::I8(n) => serializer.serialize_i8(*n),
            Value::I16(n) => serializer.serialize_i16(*n),
            Value::I32(n) => serializer.serialize_i32(*n),
            Value::I64(n) => serializer.serialize_i64(*n),
            Value::I128(n) => match i64::try_from(*n) {
                Ok(small) => serializer.serialize_i64(small),
                Err(_) => serializer.serialize_str(&n.to_string()),
            },
            Value::F32(n) => serializer.serialize_f32(*n),
            Value::F64(n) => serializer.serialize_f64(*n),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Enum { variant, .. } => serializer.serialize_str(variant),
            Value::Optional(None) => serializer.serialize_none(),
            Value::Optional(Some(inner)) => serializer.serialize_some(inner.as_ref()),
            Value::Custom(_) => serializer.serialize_str("<custom>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_accessors_widen() {
        assert_eq!(Value::I8(-3).as_i64(), Some(-3));
        assert_eq!(Value::I128(i128::MAX).as_i64(), None);
        assert_eq!(Value::F32(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::Str("x".into()).as_i64(), None);
    }

    #[test]
    fn custom_values_compare_by_identity() {
        let a = Value::custom(7u8);
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Value::custom(7u8));
        assert_eq!(a.downcast_ref::<u8>(), Some(&7));
        assert_eq!(a.downcast_ref::<u16>(), None);
    }

    #[test]
    fn serializes_like_plain_yaml_scalars() {
        let values = vec![
            Value::I32(22),
            Value::Str("cukes".into()),
            Value::Nil,
            Value::Optional(Some(Box::new(Value::F64(1.5)))),
        ];
        let yaml = serde_yaml::to_string(&values).unwrap();
        assert_eq!(yaml, "- 22\n- cukes\n- null\n- 1.5\n");
    }
}
