//! Parameter types, their registry, and the values they produce.

pub mod number;
pub mod parameter_type;
pub mod registry;
pub mod transformer;
pub mod value;

pub use number::NumberFormat;
pub use parameter_type::{transformer, ParameterType, Transformer};
pub use registry::ParameterTypeRegistry;
pub use transformer::{BuiltInParameterTransformer, ParameterByTypeTransformer, TypeHint};
pub use value::Value;
