//! Generated Cucumber Expressions and their parameter names.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::parameters::ParameterType;

/// A Cucumber Expression proposed for a piece of step text.
///
/// The template is kept as literal segments; there is one more segment than
/// there are parameter types.
#[derive(Debug, Clone)]
pub struct GeneratedExpression {
    literals: Arc<Vec<String>>,
    parameter_types: Vec<Arc<ParameterType>>,
}

impl GeneratedExpression {
    pub(crate) fn new(literals: Arc<Vec<String>>, parameter_types: Vec<Arc<ParameterType>>) -> Self {
        Self {
            literals,
            parameter_types,
        }
    }

    /// The expression with `{name}` in every parameter slot.
    pub fn source(&self) -> String {
        let mut source = String::new();
        for (i, literal) in self.literals.iter().enumerate() {
            source.push_str(literal);
            if let Some(parameter_type) = self.parameter_types.get(i) {
                source.push('{');
                source.push_str(parameter_type.name());
                source.push('}');
            }
        }
        source
    }

    /// Argument names for a step definition: the type name, numbered from
    /// the second use on (`int`, `int2`, ...).
    pub fn parameter_names(&self) -> Vec<String> {
        let mut usage: HashMap<&str, usize> = HashMap::new();
        self.parameter_types
            .iter()
            .map(|parameter_type| {
                let name = parameter_type.name();
                let count = usage.entry(name).or_insert(0);
                *count += 1;
                if *count == 1 {
                    name.to_string()
                } else {
                    format!("{name}{count}")
                }
            })
            .collect()
    }

    pub fn parameter_types(&self) -> &[Arc<ParameterType>] {
        &self.parameter_types
    }

    /// Serializable view for `--json` output.
    pub fn summary(&self) -> GeneratedSummary {
        GeneratedSummary {
            source: self.source(),
            parameter_names: self.parameter_names(),
            types: self
                .parameter_types
                .iter()
                .map(|t| t.type_name().to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedSummary {
    pub source: String,
    pub parameter_names: Vec<String>,
    pub types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterTypeRegistry;

    #[test]
    fn fills_slots_and_numbers_names() {
        let registry = ParameterTypeRegistry::new();
        let int = registry.lookup_by_type_name("int").unwrap();
        let float = registry.lookup_by_type_name("float").unwrap();
        let generated = GeneratedExpression::new(
            Arc::new(vec!["a ".into(), " b ".into(), " c ".into(), "".into()]),
            vec![Arc::clone(&int), float, int],
        );
        assert_eq!(generated.source(), "a {int} b {float} c {int}");
        assert_eq!(generated.parameter_names(), vec!["int", "float", "int2"]);
        assert_eq!(generated.summary().types, vec!["i32", "f32", "i32"]);
    }
}
