//! Expansion of per-slot parameter type choices into expressions.

use std::sync::Arc;

use crate::generator::generated::GeneratedExpression;
use crate::parameters::ParameterType;

/// Upper bound on the expressions generated for one text.
pub const MAX_EXPRESSIONS: usize = 256;

/// Builds one [`GeneratedExpression`] per combination of slot choices, in
/// order, stopping at [`MAX_EXPRESSIONS`].
pub struct CombinatorialGeneratedExpressionFactory {
    literals: Arc<Vec<String>>,
    parameter_type_combinations: Vec<Vec<Arc<ParameterType>>>,
}

impl CombinatorialGeneratedExpressionFactory {
    pub fn new(literals: Vec<String>, parameter_type_combinations: Vec<Vec<Arc<ParameterType>>>) -> Self {
        Self {
            literals: Arc::new(literals),
            parameter_type_combinations,
        }
    }

    pub fn generate_expressions(&self) -> Vec<GeneratedExpression> {
        let mut generated = Vec::new();
        self.generate_permutations(&mut generated, 0, &mut Vec::new());
        generated
    }

    fn generate_permutations(
        &self,
        generated: &mut Vec<GeneratedExpression>,
        depth: usize,
        current: &mut Vec<Arc<ParameterType>>,
    ) {
        if generated.len() >= MAX_EXPRESSIONS {
            return;
        }
        let Some(choices) = self.parameter_type_combinations.get(depth) else {
            generated.push(GeneratedExpression::new(
                Arc::clone(&self.literals),
                current.clone(),
            ));
            return;
        };
        for parameter_type in choices {
            if generated.len() >= MAX_EXPRESSIONS {
                return;
            }
            current.push(Arc::clone(parameter_type));
            self.generate_permutations(generated, depth + 1, current);
            current.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{ParameterType, Value};

    fn named(name: &str) -> Arc<ParameterType> {
        Arc::new(ParameterType::new(name, ["x"], name, |_| Ok(Value::Nil)).unwrap())
    }

    #[test]
    fn expands_in_order() {
        let (a, b, c) = (named("a"), named("b"), named("c"));
        let factory = CombinatorialGeneratedExpressionFactory::new(
            vec!["".into(), " ".into(), "".into()],
            vec![vec![a.clone(), b.clone()], vec![c.clone(), a.clone()]],
        );
        let sources: Vec<String> = factory.generate_expressions().iter().map(|g| g.source()).collect();
        assert_eq!(sources, vec!["{a} {c}", "{a} {a}", "{b} {c}", "{b} {a}"]);
    }

    #[test]
    fn stops_at_the_limit() {
        let choices: Vec<Arc<ParameterType>> = (0..4).map(|i| named(&format!("t{i}"))).collect();
        let factory = CombinatorialGeneratedExpressionFactory::new(
            vec![String::new(); 6],
            vec![choices; 5],
        );
        assert_eq!(factory.generate_expressions().len(), MAX_EXPRESSIONS);
    }

    #[test]
    fn no_slots_gives_the_text() {
        let factory = CombinatorialGeneratedExpressionFactory::new(vec!["hello".into()], vec![]);
        let generated = factory.generate_expressions();
        assert_eq!(generated.len(), 1);
        assert_eq!(generated[0].source(), "hello");
    }
}
