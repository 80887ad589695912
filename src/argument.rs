//! Matched arguments: a top-level capture group paired with the parameter
//! type that converts it.

use std::sync::Arc;

use crate::parameters::{ParameterType, Value};
use crate::tree_regexp::{Group, TreeRegexp};
use crate::{err_msg, ExpressionError};

#[derive(Debug, Clone)]
pub struct Argument {
    group: Group,
    parameter_type: Arc<ParameterType>,
}

impl Argument {
    /// Pairs the children of `group` (the whole match) with
    /// `parameter_types`, in order.
    pub fn build(
        tree_regexp: &TreeRegexp,
        group: Group,
        parameter_types: &[Arc<ParameterType>],
    ) -> Result<Vec<Argument>, ExpressionError> {
        let arg_groups = group.children;
        if arg_groups.len() != parameter_types.len() {
            let values: Vec<&str> = arg_groups
                .iter()
                .map(|g| g.value.as_deref().unwrap_or("null"))
                .collect();
            let names: Vec<&str> = parameter_types.iter().map(|t| t.name()).collect();
            return Err(err_msg!(
                CaptureGroupMismatch,
                "Expression /{}/ has {} capture groups ([{}]), but there were {} parameter types ([{}])",
                tree_regexp.pattern(),
                arg_groups.len(),
                values.join(", "),
                parameter_types.len(),
                names.join(", ")
            ));
        }
        Ok(arg_groups
            .into_iter()
            .zip(parameter_types.iter().cloned())
            .map(|(group, parameter_type)| Argument {
                group,
                parameter_type,
            })
            .collect())
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn parameter_type(&self) -> &ParameterType {
        &self.parameter_type
    }

    /// Transforms the group's values with the parameter type.
    pub fn value(&self) -> Result<Value, ExpressionError> {
        self.parameter_type.transform(&self.group.values())
    }
}
