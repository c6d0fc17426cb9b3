use crate::ast::{AssignTarget, Expr};
use crate::console::Console;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::ops::access::{array_length, checked_index};
use crate::interpreter::type_system::{coerce, describe, Coercion};
use crate::memory::value::{Aggregate, Value};

impl<C: Console> Interpreter<C> {
    /// Evaluate the right-hand side, then store it through `target`
    pub(crate) fn execute_assignment(
        &mut self,
        target: &AssignTarget,
        value: &Expr,
    ) -> Result<(), RuntimeError> {
        let value = self.evaluate_expr(value)?;

        match target {
            AssignTarget::Variable(name) => self.assign_variable(name, value),
            AssignTarget::Field { base, path } => self.assign_field(base, path, value),
            AssignTarget::Index { array, index } => self.assign_index(array, index, value),
        }
    }

    pub(crate) fn assign_variable(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let scope = self.current_scope;
        let var_type = self.scopes.lookup(scope, name, false)?.var_type.clone();
        let value = self.coerce_value(&var_type, value, name)?;
        tracing::debug!(variable = name, value = %value, "assigned");
        self.scopes.assign(scope, name, value)
    }

    /// Store into `base.path[0].path[1]...`, walking nested aggregates
    fn assign_field(&mut self, base: &str, path: &[String], value: Value) -> Result<(), RuntimeError> {
        let Some((leaf, intermediate)) = path.split_last() else {
            return self.assign_variable(base, value);
        };
        let label = format!("{}.{}", base, path.join("."));
        let scope = self.current_scope;

        let var = self.scopes.lookup_mut(scope, base)?;
        let mut current: &mut Aggregate = match &mut var.value {
            Value::Aggregate(aggregate) => aggregate,
            other => {
                return Err(RuntimeError::NotAnAggregate {
                    field: path[0].clone(),
                    got: describe(other),
                })
            }
        };

        for segment in intermediate {
            let shape = current.shape.clone();
            let slot = current
                .field_mut(segment)
                .ok_or_else(|| RuntimeError::UnknownField {
                    shape,
                    field: segment.clone(),
                })?;
            current = match &mut slot.value {
                Value::Aggregate(inner) => inner,
                _ => {
                    return Err(RuntimeError::NotASubAggregate {
                        field: segment.clone(),
                    })
                }
            };
        }

        let shape = current.shape.clone();
        let slot = current
            .field_mut(leaf)
            .ok_or_else(|| RuntimeError::UnknownField {
                shape,
                field: leaf.clone(),
            })?;
        let Coercion { value, warning } = coerce(&slot.field_type, value, &label)?;
        tracing::debug!(field = %label, value = %value, "assigned");
        slot.value = value;

        if let Some(message) = warning {
            self.warn(message);
        }
        Ok(())
    }

    /// Store into `array[index]` after bounds checking
    fn assign_index(&mut self, array: &str, index: &Expr, value: Value) -> Result<(), RuntimeError> {
        let index_value = self.evaluate_expr(index)?;
        let scope = self.current_scope;

        let (element_type, i) = {
            let var = self.scopes.lookup(scope, array, false)?;
            let len = array_length(array, var)?;
            (var.var_type.element_type(), checked_index(array, &index_value, len)?)
        };

        let label = format!("{}[{}]", array, i);
        let value = self.coerce_value(&element_type, value, &label)?;
        tracing::debug!(element = %label, value = %value, "assigned");

        let var = self.scopes.lookup_mut(scope, array)?;
        match &mut var.value {
            Value::Array(elements) => {
                elements[i] = value;
                Ok(())
            }
            _ => Err(RuntimeError::NotAnArray {
                name: array.to_string(),
            }),
        }
    }
}
