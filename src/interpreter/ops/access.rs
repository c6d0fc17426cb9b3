use crate::ast::Expr;
use crate::console::Console;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::expressions::expr_label;
use crate::interpreter::type_system::describe;
use crate::memory::scope::Variable;
use crate::memory::value::Value;

/// Length of an array variable, or `NotAnArray`
pub(crate) fn array_length(name: &str, var: &Variable) -> Result<usize, RuntimeError> {
    match (&var.var_type.array_len, &var.value) {
        (Some(_), Value::Array(elements)) => Ok(elements.len()),
        _ => Err(RuntimeError::NotAnArray {
            name: name.to_string(),
        }),
    }
}

/// Validate a subscript against an array of length `len`
pub(crate) fn checked_index(name: &str, index: &Value, len: usize) -> Result<usize, RuntimeError> {
    match index {
        Value::Int(i) if *i >= 0 && (*i as usize) < len => Ok(*i as usize),
        Value::Int(i) => Err(RuntimeError::IndexOutOfRange {
            name: name.to_string(),
            index: *i,
            len,
        }),
        other => Err(RuntimeError::NonIntegerIndex {
            name: name.to_string(),
            got: describe(other),
        }),
    }
}

impl<C: Console> Interpreter<C> {
    /// `base.field`: the base must evaluate to an aggregate owning `field`
    pub(crate) fn evaluate_field_access(
        &mut self,
        base: &Expr,
        field: &str,
    ) -> Result<Value, RuntimeError> {
        let aggregate = match self.evaluate_expr(base)? {
            Value::Aggregate(aggregate) => aggregate,
            other => {
                return Err(RuntimeError::NotAnAggregate {
                    field: field.to_string(),
                    got: describe(&other),
                })
            }
        };

        let shape = aggregate.shape;
        let slot = aggregate
            .fields
            .into_iter()
            .find(|slot| slot.name == field)
            .ok_or_else(|| RuntimeError::UnknownField {
                shape,
                field: field.to_string(),
            })?;

        if !slot.value.is_initialized() {
            return Err(RuntimeError::UseBeforeInit {
                name: format!("{}.{}", expr_label(base), field),
            });
        }
        Ok(slot.value)
    }

    /// `array[index]` with bounds and initialization checks
    pub(crate) fn evaluate_index_access(
        &mut self,
        array: &str,
        index: &Expr,
    ) -> Result<Value, RuntimeError> {
        let index_value = self.evaluate_expr(index)?;

        let var = self.scopes.lookup(self.current_scope, array, true)?;
        let len = array_length(array, var)?;
        let i = checked_index(array, &index_value, len)?;

        let element = match &var.value {
            Value::Array(elements) => &elements[i],
            _ => {
                return Err(RuntimeError::NotAnArray {
                    name: array.to_string(),
                })
            }
        };
        if !element.is_initialized() {
            return Err(RuntimeError::UseBeforeInit {
                name: format!("{}[{}]", array, i),
            });
        }
        Ok(element.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::t_int;

    #[test]
    fn test_checked_index_bounds() {
        assert_eq!(checked_index("v", &Value::Int(0), 3).unwrap(), 0);
        assert_eq!(checked_index("v", &Value::Int(2), 3).unwrap(), 2);
        assert!(matches!(
            checked_index("v", &Value::Int(3), 3),
            Err(RuntimeError::IndexOutOfRange { index: 3, len: 3, .. })
        ));
        assert!(matches!(
            checked_index("v", &Value::Int(-1), 3),
            Err(RuntimeError::IndexOutOfRange { index: -1, .. })
        ));
        assert!(matches!(
            checked_index("v", &Value::Float(1.0), 3),
            Err(RuntimeError::NonIntegerIndex { .. })
        ));
    }

    #[test]
    fn test_array_length_requires_array() {
        let scalar = Variable::new(t_int(), Some(Value::Int(1)));
        assert!(matches!(
            array_length("x", &scalar),
            Err(RuntimeError::NotAnArray { .. })
        ));

        let arr = Variable::new(
            t_int().with_array(2),
            Some(Value::Array(vec![Value::Uninitialized; 2])),
        );
        assert_eq!(array_length("a", &arr).unwrap(), 2);
    }
}
