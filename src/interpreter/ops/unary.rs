use crate::ast::{Expr, UnOp};
use crate::console::Console;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::type_system::{describe, truthy};
use crate::memory::value::Value;

/// Apply a unary operator to an evaluated operand
pub fn apply_unary(op: UnOp, operand: &Value) -> Result<Value, RuntimeError> {
    match op {
        UnOp::Neg => match operand {
            Value::Int(n) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::IntegerOverflow {
                    operation: format!("-({})", n),
                }),
            Value::Float(x) => Ok(Value::Float(-x)),
            Value::Char(c) => Ok(Value::Int(-(*c as i64))),
            other => Err(RuntimeError::TypeMismatch {
                expected: "numeric operand".to_string(),
                got: describe(other),
                context: "unary '-'".to_string(),
            }),
        },
        UnOp::Not => Ok(Value::Int(!truthy(operand, "unary '!'")? as i64)),
    }
}

impl<C: Console> Interpreter<C> {
    pub(crate) fn evaluate_unary_op(&mut self, op: UnOp, operand: &Expr) -> Result<Value, RuntimeError> {
        let value = self.evaluate_expr(operand)?;
        apply_unary(op, &value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negation() {
        assert_eq!(apply_unary(UnOp::Neg, &Value::Int(5)).unwrap(), Value::Int(-5));
        assert_eq!(apply_unary(UnOp::Neg, &Value::Float(1.5)).unwrap(), Value::Float(-1.5));
        assert!(apply_unary(UnOp::Neg, &Value::Int(i64::MIN)).is_err());
        assert!(apply_unary(UnOp::Neg, &Value::Str("s".into())).is_err());
    }

    #[test]
    fn test_logical_not() {
        assert_eq!(apply_unary(UnOp::Not, &Value::Int(0)).unwrap(), Value::Int(1));
        assert_eq!(apply_unary(UnOp::Not, &Value::Str("x".into())).unwrap(), Value::Int(0));
    }
}
