use crate::ast::{BinOp, Expr};
use crate::console::Console;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::type_system::{describe, truthy};
use crate::memory::value::Value;
use std::cmp::Ordering;

/// Numeric operands after promotion
enum Operands {
    Ints(i64, i64),
    Floats(f64, f64),
}

/// Chars take part in arithmetic as their code point
#[inline]
fn numeric(value: &Value) -> Option<Value> {
    match value {
        Value::Int(_) | Value::Float(_) => Some(value.clone()),
        Value::Char(c) => Some(Value::Int(*c as i64)),
        _ => None,
    }
}

fn promote(op: BinOp, left: &Value, right: &Value) -> Result<Operands, RuntimeError> {
    let mismatch = |got: &Value| RuntimeError::TypeMismatch {
        expected: "numeric operand".to_string(),
        got: describe(got),
        context: format!("operator '{}'", op),
    };
    let l = numeric(left).ok_or_else(|| mismatch(left))?;
    let r = numeric(right).ok_or_else(|| mismatch(right))?;

    Ok(match (l, r) {
        (Value::Int(a), Value::Int(b)) => Operands::Ints(a, b),
        (Value::Int(a), Value::Float(b)) => Operands::Floats(a as f64, b),
        (Value::Float(a), Value::Int(b)) => Operands::Floats(a, b as f64),
        (Value::Float(a), Value::Float(b)) => Operands::Floats(a, b),
        (l, _) => return Err(mismatch(&l)),
    })
}

#[inline]
fn checked_int(op: BinOp, a: i64, b: i64) -> Result<i64, RuntimeError> {
    let operation = format!("{} {} {}", a, op, b);
    if matches!(op, BinOp::Div | BinOp::Mod) && b == 0 {
        return Err(RuntimeError::DivisionByZero { operation });
    }
    let result = match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Sub => a.checked_sub(b),
        BinOp::Mul => a.checked_mul(b),
        // Truncates toward zero
        BinOp::Div => a.checked_div(b),
        BinOp::Mod => a.checked_rem(b),
        _ => None,
    };
    result.ok_or(RuntimeError::IntegerOverflow { operation })
}

#[inline]
fn float_op(op: BinOp, a: f64, b: f64) -> Result<f64, RuntimeError> {
    if matches!(op, BinOp::Div | BinOp::Mod) && b == 0.0 {
        return Err(RuntimeError::DivisionByZero {
            operation: format!("{:?} {} {:?}", a, op, b),
        });
    }
    Ok(match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => a / b,
        _ => a % b,
    })
}

/// Equality across kinds; incompatible kinds are simply unequal
pub(crate) fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Char(c), Value::Str(s)) | (Value::Str(s), Value::Char(c)) => {
            let mut chars = s.chars();
            chars.next() == Some(*c) && chars.next().is_none()
        }
        (Value::Aggregate(a), Value::Aggregate(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => a == b,
        _ => match (numeric(left), numeric(right)) {
            (Some(Value::Int(a)), Some(Value::Int(b))) => a == b,
            (Some(l), Some(r)) => l.as_float() == r.as_float(),
            _ => false,
        },
    }
}

fn compare(op: BinOp, left: &Value, right: &Value) -> Result<Option<Ordering>, RuntimeError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
        (Value::Char(a), Value::Char(b)) => Ok(Some(a.cmp(b))),
        _ => match promote(op, left, right)? {
            Operands::Ints(a, b) => Ok(Some(a.cmp(&b))),
            Operands::Floats(a, b) => Ok(a.partial_cmp(&b)),
        },
    }
}

/// Apply a binary operator to two evaluated operands.
///
/// Comparisons and logical operators yield `Int(1)` or `Int(0)`.
pub fn apply_binary(op: BinOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let flag = |b: bool| Value::Int(b as i64);

    match op {
        BinOp::And | BinOp::Or => {
            let context = format!("operator '{}'", op);
            let l = truthy(left, &context)?;
            let r = truthy(right, &context)?;
            Ok(flag(if op == BinOp::And { l && r } else { l || r }))
        }

        BinOp::Eq => Ok(flag(values_equal(left, right))),
        BinOp::Ne => Ok(flag(!values_equal(left, right))),

        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
            let ordering = compare(op, left, right)?;
            let holds = match ordering {
                // NaN compares false
                None => false,
                Some(ord) => match op {
                    BinOp::Lt => ord == Ordering::Less,
                    BinOp::Le => ord != Ordering::Greater,
                    BinOp::Gt => ord == Ordering::Greater,
                    _ => ord != Ordering::Less,
                },
            };
            Ok(flag(holds))
        }

        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
            match promote(op, left, right)? {
                Operands::Ints(a, b) => checked_int(op, a, b).map(Value::Int),
                Operands::Floats(a, b) => float_op(op, a, b).map(Value::Float),
            }
        }
    }
}

impl<C: Console> Interpreter<C> {
    /// Evaluate both operands left to right, then apply `op`
    pub(crate) fn evaluate_binary_op(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
    ) -> Result<Value, RuntimeError> {
        let l = self.evaluate_expr(left)?;
        let r = self.evaluate_expr(right)?;
        apply_binary(op, &l, &r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_arithmetic() {
        assert_eq!(apply_binary(BinOp::Add, &Value::Int(2), &Value::Int(3)).unwrap(), Value::Int(5));
        assert_eq!(apply_binary(BinOp::Div, &Value::Int(7), &Value::Int(2)).unwrap(), Value::Int(3));
        assert_eq!(apply_binary(BinOp::Div, &Value::Int(-7), &Value::Int(2)).unwrap(), Value::Int(-3));
        assert_eq!(apply_binary(BinOp::Mod, &Value::Int(7), &Value::Int(3)).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_mixed_arithmetic_promotes_to_float() {
        assert_eq!(
            apply_binary(BinOp::Mul, &Value::Int(2), &Value::Float(1.5)).unwrap(),
            Value::Float(3.0)
        );
        assert_eq!(
            apply_binary(BinOp::Add, &Value::Char('a'), &Value::Int(1)).unwrap(),
            Value::Int(98)
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(
            apply_binary(BinOp::Div, &Value::Int(1), &Value::Int(0)),
            Err(RuntimeError::DivisionByZero { .. })
        ));
        assert!(matches!(
            apply_binary(BinOp::Mod, &Value::Float(1.0), &Value::Float(0.0)),
            Err(RuntimeError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_overflow_detected() {
        assert!(matches!(
            apply_binary(BinOp::Add, &Value::Int(i64::MAX), &Value::Int(1)),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
        assert!(matches!(
            apply_binary(BinOp::Div, &Value::Int(i64::MIN), &Value::Int(-1)),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn test_comparisons_yield_flags() {
        assert_eq!(apply_binary(BinOp::Lt, &Value::Int(1), &Value::Float(1.5)).unwrap(), Value::Int(1));
        assert_eq!(apply_binary(BinOp::Ge, &Value::Int(1), &Value::Int(2)).unwrap(), Value::Int(0));
        assert_eq!(
            apply_binary(BinOp::Lt, &Value::Str("abc".into()), &Value::Str("abd".into())).unwrap(),
            Value::Int(1)
        );
        assert!(apply_binary(BinOp::Lt, &Value::Str("a".into()), &Value::Int(1)).is_err());
    }

    #[test]
    fn test_equality_across_kinds() {
        assert!(values_equal(&Value::Int(2), &Value::Float(2.0)));
        assert!(values_equal(&Value::Char('a'), &Value::Str("a".into())));
        assert!(values_equal(&Value::Char('A'), &Value::Int(65)));
        assert!(!values_equal(&Value::Str("1".into()), &Value::Int(1)));
        assert_eq!(
            apply_binary(BinOp::Ne, &Value::Str("x".into()), &Value::Int(0)).unwrap(),
            Value::Int(1)
        );
    }

    #[test]
    fn test_logical_operators() {
        assert_eq!(apply_binary(BinOp::And, &Value::Int(1), &Value::Int(0)).unwrap(), Value::Int(0));
        assert_eq!(apply_binary(BinOp::Or, &Value::Int(0), &Value::Float(0.5)).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_string_arithmetic_rejected() {
        assert!(matches!(
            apply_binary(BinOp::Add, &Value::Str("a".into()), &Value::Str("b".into())),
            Err(RuntimeError::TypeMismatch { .. })
        ));
    }
}
