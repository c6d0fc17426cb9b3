//! Coercion and type compatibility
//!
//! Every store of a value into a typed slot (declaration initializer, plain
//! assignment, array element, aggregate field, parameter binding, return
//! value, scanf target) passes through [`coerce`]. The rules, by target type:
//!
//! | target                  | accepts                         | result            |
//! |-------------------------|---------------------------------|-------------------|
//! | `int` / integer family  | integral, floating (narrowed)   | `Int`             |
//! | `float` / `double`      | integral, floating              | `Float`           |
//! | `char`                  | single-character text           | `Char`            |
//! | `string`                | text                            | `Str`             |
//! | `struct S` / `union U`  | aggregate whose shape is `S`/`U`| unchanged         |
//! | `T[]`                   | array whose elements coerce to T| `Array`           |
//!
//! Narrowing a floating value to an integer truncates toward zero and is the
//! only conversion that produces a warning instead of an error.

use crate::ast::{BaseType, Type};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::console::Console;
use crate::memory::value::Value;

/// Outcome of a successful coercion
#[derive(Debug, Clone, PartialEq)]
pub struct Coercion {
    pub value: Value,
    /// Set when a floating value was narrowed to an integer
    pub warning: Option<String>,
}

impl Coercion {
    fn exact(value: Value) -> Self {
        Coercion {
            value,
            warning: None,
        }
    }
}

fn mismatch(target: &Type, value: &Value, context: &str) -> RuntimeError {
    RuntimeError::TypeMismatch {
        expected: target.to_string(),
        got: describe(value),
        context: context.to_string(),
    }
}

/// Human-readable value description for error messages
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Aggregate(agg) => format!("aggregate '{}'", agg.shape),
        Value::Array(_) | Value::Uninitialized | Value::Void => value.kind_name().to_string(),
        other => format!("{} {}", other.kind_name(), other),
    }
}

/// Check `value` against `target` and convert it for storage
pub fn coerce(target: &Type, value: Value, context: &str) -> Result<Coercion, RuntimeError> {
    if let Some(len) = target.array_len {
        return coerce_array(target, len, value, context);
    }

    match &target.base {
        base if base.is_integral() => match value {
            Value::Int(_) => Ok(Coercion::exact(value)),
            Value::Float(x) => {
                let narrowed = x.trunc() as i64;
                Ok(Coercion {
                    value: Value::Int(narrowed),
                    warning: Some(format!(
                        "implicit conversion from float to {} narrows {} to {} in {}",
                        target, x, narrowed, context
                    )),
                })
            }
            other => Err(mismatch(target, &other, context)),
        },
        BaseType::Float | BaseType::Double => match value {
            Value::Int(n) => Ok(Coercion::exact(Value::Float(n as f64))),
            Value::Float(_) => Ok(Coercion::exact(value)),
            other => Err(mismatch(target, &other, context)),
        },
        BaseType::Char => match value {
            Value::Char(_) => Ok(Coercion::exact(value)),
            Value::Str(ref s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Coercion::exact(Value::Char(c))),
                    _ => Err(mismatch(target, &value, context)),
                }
            }
            other => Err(mismatch(target, &other, context)),
        },
        BaseType::String => match value {
            Value::Str(_) => Ok(Coercion::exact(value)),
            Value::Char(c) => Ok(Coercion::exact(Value::Str(c.to_string()))),
            other => Err(mismatch(target, &other, context)),
        },
        BaseType::Struct(name) | BaseType::Union(name) => match value {
            Value::Aggregate(ref agg) if &agg.shape == name => Ok(Coercion::exact(value)),
            other => Err(mismatch(target, &other, context)),
        },
        // Integral variants are matched by the guard above; void never stores
        _ => Err(mismatch(target, &value, context)),
    }
}

fn coerce_array(
    target: &Type,
    len: usize,
    value: Value,
    context: &str,
) -> Result<Coercion, RuntimeError> {
    let elements = match value {
        Value::Array(elements) if elements.len() == len => elements,
        other => return Err(mismatch(target, &other, context)),
    };

    let element_type = target.element_type();
    let mut warning = None;
    let mut coerced = Vec::with_capacity(len);
    for (i, element) in elements.into_iter().enumerate() {
        if !element.is_initialized() {
            coerced.push(element);
            continue;
        }
        let result = coerce(&element_type, element, &format!("{}[{}]", context, i))?;
        warning = warning.or(result.warning);
        coerced.push(result.value);
    }
    Ok(Coercion {
        value: Value::Array(coerced),
        warning,
    })
}

/// Truthiness used by conditions and the logical operators
pub fn truthy(value: &Value, context: &str) -> Result<bool, RuntimeError> {
    match value {
        Value::Int(n) => Ok(*n != 0),
        Value::Float(x) => Ok(*x != 0.0),
        Value::Char(c) => Ok(*c != '\0'),
        Value::Str(s) => Ok(!s.is_empty()),
        other => Err(RuntimeError::TypeMismatch {
            expected: "scalar condition".to_string(),
            got: describe(other),
            context: context.to_string(),
        }),
    }
}

impl<C: Console> Interpreter<C> {
    /// Coerce and record any narrowing warning as a diagnostic
    pub(crate) fn coerce_value(
        &mut self,
        target: &Type,
        value: Value,
        context: &str,
    ) -> Result<Value, RuntimeError> {
        let Coercion { value, warning } = coerce(target, value, context)?;
        if let Some(message) = warning {
            self.warn(message);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::memory::value::Aggregate;

    #[test]
    fn test_float_to_int_truncates_with_warning() {
        let result = coerce(&t_int(), Value::Float(3.9), "x").unwrap();
        assert_eq!(result.value, Value::Int(3));
        assert!(result.warning.is_some());

        let result = coerce(&t_long(), Value::Float(-2.7), "y").unwrap();
        assert_eq!(result.value, Value::Int(-2));
    }

    #[test]
    fn test_int_to_int_is_silent() {
        let result = coerce(&t_unsigned(), Value::Int(4), "u").unwrap();
        assert_eq!(result, Coercion::exact(Value::Int(4)));
    }

    #[test]
    fn test_int_widens_to_double() {
        let result = coerce(&t_double(), Value::Int(2), "d").unwrap();
        assert_eq!(result.value, Value::Float(2.0));
    }

    #[test]
    fn test_char_accepts_single_character_only() {
        assert_eq!(
            coerce(&t_char(), Value::Str("J".into()), "c").unwrap().value,
            Value::Char('J')
        );
        let err = coerce(&t_char(), Value::Str("ab".into()), "c").unwrap_err();
        assert!(matches!(err, RuntimeError::TypeMismatch { .. }));
        assert!(coerce(&t_char(), Value::Int(65), "c").is_err());
    }

    #[test]
    fn test_string_rejects_numbers() {
        assert!(coerce(&t_string(), Value::Int(1), "s").is_err());
        assert_eq!(
            coerce(&t_string(), Value::Str("hi".into()), "s").unwrap().value,
            Value::Str("hi".into())
        );
    }

    #[test]
    fn test_aggregate_shape_must_match() {
        let point = Value::Aggregate(Aggregate {
            shape: "Point".into(),
            fields: Vec::new(),
        });
        assert!(coerce(&t_struct("Point"), point.clone(), "p").is_ok());
        assert!(coerce(&t_struct("Other"), point, "p").is_err());
        assert!(coerce(&t_struct("Point"), Value::Int(0), "p").is_err());
    }

    #[test]
    fn test_array_elements_coerced() {
        let target = t_double().with_array(2);
        let result = coerce(&target, Value::Array(vec![Value::Int(1), Value::Uninitialized]), "a")
            .unwrap();
        assert_eq!(
            result.value,
            Value::Array(vec![Value::Float(1.0), Value::Uninitialized])
        );
        assert!(coerce(&target, Value::Array(vec![Value::Int(1)]), "a").is_err());
    }

    #[test]
    fn test_truthiness() {
        assert!(truthy(&Value::Int(2), "if").unwrap());
        assert!(!truthy(&Value::Float(0.0), "if").unwrap());
        assert!(!truthy(&Value::Str(String::new()), "if").unwrap());
        assert!(truthy(&Value::Void, "if").is_err());
    }
}
