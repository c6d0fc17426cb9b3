//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents all possible runtime values
//! in the evaluator. Values are tagged; every consumer matches on the tag.
//!
//! # Value Types
//!
//! - [`Value::Int`]: integral value (all integer types share one 64-bit representation)
//! - [`Value::Float`]: floating value (`float` and `double`)
//! - [`Value::Char`]: single character
//! - [`Value::Str`]: text
//! - [`Value::Array`]: fixed-length sequence of values
//! - [`Value::Aggregate`]: struct or union instance
//! - [`Value::Uninitialized`]: marker for a slot that was never written
//! - [`Value::Void`]: the absent result of a void call or an unmodeled expression
//!
//! # Initialization Tracking
//!
//! The `Uninitialized` variant fills array elements and aggregate fields until
//! their first store, so reads of those slots can be rejected.

use crate::ast::Type;
use std::fmt;

/// Runtime values in the evaluator
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Int(i64),
    Float(f64),
    Char(char),
    Str(String),
    Array(Vec<Value>),
    Aggregate(Aggregate),
    #[default]
    Uninitialized, // Special marker for never-written slots
    Void,
}

/// One named, typed slot of an aggregate
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSlot {
    pub name: String,
    pub field_type: Type,
    pub value: Value,
}

/// A struct or union instance.
///
/// Fields keep declaration order. Unions use the same representation; writing
/// one member does not invalidate its siblings.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub shape: String,
    pub fields: Vec<FieldSlot>,
}

impl Aggregate {
    pub fn field(&self, name: &str) -> Option<&FieldSlot> {
        self.fields.iter().find(|slot| slot.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldSlot> {
        self.fields.iter_mut().find(|slot| slot.name == name)
    }
}

impl Value {
    /// Check if this value is initialized
    pub fn is_initialized(&self) -> bool {
        !matches!(self, Value::Uninitialized)
    }

    /// Get the integer value, returns None if not an Int
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the floating value, returns None if not a Float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Borrow the text of a `Str` or the single character of a `Char`
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s.clone()),
            Value::Char(c) => Some(c.to_string()),
            _ => None,
        }
    }

    pub fn as_aggregate(&self) -> Option<&Aggregate> {
        match self {
            Value::Aggregate(agg) => Some(agg),
            _ => None,
        }
    }

    /// Short name of the value's tag, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Aggregate(_) => "aggregate",
            Value::Uninitialized => "uninitialized",
            Value::Void => "void",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Char(c) => write!(f, "'{}'", c),
            Value::Str(s) => write!(f, "\"{}\"", s.escape_default()),
            Value::Array(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Value::Aggregate(agg) => {
                write!(f, "{} {{", agg.shape)?;
                for (i, slot) in agg.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}: {}", slot.name, slot.value)?;
                }
                write!(f, " }}")
            }
            Value::Uninitialized => write!(f, "<uninitialized>"),
            Value::Void => write!(f, "<void>"),
        }
    }
}
