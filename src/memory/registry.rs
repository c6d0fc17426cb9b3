//! Program-wide definitions: shapes, functions and macros.
//!
//! Everything here is registered once and never shadowed per block. A
//! registry belongs to one interpreter instance.

use super::value::{Aggregate, FieldSlot, Value};
use crate::ast::{BaseType, Field, FunctionDef, Type};
use crate::interpreter::errors::RuntimeError;
use rustc_hash::FxHashMap;
use std::fmt;
use std::rc::Rc;

/// Whether a shape was declared with `struct` or `union`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Struct,
    Union,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Struct => write!(f, "struct"),
            ShapeKind::Union => write!(f, "union"),
        }
    }
}

/// A registered struct or union layout
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDef {
    pub name: String,
    pub kind: ShapeKind,
    pub fields: Vec<Field>,
}

/// Registered shapes, functions, macros and recorded includes
#[derive(Debug, Default)]
pub struct Registry {
    shapes: FxHashMap<String, ShapeDef>,
    functions: FxHashMap<String, Rc<FunctionDef>>,
    macros: FxHashMap<String, Option<Value>>,
    includes: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a struct or union layout.
    ///
    /// Field names must be unique within the shape and the shape name must be
    /// new (structs and unions share one tag namespace). A struct or union
    /// field must name an already registered shape, so a shape can never
    /// contain itself by value.
    pub fn register_shape(
        &mut self,
        name: &str,
        kind: ShapeKind,
        fields: &[Field],
    ) -> Result<(), RuntimeError> {
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|earlier| earlier.name == field.name) {
                return Err(RuntimeError::DuplicateField {
                    shape: name.to_string(),
                    field: field.name.clone(),
                });
            }
        }
        if self.shapes.contains_key(name) {
            return Err(RuntimeError::DuplicateDefinition {
                kind: kind.to_string(),
                name: name.to_string(),
            });
        }
        for field in fields {
            if matches!(field.field_type.base, BaseType::Struct(_) | BaseType::Union(_)) {
                self.shape_for(&field.field_type.base)?;
            }
        }
        self.shapes.insert(
            name.to_string(),
            ShapeDef {
                name: name.to_string(),
                kind,
                fields: fields.to_vec(),
            },
        );
        Ok(())
    }

    pub fn shape(&self, name: &str) -> Option<&ShapeDef> {
        self.shapes.get(name)
    }

    /// Resolve `struct name` / `union name` to its registered layout
    pub fn shape_for(&self, base: &BaseType) -> Result<&ShapeDef, RuntimeError> {
        let (name, kind) = match base {
            BaseType::Struct(name) => (name, ShapeKind::Struct),
            BaseType::Union(name) => (name, ShapeKind::Union),
            other => {
                return Err(RuntimeError::UnknownShape {
                    name: other.to_string(),
                })
            }
        };
        self.shapes
            .get(name)
            .filter(|shape| shape.kind == kind)
            .ok_or_else(|| RuntimeError::UnknownShape {
                name: base.to_string(),
            })
    }

    /// Build a fresh instance of a shape.
    ///
    /// Scalar fields start uninitialized; nested struct/union fields are
    /// materialized recursively and array fields get uninitialized elements.
    pub fn instantiate(&self, base: &BaseType) -> Result<Aggregate, RuntimeError> {
        let shape = self.shape_for(base)?;
        let mut fields = Vec::with_capacity(shape.fields.len());
        for field in &shape.fields {
            fields.push(FieldSlot {
                name: field.name.clone(),
                field_type: field.field_type.clone(),
                value: self.default_value(&field.field_type)?,
            });
        }
        Ok(Aggregate {
            shape: shape.name.clone(),
            fields,
        })
    }

    fn default_value(&self, field_type: &Type) -> Result<Value, RuntimeError> {
        if let Some(len) = field_type.array_len {
            return Ok(Value::Array(vec![Value::Uninitialized; len]));
        }
        match &field_type.base {
            BaseType::Struct(_) | BaseType::Union(_) => {
                Ok(Value::Aggregate(self.instantiate(&field_type.base)?))
            }
            _ => Ok(Value::Uninitialized),
        }
    }

    pub fn register_function(&mut self, def: FunctionDef) -> Result<(), RuntimeError> {
        if self.functions.contains_key(&def.name) {
            return Err(RuntimeError::DuplicateDefinition {
                kind: "function".to_string(),
                name: def.name,
            });
        }
        self.functions.insert(def.name.clone(), Rc::new(def));
        Ok(())
    }

    pub fn function(&self, name: &str) -> Option<Rc<FunctionDef>> {
        self.functions.get(name).cloned()
    }

    pub fn register_macro(&mut self, name: &str, value: Option<Value>) -> Result<(), RuntimeError> {
        if self.macros.contains_key(name) {
            return Err(RuntimeError::DuplicateDefinition {
                kind: "macro".to_string(),
                name: name.to_string(),
            });
        }
        self.macros.insert(name.to_string(), value);
        Ok(())
    }

    /// Value bound by `#define`; `Some(None)` for a valueless define
    pub fn macro_value(&self, name: &str) -> Option<Option<&Value>> {
        self.macros.get(name).map(Option::as_ref)
    }

    pub fn macros(&self) -> &FxHashMap<String, Option<Value>> {
        &self.macros
    }

    pub fn record_include(&mut self, target: &str) {
        self.includes.push(target.to_string());
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::{t_char, t_int, t_struct};

    fn field(name: &str, field_type: Type) -> Field {
        Field {
            name: name.to_string(),
            field_type,
        }
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let mut registry = Registry::new();
        let err = registry
            .register_shape(
                "Point",
                ShapeKind::Struct,
                &[field("x", t_int()), field("x", t_int())],
            )
            .unwrap_err();
        assert_eq!(
            err,
            RuntimeError::DuplicateField {
                shape: "Point".into(),
                field: "x".into()
            }
        );
    }

    #[test]
    fn test_duplicate_shape_rejected_across_kinds() {
        let mut registry = Registry::new();
        registry
            .register_shape("Data", ShapeKind::Struct, &[field("i", t_int())])
            .unwrap();
        let err = registry
            .register_shape("Data", ShapeKind::Union, &[field("i", t_int())])
            .unwrap_err();
        assert!(matches!(err, RuntimeError::DuplicateDefinition { .. }));
    }

    #[test]
    fn test_instantiate_nested() {
        let mut registry = Registry::new();
        registry
            .register_shape("Inner", ShapeKind::Struct, &[field("c", t_char())])
            .unwrap();
        registry
            .register_shape(
                "Outer",
                ShapeKind::Struct,
                &[field("n", t_int()), field("inner", t_struct("Inner"))],
            )
            .unwrap();

        let outer = registry
            .instantiate(&BaseType::Struct("Outer".into()))
            .unwrap();
        assert_eq!(outer.field("n").unwrap().value, Value::Uninitialized);
        let inner = outer.field("inner").unwrap().value.as_aggregate().unwrap();
        assert_eq!(inner.shape, "Inner");
        assert_eq!(inner.field("c").unwrap().value, Value::Uninitialized);
    }

    #[test]
    fn test_self_containing_shape_rejected() {
        let mut registry = Registry::new();
        let err = registry
            .register_shape("Node", ShapeKind::Struct, &[field("next", t_struct("Node"))])
            .unwrap_err();
        assert_eq!(err, RuntimeError::UnknownShape { name: "struct Node".into() });
        assert!(registry.shape("Node").is_none());

        // arrays of an incomplete shape are rejected the same way
        let items = field("items", t_struct("Later").with_array(2));
        assert!(registry
            .register_shape("Holder", ShapeKind::Struct, &[items])
            .is_err());
    }

    #[test]
    fn test_unknown_or_mismatched_shape() {
        let mut registry = Registry::new();
        registry
            .register_shape("Data", ShapeKind::Union, &[field("i", t_int())])
            .unwrap();
        assert!(registry.shape_for(&BaseType::Union("Data".into())).is_ok());
        let err = registry
            .shape_for(&BaseType::Struct("Data".into()))
            .unwrap_err();
        assert_eq!(err, RuntimeError::UnknownShape { name: "struct Data".into() });
    }

    #[test]
    fn test_macro_is_write_once() {
        let mut registry = Registry::new();
        registry.register_macro("N", Some(Value::Int(5))).unwrap();
        registry.register_macro("FLAG", None).unwrap();
        assert!(registry.register_macro("N", None).is_err());
        assert_eq!(registry.macro_value("N"), Some(Some(&Value::Int(5))));
        assert_eq!(registry.macro_value("FLAG"), Some(None));
        assert_eq!(registry.macro_value("OTHER"), None);
    }
}
