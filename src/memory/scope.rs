//! Scope arena
//!
//! This module provides scoped variable storage:
//! - [`ScopeArena`]: every live scope frame, addressed by [`ScopeId`]
//! - [`Scope`]: one block's or call's namespace with a link to its parent
//! - [`Variable`]: a declared variable with type and initialization state
//!
//! # Lifetime
//!
//! Frames are pushed on function entry (parent = root) and block entry
//! (parent = the enclosing frame) and popped when that call or block exits.
//! Execution is depth-first, so frames are always released in LIFO order.
//! The root frame at [`ScopeId::ROOT`] lives for the whole run.

use super::value::Value;
use crate::ast::Type;
use crate::interpreter::errors::RuntimeError;
use rustc_hash::FxHashMap;

/// Index of a frame in the [`ScopeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// A declared variable
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub var_type: Type,
    pub value: Value,
    pub initialized: bool,
}

impl Variable {
    pub fn new(var_type: Type, value: Option<Value>) -> Self {
        match value {
            Some(value) => Variable {
                var_type,
                value,
                initialized: true,
            },
            None => Variable {
                var_type,
                value: Value::Uninitialized,
                initialized: false,
            },
        }
    }
}

/// One frame of the scope chain
#[derive(Debug, Clone, Default)]
pub struct Scope {
    vars: FxHashMap<String, Variable>,
    insertion_order: Vec<String>, // Track order of variable declarations
    parent: Option<ScopeId>,
}

impl Scope {
    fn with_parent(parent: Option<ScopeId>) -> Self {
        Scope {
            parent,
            ..Scope::default()
        }
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    /// Variables in declaration order
    pub fn variables(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.insertion_order
            .iter()
            .filter_map(|name| self.vars.get(name).map(|var| (name.as_str(), var)))
    }
}

/// Arena of scope frames
#[derive(Debug, Clone)]
pub struct ScopeArena {
    frames: Vec<Scope>,
}

impl ScopeArena {
    /// Create an arena holding only the root frame
    pub fn new() -> Self {
        ScopeArena {
            frames: vec![Scope::with_parent(None)],
        }
    }

    /// Push a new frame whose lookups fall back to `parent`
    pub fn push(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.frames.len());
        self.frames.push(Scope::with_parent(Some(parent)));
        id
    }

    /// Release a frame; it must be the most recently pushed one
    pub fn pop(&mut self, id: ScopeId) {
        debug_assert_eq!(id.0 + 1, self.frames.len(), "scope frames released out of order");
        if id != ScopeId::ROOT && id.0 < self.frames.len() {
            self.frames.truncate(id.0);
        }
    }

    /// Drop every frame but the root
    pub fn reset_to_root(&mut self) {
        self.frames.truncate(1);
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.frames.get(id.0)
    }

    pub fn root(&self) -> &Scope {
        &self.frames[0]
    }

    /// Number of live frames, root included
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Declare `name` in frame `scope`.
    ///
    /// Fails when the same frame already declares it; ancestors may.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        var_type: Type,
        value: Option<Value>,
    ) -> Result<(), RuntimeError> {
        let frame = &mut self.frames[scope.0];
        if frame.vars.contains_key(name) {
            return Err(RuntimeError::DuplicateDeclaration {
                name: name.to_string(),
            });
        }
        frame.vars.insert(name.to_string(), Variable::new(var_type, value));
        frame.insertion_order.push(name.to_string());
        Ok(())
    }

    /// Find the frame that owns `name`, walking outward from `scope`
    fn resolve(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let frame = self.frames.get(id.0)?;
            if frame.vars.contains_key(name) {
                return Some(id);
            }
            current = frame.parent;
        }
        None
    }

    /// Look `name` up from `scope` outward
    pub fn lookup(
        &self,
        scope: ScopeId,
        name: &str,
        require_initialized: bool,
    ) -> Result<&Variable, RuntimeError> {
        let owner = self
            .resolve(scope, name)
            .ok_or_else(|| RuntimeError::UndeclaredVariable {
                name: name.to_string(),
            })?;
        let var = &self.frames[owner.0].vars[name];
        if require_initialized && !var.initialized {
            return Err(RuntimeError::UseBeforeInit {
                name: name.to_string(),
            });
        }
        Ok(var)
    }

    /// Mutable access for in-place element and field stores.
    ///
    /// Marks the variable initialized, since every caller writes through it.
    pub fn lookup_mut(&mut self, scope: ScopeId, name: &str) -> Result<&mut Variable, RuntimeError> {
        let owner = self
            .resolve(scope, name)
            .ok_or_else(|| RuntimeError::UndeclaredVariable {
                name: name.to_string(),
            })?;
        let var = self.frames[owner.0]
            .vars
            .get_mut(name)
            .ok_or_else(|| RuntimeError::UndeclaredVariable {
                name: name.to_string(),
            })?;
        var.initialized = true;
        Ok(var)
    }

    /// Overwrite the value of `name` in its owning frame
    pub fn assign(&mut self, scope: ScopeId, name: &str, value: Value) -> Result<(), RuntimeError> {
        let var = self.lookup_mut(scope, name)?;
        var.value = value;
        Ok(())
    }
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::{t_float, t_int};

    #[test]
    fn test_declare_lookup_assign() {
        let mut scopes = ScopeArena::new();
        scopes.declare(ScopeId::ROOT, "x", t_int(), None).unwrap();

        let err = scopes.lookup(ScopeId::ROOT, "x", true).unwrap_err();
        assert_eq!(err, RuntimeError::UseBeforeInit { name: "x".into() });

        // Writes are allowed before initialization
        assert!(scopes.lookup(ScopeId::ROOT, "x", false).is_ok());
        scopes.assign(ScopeId::ROOT, "x", Value::Int(7)).unwrap();

        let var = scopes.lookup(ScopeId::ROOT, "x", true).unwrap();
        assert!(var.initialized);
        assert_eq!(var.value, Value::Int(7));
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let mut scopes = ScopeArena::new();
        scopes.declare(ScopeId::ROOT, "x", t_int(), None).unwrap();
        let err = scopes.declare(ScopeId::ROOT, "x", t_float(), None).unwrap_err();
        assert_eq!(err, RuntimeError::DuplicateDeclaration { name: "x".into() });
    }

    #[test]
    fn test_nested_scope_shadows_and_releases() {
        let mut scopes = ScopeArena::new();
        scopes
            .declare(ScopeId::ROOT, "x", t_int(), Some(Value::Int(1)))
            .unwrap();

        let inner = scopes.push(ScopeId::ROOT);
        scopes
            .declare(inner, "x", t_int(), Some(Value::Int(2)))
            .unwrap();
        assert_eq!(scopes.lookup(inner, "x", true).unwrap().value, Value::Int(2));

        scopes.pop(inner);
        assert_eq!(scopes.depth(), 1);
        assert_eq!(
            scopes.lookup(ScopeId::ROOT, "x", true).unwrap().value,
            Value::Int(1)
        );
    }

    #[test]
    fn test_assign_walks_to_owner() {
        let mut scopes = ScopeArena::new();
        scopes.declare(ScopeId::ROOT, "total", t_int(), None).unwrap();
        let inner = scopes.push(ScopeId::ROOT);
        scopes.assign(inner, "total", Value::Int(5)).unwrap();
        scopes.pop(inner);
        assert_eq!(
            scopes.lookup(ScopeId::ROOT, "total", true).unwrap().value,
            Value::Int(5)
        );

        let err = scopes.assign(ScopeId::ROOT, "missing", Value::Int(1)).unwrap_err();
        assert_eq!(err, RuntimeError::UndeclaredVariable { name: "missing".into() });
    }

    #[test]
    fn test_variables_keep_declaration_order() {
        let mut scopes = ScopeArena::new();
        for name in ["b", "a", "c"] {
            scopes.declare(ScopeId::ROOT, name, t_int(), None).unwrap();
        }
        let names: Vec<&str> = scopes.root().variables().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }
}
