// Snapshot of the root scope after an evaluation run

use crate::ast::Type;
use crate::memory::scope::Scope;
use crate::memory::value::Value;
use std::fmt;

/// One variable as it stood when the snapshot was taken
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSnapshot {
    pub name: String,
    pub var_type: Type,
    pub value: Value,
    pub initialized: bool,
}

/// Global variable table, in declaration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScopeSnapshot {
    pub variables: Vec<VariableSnapshot>,
}

impl ScopeSnapshot {
    pub fn capture(scope: &Scope) -> Self {
        ScopeSnapshot {
            variables: scope
                .variables()
                .map(|(name, var)| VariableSnapshot {
                    name: name.to_string(),
                    var_type: var.var_type.clone(),
                    value: var.value.clone(),
                    initialized: var.initialized,
                })
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&VariableSnapshot> {
        self.variables.iter().find(|var| var.name == name)
    }

    /// Value of `name`, if declared
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).map(|var| &var.value)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl fmt::Display for ScopeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for var in &self.variables {
            if var.initialized {
                writeln!(f, "{}: {} = {}", var.name, var.var_type, var.value)?;
            } else {
                writeln!(f, "{}: {} (uninitialized)", var.name, var.var_type)?;
            }
        }
        Ok(())
    }
}
