use crate::ast::{BaseType, Directive, Expr, Field, Stmt, Type};
use crate::console::Console;
use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::type_system::truthy;
use crate::memory::registry::ShapeKind;
use crate::memory::value::Value;

impl<C: Console> Interpreter<C> {
    /// `#include` is recorded; `#define` registers a macro with its
    /// optionally evaluated value.
    pub(crate) fn execute_directive(&mut self, directive: &Directive) -> Result<(), RuntimeError> {
        match directive {
            Directive::Include(target) => {
                let target = target.trim_matches(|c| matches!(c, '<' | '>' | '"'));
                tracing::info!(file = target, "include recorded");
                self.registry.record_include(target);
                Ok(())
            }
            Directive::Define { name, value } => {
                let value = match value {
                    Some(expr) => Some(self.evaluate_expr(expr)?),
                    None => None,
                };
                match &value {
                    Some(v) => tracing::info!(name = %name, value = %v, "macro defined"),
                    None => tracing::info!(name = %name, "macro defined"),
                }
                self.registry.register_macro(name, value)
            }
        }
    }

    pub(crate) fn execute_shape_def(
        &mut self,
        name: &str,
        kind: ShapeKind,
        fields: &[Field],
    ) -> Result<(), RuntimeError> {
        self.registry.register_shape(name, kind, fields)?;
        tracing::debug!(shape = name, kind = %kind, fields = fields.len(), "shape registered");
        Ok(())
    }

    /// Declare a variable in the current scope.
    ///
    /// Arrays are materialized up front (an initializer fills every element);
    /// struct/union variables without an initializer get a fresh instance.
    pub(crate) fn execute_var_decl(
        &mut self,
        name: &str,
        var_type: &Type,
        init: Option<&Expr>,
    ) -> Result<(), RuntimeError> {
        if var_type.base == BaseType::Void {
            return Err(RuntimeError::TypeMismatch {
                expected: "object type".to_string(),
                got: "void".to_string(),
                context: format!("declaration of '{}'", name),
            });
        }
        let is_shape = matches!(var_type.base, BaseType::Struct(_) | BaseType::Union(_));
        if is_shape {
            self.registry.shape_for(&var_type.base)?;
        }

        let initial = match init {
            Some(expr) => Some(self.evaluate_expr(expr)?),
            None => None,
        };

        let value = if let Some(len) = var_type.array_len {
            let element_type = var_type.element_type();
            let element = match initial {
                Some(whole @ Value::Array(_)) => {
                    let copied = self.coerce_value(var_type, whole, name)?;
                    let scope = self.current_scope;
                    return self.scopes.declare(scope, name, var_type.clone(), Some(copied));
                }
                Some(v) => self.coerce_value(&element_type, v, &format!("{}[]", name))?,
                None if is_shape => Value::Aggregate(self.registry.instantiate(&element_type.base)?),
                None => Value::Uninitialized,
            };
            Some(Value::Array(vec![element; len]))
        } else {
            match initial {
                Some(v) => Some(self.coerce_value(var_type, v, name)?),
                None if is_shape => Some(Value::Aggregate(self.registry.instantiate(&var_type.base)?)),
                None => None,
            }
        };

        match &value {
            Some(v) => tracing::debug!(variable = name, var_type = %var_type, value = %v, "declared"),
            None => tracing::debug!(variable = name, var_type = %var_type, "declared uninitialized"),
        }
        let scope = self.current_scope;
        self.scopes.declare(scope, name, var_type.clone(), value)
    }

    pub(crate) fn execute_if(
        &mut self,
        condition: &Expr,
        then_branch: &Stmt,
        else_branch: Option<&Stmt>,
    ) -> Result<Flow, RuntimeError> {
        let cond = self.evaluate_expr(condition)?;
        if truthy(&cond, "if condition")? {
            self.execute_statement(then_branch)
        } else if let Some(else_stmt) = else_branch {
            self.execute_statement(else_stmt)
        } else {
            Ok(Flow::Normal)
        }
    }
}
