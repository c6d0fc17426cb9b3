use crate::ast::{CaseBlock, Expr, Stmt};
use crate::console::Console;
use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::ops::binary::values_equal;

impl<C: Console> Interpreter<C> {
    /// Execute a switch statement.
    ///
    /// Cases are tried in order and every case whose label equals the switch
    /// value runs in its own scope. There is no fallthrough into the next
    /// block: after a matching case finishes normally, later labels are still
    /// compared. `break` ends the whole switch. Default blocks run, in order,
    /// only when no label matched.
    pub(crate) fn execute_switch(
        &mut self,
        expr: &Expr,
        cases: &[CaseBlock],
        defaults: &[Vec<Stmt>],
    ) -> Result<Flow, RuntimeError> {
        let switch_val = self.evaluate_expr(expr)?;
        let mut matched = false;

        for case in cases {
            let label = self.evaluate_expr(&case.label)?;
            if !values_equal(&switch_val, &label) {
                continue;
            }
            matched = true;
            match self.execute_block(&case.statements)? {
                Flow::Normal => {}
                Flow::Break => return Ok(Flow::Normal),
                // continue/return belong to an enclosing loop or function
                flow => return Ok(flow),
            }
        }

        if !matched {
            for default in defaults {
                match self.execute_block(default)? {
                    Flow::Normal => {}
                    Flow::Break => return Ok(Flow::Normal),
                    flow => return Ok(flow),
                }
            }
        }

        Ok(Flow::Normal)
    }

    pub(crate) fn execute_return(&mut self, expr: Option<&Expr>) -> Result<Flow, RuntimeError> {
        let value = match expr {
            Some(e) => Some(self.evaluate_expr(e)?),
            None => None,
        };
        Ok(Flow::Return(value))
    }
}
