use crate::ast::{Expr, Stmt};
use crate::console::Console;
use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::type_system::truthy;

/// Result of executing a loop body
pub(crate) enum LoopBodyResult {
    /// Go on to the next iteration
    Continue,
    /// Leave the loop
    Break,
    /// A `return` is unwinding through the loop
    Exit(Flow),
}

impl<C: Console> Interpreter<C> {
    fn execute_loop_body(&mut self, body: &Stmt) -> Result<LoopBodyResult, RuntimeError> {
        match self.execute_statement(body)? {
            Flow::Normal | Flow::Continue => Ok(LoopBodyResult::Continue),
            Flow::Break => Ok(LoopBodyResult::Break),
            flow @ Flow::Return(_) => Ok(LoopBodyResult::Exit(flow)),
        }
    }

    fn loop_condition(&mut self, condition: &Expr, context: &str) -> Result<bool, RuntimeError> {
        let value = self.evaluate_expr(condition)?;
        truthy(&value, context)
    }

    pub(crate) fn execute_while(&mut self, condition: &Expr, body: &Stmt) -> Result<Flow, RuntimeError> {
        while self.loop_condition(condition, "while condition")? {
            match self.execute_loop_body(body)? {
                LoopBodyResult::Continue => continue,
                LoopBodyResult::Break => break,
                LoopBodyResult::Exit(flow) => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    /// Body first, then the condition; `continue` jumps to the condition
    pub(crate) fn execute_do_while(&mut self, body: &Stmt, condition: &Expr) -> Result<Flow, RuntimeError> {
        loop {
            match self.execute_loop_body(body)? {
                LoopBodyResult::Continue => {}
                LoopBodyResult::Break => break,
                LoopBodyResult::Exit(flow) => return Ok(flow),
            }
            if !self.loop_condition(condition, "do-while condition")? {
                break;
            }
        }
        Ok(Flow::Normal)
    }

    /// `for (init; condition; step) body`.
    ///
    /// The initializer's declarations live in a scope wrapping the whole loop.
    /// A missing condition loops until `break` or `return`.
    pub(crate) fn execute_for(
        &mut self,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        step: Option<&Stmt>,
        body: &Stmt,
    ) -> Result<Flow, RuntimeError> {
        let parent = self.current_scope;
        self.with_scope(parent, |this| {
            if let Some(init_stmt) = init {
                this.execute_statement(init_stmt)?;
            }

            loop {
                if let Some(cond) = condition {
                    if !this.loop_condition(cond, "for condition")? {
                        break;
                    }
                }

                match this.execute_loop_body(body)? {
                    LoopBodyResult::Continue => {}
                    LoopBodyResult::Break => break,
                    LoopBodyResult::Exit(flow) => return Ok(flow),
                }

                if let Some(step_stmt) = step {
                    this.execute_statement(step_stmt)?;
                }
            }
            Ok(Flow::Normal)
        })
    }
}
