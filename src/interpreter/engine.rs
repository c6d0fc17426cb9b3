// Execution engine for the evaluator

use crate::ast::{BaseType, Program, SourceLocation, Stmt, StmtKind};
use crate::console::{Console, StreamConsole};
use crate::interpreter::config::Config;
use crate::interpreter::errors::{FatalError, RuntimeError};
use crate::memory::registry::{Registry, ShapeKind};
use crate::memory::scope::{ScopeArena, ScopeId};
use crate::memory::value::Value;
use crate::snapshot::ScopeSnapshot;
use std::io::{BufReader, Stdin, Stdout};

/// How a statement finished.
///
/// `Break` and `Continue` are consumed by the nearest loop (`Break` also by
/// a switch); `Return` is consumed by the function invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Break,
    Continue,
    Return(Option<Value>),
}

/// A non-fatal warning raised during evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    pub location: SourceLocation,
}

/// Result of [`Interpreter::run`]
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Value returned by the entry point (`None` for void or a bare `return`)
    pub exit_value: Option<Value>,
    /// Global variables after the entry point returned
    pub snapshot: ScopeSnapshot,
}

/// The evaluator: scope chain, registries and console for one program
pub struct Interpreter<C: Console> {
    pub(crate) config: Config,

    /// Where printf/puts write and scanf/gets read
    pub(crate) console: C,

    /// Every live scope frame; the root holds globals
    pub(crate) scopes: ScopeArena,

    /// Shapes, functions, macros and includes
    pub(crate) registry: Registry,

    /// Innermost frame of the executing block
    pub(crate) current_scope: ScopeId,

    /// Location of the statement being executed
    pub(crate) current_location: SourceLocation,

    /// Narrowing warnings collected so far, at most `config.diagnostic_limit`
    diagnostics: Vec<Diagnostic>,

    /// Warnings logged after the limit was reached
    suppressed_diagnostics: usize,
}

impl Interpreter<StreamConsole<BufReader<Stdin>, Stdout>> {
    /// Interpreter reading stdin and writing stdout
    pub fn with_stdio(config: Config) -> Self {
        Interpreter::new(config, StreamConsole::stdio())
    }
}

impl<C: Console> Interpreter<C> {
    pub fn new(config: Config, console: C) -> Self {
        Interpreter {
            config,
            console,
            scopes: ScopeArena::new(),
            registry: Registry::new(),
            current_scope: ScopeId::ROOT,
            current_location: SourceLocation::default(),
            diagnostics: Vec::new(),
            suppressed_diagnostics: 0,
        }
    }

    /// Register every top-level item of `program` into the root scope.
    ///
    /// Directives, shapes, globals and functions are processed in order; any
    /// other top-level statement is executed as well. Returns the global
    /// variable table.
    pub fn evaluate(&mut self, program: &Program) -> Result<ScopeSnapshot, FatalError> {
        for item in &program.items {
            // Stray control transfers at top level have nothing to unwind
            self.execute_statement(item).map_err(|e| self.fatal(e))?;
        }
        Ok(self.snapshot())
    }

    /// Evaluate `program`, then invoke the configured entry point
    pub fn run(&mut self, program: &Program) -> Result<RunOutcome, FatalError> {
        self.evaluate(program)?;

        let entry = self.config.entry_point.clone();
        if self.registry.function(&entry).is_none() {
            return Err(self.fatal(RuntimeError::NoEntryPoint { name: entry }));
        }
        let exit_value = self.invoke(&entry, Vec::new())?;

        Ok(RunOutcome {
            exit_value,
            snapshot: self.snapshot(),
        })
    }

    /// Call a registered function with already-evaluated arguments
    pub fn invoke(&mut self, name: &str, args: Vec<Value>) -> Result<Option<Value>, FatalError> {
        match self.call_function(name, args) {
            Ok(Value::Void) => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(e) => Err(self.fatal(e)),
        }
    }

    /// Attach the current location and unwind to the root scope
    fn fatal(&mut self, error: RuntimeError) -> FatalError {
        self.scopes.reset_to_root();
        self.current_scope = ScopeId::ROOT;
        FatalError::new(error, self.current_location)
    }

    /// Execute a single statement
    pub(crate) fn execute_statement(&mut self, stmt: &Stmt) -> Result<Flow, RuntimeError> {
        self.current_location = stmt.location;

        match &stmt.kind {
            StmtKind::Directive(directive) => {
                self.execute_directive(directive)?;
                Ok(Flow::Normal)
            }

            StmtKind::StructDef { name, fields } => {
                self.execute_shape_def(name, ShapeKind::Struct, fields)?;
                Ok(Flow::Normal)
            }

            StmtKind::UnionDef { name, fields } => {
                self.execute_shape_def(name, ShapeKind::Union, fields)?;
                Ok(Flow::Normal)
            }

            StmtKind::VarDecl {
                name,
                var_type,
                init,
            } => {
                self.execute_var_decl(name, var_type, init.as_ref())?;
                Ok(Flow::Normal)
            }

            StmtKind::Assignment { target, value } => {
                self.execute_assignment(target, value)?;
                Ok(Flow::Normal)
            }

            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.execute_if(condition, then_branch, else_branch.as_deref()),

            StmtKind::Switch {
                expr,
                cases,
                defaults,
            } => self.execute_switch(expr, cases, defaults),

            StmtKind::While { condition, body } => self.execute_while(condition, body),

            StmtKind::DoWhile { body, condition } => self.execute_do_while(body, condition),

            StmtKind::For {
                init,
                condition,
                step,
                body,
            } => self.execute_for(init.as_deref(), condition.as_ref(), step.as_deref(), body),

            StmtKind::Break => Ok(Flow::Break),

            StmtKind::Continue => Ok(Flow::Continue),

            StmtKind::Return(expr) => self.execute_return(expr.as_ref()),

            StmtKind::Io(io) => {
                self.execute_io(io)?;
                Ok(Flow::Normal)
            }

            StmtKind::FunctionDef(def) => {
                tracing::debug!(function = %def.name, params = def.params.len(), "function registered");
                self.registry.register_function(def.clone())?;
                Ok(Flow::Normal)
            }

            StmtKind::Block(statements) => self.execute_block(statements),

            StmtKind::Expr(expr) => {
                // Expression as a statement; the value is discarded
                self.evaluate_expr(expr)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Run statements in the current scope until one transfers control
    pub(crate) fn execute_sequence(&mut self, statements: &[Stmt]) -> Result<Flow, RuntimeError> {
        for stmt in statements {
            let flow = self.execute_statement(stmt)?;
            if flow != Flow::Normal {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    /// Run statements in a fresh child scope of the current one
    pub(crate) fn execute_block(&mut self, statements: &[Stmt]) -> Result<Flow, RuntimeError> {
        let parent = self.current_scope;
        self.with_scope(parent, |this| this.execute_sequence(statements))
    }

    /// Push a frame under `parent`, run `f` in it, and release it on every path
    pub(crate) fn with_scope<T>(
        &mut self,
        parent: ScopeId,
        f: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        let saved = self.current_scope;
        let frame = self.scopes.push(parent);
        self.current_scope = frame;

        let result = f(self);

        self.scopes.pop(frame);
        self.current_scope = saved;
        result
    }

    /// Invoke a user function: bind arguments in a fresh child of the root
    /// scope, run the body, and coerce whatever it returns.
    #[tracing::instrument(level = "debug", skip(self, args))]
    pub(crate) fn call_function(&mut self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let def = self
            .registry
            .function(name)
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: name.to_string(),
            })?;

        if args.len() != def.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch {
                function: name.to_string(),
                expected: def.params.len(),
                got: args.len(),
            });
        }

        let call_site = self.current_location;
        self.current_location = def.location;

        let flow = self.with_scope(ScopeId::ROOT, |this| {
            for (param, arg) in def.params.iter().zip(args) {
                let context = format!("parameter '{}' of {}", param.name, def.name);
                let value = this.coerce_value(&param.param_type, arg, &context)?;
                let scope = this.current_scope;
                this.scopes
                    .declare(scope, &param.name, param.param_type.clone(), Some(value))?;
            }
            this.execute_sequence(&def.body)
        })?;

        // A stray break/continue ends the body like a bare return
        let returned = match flow {
            Flow::Return(value) => value,
            Flow::Normal | Flow::Break | Flow::Continue => None,
        };

        let result = match (returned, &def.return_type.base) {
            (_, BaseType::Void) => Value::Void,
            (Some(value), _) => {
                let context = format!("return value of {}", def.name);
                self.coerce_value(&def.return_type, value, &context)?
            }
            (None, _) => Value::Void,
        };

        self.current_location = call_site;
        Ok(result)
    }

    /// Record a non-fatal warning at the current location
    pub(crate) fn warn(&mut self, message: String) {
        tracing::warn!(line = self.current_location.line, "{}", message);
        if self.diagnostics.len() >= self.config.diagnostic_limit {
            self.suppressed_diagnostics += 1;
            return;
        }
        self.diagnostics.push(Diagnostic {
            message,
            location: self.current_location,
        });
    }

    /// Global variable table as it stands now
    pub fn snapshot(&self) -> ScopeSnapshot {
        ScopeSnapshot::capture(self.scopes.root())
    }

    /// The first warnings of the run, capped by [`Config::diagnostic_limit`]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Warnings raised past the cap; they were logged but not kept
    pub fn suppressed_diagnostics(&self) -> usize {
        self.suppressed_diagnostics
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn scopes(&self) -> &ScopeArena {
        &self.scopes
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    pub fn current_location(&self) -> SourceLocation {
        self.current_location
    }
}
