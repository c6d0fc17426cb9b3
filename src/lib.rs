//! # Introduction
//!
//! cwalk evaluates programs written in a small C subset by walking their
//! syntax tree directly. Parsing happens elsewhere: a front end hands the
//! evaluator an [`ast::Program`].
//!
//! ## Execution pipeline
//!
//! ```text
//! AST → register top-level items → invoke entry point → final scope snapshot
//! ```
//!
//! 1. [`ast`]: the tree contract, plus [`ast::builders`] for assembling trees.
//! 2. [`interpreter`]: statement executor, expression evaluator, coercion
//!    and the formatted I/O statements.
//! 3. [`memory`]: tagged [`memory::value::Value`]s, the
//!    [`memory::scope::ScopeArena`] and the shape/function/macro
//!    [`memory::registry::Registry`].
//! 4. [`console`]: where `printf`/`puts` write and `scanf`/`gets` read; a
//!    [`console::MockConsole`] records output for tests.
//! 5. [`snapshot`]: the root scope as returned to callers.
//!
//! ## Supported C subset
//!
//! Types: the integer family, `float`, `double`, `char`, `string`, structs,
//! unions and fixed-size one-dimensional arrays.
//! Control flow: `if/else`, `while`, `do-while`, `for`, `switch/case`,
//! `break`, `continue`, `return`, user function calls.
//! I/O: `printf`, `scanf`, `gets`, `puts`.

pub mod ast;
pub mod console;
pub mod interpreter;
pub mod memory;
pub mod snapshot;

pub use interpreter::config::Config;
pub use interpreter::engine::{Diagnostic, Flow, Interpreter, RunOutcome};
pub use interpreter::errors::{FatalError, RuntimeError};
pub use memory::value::Value;
pub use snapshot::ScopeSnapshot;

/// Evaluate `program` against stdin/stdout with the default configuration.
///
/// Registers every top-level item and returns the global variable table.
pub fn evaluate(program: &ast::Program) -> Result<ScopeSnapshot, FatalError> {
    Interpreter::with_stdio(Config::default()).evaluate(program)
}
