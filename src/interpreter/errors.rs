//! Runtime error types for the evaluator
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! while evaluating a program, and [`FatalError`], the first such error paired with
//! the location of the statement that raised it.
//!
//! All runtime errors are fatal - they halt evaluation and propagate to the caller.
//! `break`, `continue` and `return` are not errors; see
//! [`Flow`](crate::interpreter::engine::Flow).

use crate::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Name already declared in the same scope
    #[error("variable '{name}' is already declared in this scope")]
    DuplicateDeclaration { name: String },

    /// Shape, function or macro registered twice
    #[error("{kind} '{name}' is already defined")]
    DuplicateDefinition { kind: String, name: String },

    /// Field name repeated within one struct/union definition
    #[error("field '{field}' is declared twice in '{shape}'")]
    DuplicateField { shape: String, field: String },

    #[error("variable '{name}' has not been declared")]
    UndeclaredVariable { name: String },

    /// Read before the first store
    #[error("'{name}' is read before it is initialized")]
    UseBeforeInit { name: String },

    /// Struct/union type that was never registered
    #[error("{name} is not defined")]
    UnknownShape { name: String },

    #[error("cannot access field '{field}' of a non-aggregate {got}")]
    NotAnAggregate { field: String, got: String },

    #[error("'{shape}' has no field '{field}'")]
    UnknownField { shape: String, field: String },

    /// Intermediate segment of a field chain is not an aggregate
    #[error("field '{field}' is not a struct or union")]
    NotASubAggregate { field: String },

    #[error("variable '{name}' is not an array")]
    NotAnArray { name: String },

    #[error("index into '{name}' is not an integer: {got}")]
    NonIntegerIndex { name: String, got: String },

    #[error("index {index} is out of range for '{name}' of length {len}")]
    IndexOutOfRange { name: String, index: i64, len: usize },

    #[error("type mismatch in {context}: expected {expected}, got {got}")]
    TypeMismatch {
        expected: String,
        got: String,
        context: String,
    },

    /// printf placeholder count or kind does not fit the arguments
    #[error("printf format mismatch: {message}")]
    FormatArgumentMismatch { message: String },

    /// scanf placeholder count differs from the target count
    #[error("scanf format has {placeholders} placeholder(s) but {targets} target(s)")]
    FormatArityMismatch { placeholders: usize, targets: usize },

    #[error("cannot convert input '{input}' to {target_type} for '{target}'")]
    InputConversionError {
        input: String,
        target: String,
        target_type: String,
    },

    #[error("input ended while reading '{target}'")]
    UnexpectedEndOfInput { target: String },

    #[error("function '{name}' is not defined")]
    UndefinedFunction { name: String },

    #[error("function '{function}' expects {expected} argument(s), got {got}")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        got: usize,
    },

    /// Division or modulo by zero
    #[error("division by zero in {operation}")]
    DivisionByZero { operation: String },

    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: String },

    /// Console read/write failure
    #[error("I/O error: {message}")]
    Io { message: String },

    /// The configured entry function is missing
    #[error("entry point '{name}' is not defined")]
    NoEntryPoint { name: String },
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::Io {
            message: err.to_string(),
        }
    }
}

/// The error that terminated an evaluation run
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{error} at {location}")]
pub struct FatalError {
    pub error: RuntimeError,
    pub location: SourceLocation,
}

impl FatalError {
    pub fn new(error: RuntimeError, location: SourceLocation) -> Self {
        FatalError { error, location }
    }
}
