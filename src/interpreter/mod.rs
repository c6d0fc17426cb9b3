//! Tree-walking evaluator
//!
//! This module provides the core execution logic:
//! - [`engine`]: the [`Interpreter`](engine::Interpreter), statement dispatch,
//!   scopes for blocks and calls
//! - [`expressions`] and [`ops`]: expression evaluation
//! - [`statements`], [`loops`], [`jumps`]: statement executors
//! - [`builtins`]: `printf`, `scanf`, `gets`, `puts`
//! - [`type_system`]: coercion of values into typed slots
//! - [`errors`]: runtime error types
//!
//! # Execution Model
//!
//! Statements return a [`Flow`](engine::Flow) describing how they finished.
//! Errors are fatal and propagate as `Err` up to the public entry points,
//! which attach the location of the failing statement.

pub mod builtins;
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod expressions;
pub mod jumps;
pub mod loops;
pub mod ops;
pub mod statements;
pub mod type_system;
