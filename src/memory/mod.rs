//! Memory model for the evaluator
//!
//! This module provides the core storage abstractions:
//! - [`value`]: Runtime value representation (Int, Float, Char, Str, Array, Aggregate)
//! - [`scope`]: Arena of scope frames holding declared variables
//! - [`registry`]: Program-wide shapes, functions, macros and includes
//!
//! Values are stored by value: an aggregate or array lives inside the
//! [`scope::Variable`] that declares it, and reads hand out clones.

pub mod registry;
pub mod scope;
pub mod value;
