// Constants for the evaluator

/// Function invoked by [`Interpreter::run`](crate::interpreter::engine::Interpreter::run)
pub const DEFAULT_ENTRY_POINT: &str = "main";

/// scanf prompting is off unless requested
pub const DEFAULT_PROMPT_FOR_INPUT: bool = false;

/// Digits printed by `%f` when no precision is given
pub const DEFAULT_FLOAT_PRECISION: usize = 6;

/// Diagnostics kept per run; later warnings are only logged and counted
pub const DEFAULT_DIAGNOSTIC_LIMIT: usize = 1000;
