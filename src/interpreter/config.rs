//! Interpreter configuration

use crate::interpreter::constants::{
    DEFAULT_DIAGNOSTIC_LIMIT, DEFAULT_ENTRY_POINT, DEFAULT_PROMPT_FOR_INPUT,
};

/// Options for one interpreter instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Function that [`run`](crate::interpreter::engine::Interpreter::run) invokes
    pub entry_point: String,
    /// Print "Enter a value for NAME (TYPE): " before each scanf read
    pub prompt_for_input: bool,
    /// Most diagnostics an interpreter retains
    pub diagnostic_limit: usize,
}

impl Config {
    pub fn with_entry_point(mut self, name: &str) -> Self {
        self.entry_point = name.to_string();
        self
    }

    pub fn with_input_prompts(mut self) -> Self {
        self.prompt_for_input = true;
        self
    }

    pub fn with_diagnostic_limit(mut self, limit: usize) -> Self {
        self.diagnostic_limit = limit;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            prompt_for_input: DEFAULT_PROMPT_FOR_INPUT,
            diagnostic_limit: DEFAULT_DIAGNOSTIC_LIMIT,
        }
    }
}
