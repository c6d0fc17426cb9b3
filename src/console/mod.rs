// Console abstraction for the I/O statements

use crate::interpreter::errors::RuntimeError;
use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

/// Where `printf`/`puts` write and `scanf`/`gets` read.
///
/// Token reads split on whitespace and may consume several tokens from one
/// line; a line read returns what is left of a partially consumed line, or
/// the next full line.
pub trait Console {
    fn print(&mut self, text: &str) -> Result<(), RuntimeError>;

    /// Next whitespace-delimited token, `None` at end of input
    fn read_token(&mut self) -> Result<Option<String>, RuntimeError>;

    /// Next line without its terminator, `None` at end of input
    fn read_line(&mut self) -> Result<Option<String>, RuntimeError>;
}

/// Pop the first token off `pending`, leaving the rest in place
fn take_token(pending: &mut String) -> Option<String> {
    let trimmed = pending.trim_start();
    if trimmed.is_empty() {
        pending.clear();
        return None;
    }
    let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    let token = trimmed[..end].to_string();
    *pending = trimmed[end..].to_string();
    Some(token)
}

/// Take the unread part of `pending` as a line, leading blanks included.
/// An empty remainder means the next line should be read.
fn take_rest(pending: &mut String) -> Option<String> {
    let rest = std::mem::take(pending);
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

fn strip_terminator(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Console over any buffered reader and writer
#[derive(Debug)]
pub struct StreamConsole<R, W> {
    input: R,
    output: W,
    pending: String,
}

impl<R: BufRead, W: Write> StreamConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        StreamConsole {
            input,
            output,
            pending: String::new(),
        }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    fn next_line(&mut self) -> Result<Option<String>, RuntimeError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(strip_terminator(line)))
    }
}

impl StreamConsole<BufReader<Stdin>, Stdout> {
    /// Console bound to the process's standard input and output
    pub fn stdio() -> Self {
        StreamConsole::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console for StreamConsole<R, W> {
    fn print(&mut self, text: &str) -> Result<(), RuntimeError> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }

    fn read_token(&mut self) -> Result<Option<String>, RuntimeError> {
        loop {
            if let Some(token) = take_token(&mut self.pending) {
                return Ok(Some(token));
            }
            match self.next_line()? {
                Some(line) => self.pending = line,
                None => return Ok(None),
            }
        }
    }

    fn read_line(&mut self) -> Result<Option<String>, RuntimeError> {
        if let Some(rest) = take_rest(&mut self.pending) {
            return Ok(Some(rest));
        }
        self.next_line()
    }
}

/// Mock console with scripted input and captured output
#[derive(Debug, Clone, Default)]
pub struct MockConsole {
    input: VecDeque<String>,
    pending: String,
    output: String,
}

impl MockConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Console whose input is the lines of `text`
    pub fn with_input(text: &str) -> Self {
        MockConsole {
            input: text.lines().map(str::to_string).collect(),
            ..Self::default()
        }
    }

    /// Everything printed so far
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Printed output split into lines (a trailing newline adds no empty line)
    pub fn output_lines(&self) -> Vec<String> {
        self.output.lines().map(str::to_string).collect()
    }
}

impl Console for MockConsole {
    fn print(&mut self, text: &str) -> Result<(), RuntimeError> {
        self.output.push_str(text);
        Ok(())
    }

    fn read_token(&mut self) -> Result<Option<String>, RuntimeError> {
        loop {
            if let Some(token) = take_token(&mut self.pending) {
                return Ok(Some(token));
            }
            match self.input.pop_front() {
                Some(line) => self.pending = line,
                None => return Ok(None),
            }
        }
    }

    fn read_line(&mut self) -> Result<Option<String>, RuntimeError> {
        if let Some(rest) = take_rest(&mut self.pending) {
            return Ok(Some(rest));
        }
        Ok(self.input.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_span_lines() {
        let mut console = MockConsole::with_input("12  7\n\n  -3\n");
        assert_eq!(console.read_token().unwrap().as_deref(), Some("12"));
        assert_eq!(console.read_token().unwrap().as_deref(), Some("7"));
        assert_eq!(console.read_token().unwrap().as_deref(), Some("-3"));
        assert_eq!(console.read_token().unwrap(), None);
    }

    #[test]
    fn test_line_after_token_returns_rest() {
        let mut console = MockConsole::with_input("5 hello world\nnext line");
        assert_eq!(console.read_token().unwrap().as_deref(), Some("5"));
        assert_eq!(console.read_line().unwrap().as_deref(), Some(" hello world"));
        assert_eq!(console.read_line().unwrap().as_deref(), Some("next line"));
        assert_eq!(console.read_line().unwrap(), None);
    }

    #[test]
    fn test_line_after_token_keeps_leading_blanks() {
        let mut console = MockConsole::with_input("5   indented text\n7\nafter");
        assert_eq!(console.read_token().unwrap().as_deref(), Some("5"));
        assert_eq!(console.read_line().unwrap().as_deref(), Some("   indented text"));
        assert_eq!(console.read_token().unwrap().as_deref(), Some("7"));
        // the token consumed its whole line, so the next line is read
        assert_eq!(console.read_line().unwrap().as_deref(), Some("after"));
    }

    #[test]
    fn test_stream_console_round_trip() {
        let input = io::Cursor::new("42\r\nsome text\n");
        let mut console = StreamConsole::new(input, Vec::new());
        assert_eq!(console.read_token().unwrap().as_deref(), Some("42"));
        assert_eq!(console.read_line().unwrap().as_deref(), Some("some text"));
        console.print("out\n").unwrap();
        let (_, output) = console.into_parts();
        assert_eq!(output, b"out\n");
    }

    #[test]
    fn test_mock_output_lines() {
        let mut console = MockConsole::new();
        console.print("a\nb").unwrap();
        console.print("c\n").unwrap();
        assert_eq!(console.output_lines(), vec!["a", "bc"]);
    }
}
