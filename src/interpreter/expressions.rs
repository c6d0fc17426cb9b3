//! Expression evaluation
//!
//! This module handles evaluation of every expression shape:
//!
//! - Literals (numbers, characters, strings)
//! - Identifiers, resolved through the scope chain
//! - Field access and array subscripting (see [`ops::access`](super::ops::access))
//! - Binary and unary operators (see [`ops::binary`](super::ops::binary),
//!   [`ops::unary`](super::ops::unary))
//! - Calls to user-defined functions
//!
//! Macros registered by `#define` are recorded but never substituted, so an
//! identifier always names a variable.

use crate::ast::Expr;
use crate::console::Console;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;

impl<C: Console> Interpreter<C> {
    /// Evaluate an expression and return its value
    pub(crate) fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Number(text) => parse_number(text),

            Expr::Str(raw) => Ok(Value::Str(unescape(raw))),

            Expr::Char(raw) => {
                let text = unescape(raw);
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(RuntimeError::TypeMismatch {
                        expected: "single character".to_string(),
                        got: format!("'{}'", raw),
                        context: "character literal".to_string(),
                    }),
                }
            }

            Expr::Identifier(name) => {
                let var = self.scopes.lookup(self.current_scope, name, true)?;
                Ok(var.value.clone())
            }

            Expr::Field { base, field } => self.evaluate_field_access(base, field),

            Expr::Index { array, index } => self.evaluate_index_access(array, index),

            Expr::Paren(inner) => self.evaluate_expr(inner),

            Expr::Binary { op, left, right } => self.evaluate_binary_op(*op, left, right),

            Expr::Unary { op, operand } => self.evaluate_unary_op(*op, operand),

            Expr::Call { name, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.evaluate_expr(arg)?);
                }
                self.call_function(name, values)
            }

            Expr::Opaque(description) => {
                tracing::debug!(expr = %description, "unmodelled expression evaluates to void");
                Ok(Value::Void)
            }
        }
    }
}

/// Integer literal unless the text contains a decimal point or exponent
pub(crate) fn parse_number(text: &str) -> Result<Value, RuntimeError> {
    let invalid = || RuntimeError::TypeMismatch {
        expected: "numeric literal".to_string(),
        got: text.to_string(),
        context: "literal".to_string(),
    };

    let is_hex = text.starts_with("0x") || text.starts_with("0X");
    if !is_hex && text.contains(['.', 'e', 'E']) {
        let digits = text.trim_end_matches(['f', 'F', 'l', 'L']);
        return digits.parse::<f64>().map(Value::Float).map_err(|_| invalid());
    }

    let digits = text.trim_end_matches(['u', 'U', 'l', 'L']);
    let parsed = if is_hex {
        i64::from_str_radix(&digits[2..], 16)
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 8)
    } else {
        digits.parse::<i64>()
    };
    parsed.map(Value::Int).map_err(|_| invalid())
}

/// Process backslash escapes in literal text.
///
/// Unknown escapes are kept verbatim, backslash included.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            out.push('\\');
            break;
        };
        match escape {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'v' => out.push('\u{0B}'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            '?' => out.push('?'),
            'x' => {
                let mut code = 0u32;
                let mut digits = 0;
                while let Some(d) = chars.peek().and_then(|d| d.to_digit(16)) {
                    code = code * 16 + d;
                    digits += 1;
                    chars.next();
                }
                match char::from_u32(code).filter(|_| digits > 0) {
                    Some(decoded) => out.push(decoded),
                    None => out.push_str("\\x"),
                }
            }
            '0'..='7' => {
                let mut code = escape.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code).unwrap_or('\0'));
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

/// Name of an lvalue-like expression for error messages, e.g. `p.origin.x`
pub(crate) fn expr_label(expr: &Expr) -> String {
    match expr {
        Expr::Identifier(name) => name.clone(),
        Expr::Field { base, field } => format!("{}.{}", expr_label(base), field),
        Expr::Index { array, .. } => format!("{}[]", array),
        Expr::Paren(inner) => expr_label(inner),
        _ => "expression".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_literals() {
        assert_eq!(parse_number("42").unwrap(), Value::Int(42));
        assert_eq!(parse_number("2.75").unwrap(), Value::Float(2.75));
        assert_eq!(parse_number("2.5f").unwrap(), Value::Float(2.5));
        assert_eq!(parse_number("1e3").unwrap(), Value::Float(1000.0));
        assert_eq!(parse_number("0x1F").unwrap(), Value::Int(31));
        assert_eq!(parse_number("010").unwrap(), Value::Int(8));
        assert_eq!(parse_number("0").unwrap(), Value::Int(0));
        assert_eq!(parse_number("10L").unwrap(), Value::Int(10));
        assert!(parse_number("12ab").is_err());
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r#"say \"hi\"\t"#), "say \"hi\"\t");
        assert_eq!(unescape(r"\\"), "\\");
        assert_eq!(unescape(r"\x41\101"), "AA");
        assert_eq!(unescape(r"\0"), "\0");
        assert_eq!(unescape(r"\q"), "\\q");
        assert_eq!(unescape("plain"), "plain");
    }
}
