//! Formatted I/O statements
//!
//! `printf`, `scanf`, `gets` and `puts` run against the interpreter's
//! [`Console`]. `printf` formatting is a pure function ([`format_printf`]) so
//! it can be tested without an interpreter.
//!
//! Supported printf placeholders: `%d %i %u %x %X %o %f %F %e %E %g %G %c %s`
//! and `%%`, with the flags `- + space 0 #`, a field width, a precision and
//! the length modifiers `h l ll L` (accepted and ignored).

use crate::ast::{BaseType, Expr, IoStatement, Type};
use crate::console::Console;
use crate::interpreter::constants::DEFAULT_FLOAT_PRECISION;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::expressions::unescape;
use crate::interpreter::type_system::describe;
use crate::memory::value::Value;
use std::iter::Peekable;
use std::str::Chars;

/// One parsed `%...` placeholder
#[derive(Debug, Clone, Default, PartialEq)]
struct FormatSpec {
    left_align: bool,
    zero_pad: bool,
    plus_sign: bool,
    space_sign: bool,
    alternate: bool,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

fn format_error(message: String) -> RuntimeError {
    RuntimeError::FormatArgumentMismatch { message }
}

fn read_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut digits = String::new();
    while let Some(d) = chars.peek().filter(|d| d.is_ascii_digit()) {
        digits.push(*d);
        chars.next();
    }
    digits.parse().ok()
}

/// Parse the placeholder after its `%`
fn parse_spec(chars: &mut Peekable<Chars<'_>>) -> Result<FormatSpec, RuntimeError> {
    let mut spec = FormatSpec::default();

    while let Some(&flag) = chars.peek() {
        match flag {
            '-' => spec.left_align = true,
            '0' => spec.zero_pad = true,
            '+' => spec.plus_sign = true,
            ' ' => spec.space_sign = true,
            '#' => spec.alternate = true,
            _ => break,
        }
        chars.next();
    }

    spec.width = read_number(chars);
    if chars.peek() == Some(&'.') {
        chars.next();
        spec.precision = Some(read_number(chars).unwrap_or(0));
    }

    while matches!(chars.peek(), Some('h' | 'l' | 'L' | 'q' | 'j' | 'z' | 't')) {
        chars.next();
    }

    match chars.next() {
        Some(c) if "diuxXofFeEgGcs".contains(c) => {
            spec.conversion = c;
            Ok(spec)
        }
        Some(c) => Err(format_error(format!("unsupported conversion '%{}'", c))),
        None => Err(format_error("incomplete placeholder at end of format".to_string())),
    }
}

/// Count scanf conversions, ignoring `%%`
pub fn count_placeholders(format: &str) -> usize {
    let mut count = 0;
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
        } else {
            count += 1;
        }
    }
    count
}

fn with_sign(spec: &FormatSpec, negative: bool, digits: String) -> String {
    if negative {
        format!("-{}", digits)
    } else if spec.plus_sign {
        format!("+{}", digits)
    } else if spec.space_sign {
        format!(" {}", digits)
    } else {
        digits
    }
}

/// C-style exponent notation: `1.500000e+00`
fn exponent_notation(x: f64, precision: usize, upper: bool) -> String {
    let rendered = format!("{:.*e}", precision, x.abs());
    let (mantissa, exponent) = rendered.split_once('e').unwrap_or((rendered.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    let out = format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    if upper {
        out.to_uppercase()
    } else {
        out
    }
}

/// Drop trailing fractional zeros, and the point if nothing follows it
fn strip_fraction_zeros(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// C `%g`: `%e` style when the exponent is below -4 or at least the
/// precision, `%f` style otherwise, trailing zeros removed unless `#`
fn general_notation(x: f64, precision: usize, alternate: bool, upper: bool) -> String {
    let significant = precision.max(1);
    let scientific = format!("{:.*e}", significant - 1, x.abs());
    let exponent: i32 = scientific
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);

    if exponent < -4 || exponent >= significant as i32 {
        let rendered = exponent_notation(x, significant - 1, upper);
        if alternate {
            return rendered;
        }
        let marker = if upper { 'E' } else { 'e' };
        match rendered.split_once(marker) {
            Some((mantissa, tail)) => format!("{}{}{}", strip_fraction_zeros(mantissa), marker, tail),
            None => rendered,
        }
    } else {
        let decimals = (significant as i32 - 1 - exponent).max(0) as usize;
        let rendered = format!("{:.*}", decimals, x.abs());
        if alternate {
            rendered
        } else {
            strip_fraction_zeros(&rendered).to_string()
        }
    }
}

fn render_integer(spec: &FormatSpec, value: &Value) -> Result<String, RuntimeError> {
    let n = match value {
        Value::Int(n) => *n,
        Value::Float(x) => x.trunc() as i64,
        Value::Char(c) => *c as i64,
        other => {
            return Err(format_error(format!(
                "%{} expects an integer, got {}",
                spec.conversion,
                describe(other)
            )))
        }
    };
    let magnitude = n.unsigned_abs();
    let mut digits = match spec.conversion {
        'x' => format!("{:x}", magnitude),
        'X' => format!("{:X}", magnitude),
        'o' => format!("{:o}", magnitude),
        _ => magnitude.to_string(),
    };
    if let Some(p) = spec.precision {
        if digits.len() < p {
            digits = format!("{}{}", "0".repeat(p - digits.len()), digits);
        }
    }
    if spec.alternate && magnitude != 0 {
        match spec.conversion {
            'x' => digits.insert_str(0, "0x"),
            'X' => digits.insert_str(0, "0X"),
            'o' => digits.insert(0, '0'),
            _ => {}
        }
    }
    Ok(with_sign(spec, n < 0, digits))
}

fn render_float(spec: &FormatSpec, value: &Value) -> Result<String, RuntimeError> {
    let x = match value {
        Value::Int(n) => *n as f64,
        Value::Float(x) => *x,
        other => {
            return Err(format_error(format!(
                "%{} expects a floating value, got {}",
                spec.conversion,
                describe(other)
            )))
        }
    };
    let precision = spec.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
    let digits = match spec.conversion {
        'e' | 'E' => exponent_notation(x, precision, spec.conversion == 'E'),
        'g' | 'G' => general_notation(x, precision, spec.alternate, spec.conversion == 'G'),
        _ => format!("{:.*}", precision, x.abs()),
    };
    Ok(with_sign(spec, x.is_sign_negative() && x != 0.0, digits))
}

fn render_text(spec: &FormatSpec, value: &Value) -> Result<String, RuntimeError> {
    if spec.conversion == 'c' {
        return match value {
            Value::Char(c) => Ok(c.to_string()),
            Value::Str(s) if s.chars().count() == 1 => Ok(s.clone()),
            Value::Int(n) => u32::try_from(*n)
                .ok()
                .and_then(char::from_u32)
                .map(|c| c.to_string())
                .ok_or_else(|| format_error(format!("%c cannot print code {}", n))),
            other => Err(format_error(format!("%c expects a character, got {}", describe(other)))),
        };
    }

    let text = value
        .as_text()
        .ok_or_else(|| format_error(format!("%s expects a string, got {}", describe(value))))?;
    Ok(match spec.precision {
        Some(p) => text.chars().take(p).collect(),
        None => text,
    })
}

fn pad(spec: &FormatSpec, body: String) -> String {
    let width = spec.width.unwrap_or(0);
    let len = body.chars().count();
    if len >= width {
        return body;
    }
    let fill = width - len;

    if spec.left_align {
        return format!("{}{}", body, " ".repeat(fill));
    }

    let numeric = !matches!(spec.conversion, 'c' | 's');
    let zero_ok = numeric && spec.zero_pad && !(spec.precision.is_some() && "diuxXo".contains(spec.conversion));
    if zero_ok {
        // Zeros go after any sign or radix prefix
        let mut prefix_len = usize::from(body.starts_with(['+', '-', ' ']));
        if body[prefix_len..].starts_with("0x") || body[prefix_len..].starts_with("0X") {
            prefix_len += 2;
        }
        let (prefix, digits) = body.split_at(prefix_len);
        format!("{}{}{}", prefix, "0".repeat(fill), digits)
    } else {
        format!("{}{}", " ".repeat(fill), body)
    }
}

/// Render a printf format against its arguments.
///
/// Every placeholder consumes one argument of a compatible kind, and every
/// argument must be consumed.
pub fn format_printf(format: &str, args: &[Value]) -> Result<String, RuntimeError> {
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars().peekable();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let spec = parse_spec(&mut chars)?;
        let arg = args.get(next_arg).ok_or_else(|| {
            format_error(format!(
                "placeholder {} (%{}) has no matching argument",
                next_arg + 1,
                spec.conversion
            ))
        })?;
        next_arg += 1;

        let body = match spec.conversion {
            'd' | 'i' | 'u' | 'x' | 'X' | 'o' => render_integer(&spec, arg)?,
            'f' | 'F' | 'e' | 'E' | 'g' | 'G' => render_float(&spec, arg)?,
            _ => render_text(&spec, arg)?,
        };
        out.push_str(&pad(&spec, body));
    }

    if next_arg < args.len() {
        return Err(format_error(format!(
            "{} argument(s) supplied but the format uses {}",
            args.len(),
            next_arg
        )));
    }
    Ok(out)
}

/// Convert one scanf token according to the target's declared type
pub fn parse_input(var_type: &Type, token: &str, target: &str) -> Result<Value, RuntimeError> {
    let conversion_error = || RuntimeError::InputConversionError {
        input: token.to_string(),
        target: target.to_string(),
        target_type: var_type.to_string(),
    };

    if var_type.is_array() {
        return Err(RuntimeError::TypeMismatch {
            expected: "scalar input target".to_string(),
            got: var_type.to_string(),
            context: format!("scanf into '{}'", target),
        });
    }

    match &var_type.base {
        base if base.is_integral() => token.parse::<i64>().map(Value::Int).map_err(|_| conversion_error()),
        BaseType::Float | BaseType::Double => {
            token.parse::<f64>().map(Value::Float).map_err(|_| conversion_error())
        }
        BaseType::Char => token.chars().next().map(Value::Char).ok_or_else(conversion_error),
        BaseType::String => Ok(Value::Str(token.to_string())),
        _ => Err(RuntimeError::TypeMismatch {
            expected: "scalar input target".to_string(),
            got: var_type.to_string(),
            context: format!("scanf into '{}'", target),
        }),
    }
}

impl<C: Console> Interpreter<C> {
    pub(crate) fn execute_io(&mut self, io: &IoStatement) -> Result<(), RuntimeError> {
        match io {
            IoStatement::Printf { format, args } => self.builtin_printf(format, args),
            IoStatement::Scanf { format, targets } => self.builtin_scanf(format, targets),
            IoStatement::Gets(target) => self.builtin_gets(target),
            IoStatement::Puts(value) => self.builtin_puts(value),
        }
    }

    fn builtin_printf(&mut self, format: &str, args: &[Expr]) -> Result<(), RuntimeError> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate_expr(arg)?);
        }
        let output = format_printf(&unescape(format), &values)?;
        self.console.print(&output)
    }

    fn builtin_scanf(&mut self, format: &str, targets: &[String]) -> Result<(), RuntimeError> {
        let placeholders = count_placeholders(&unescape(format));
        if placeholders != targets.len() {
            return Err(RuntimeError::FormatArityMismatch {
                placeholders,
                targets: targets.len(),
            });
        }

        let scope = self.current_scope;
        for target in targets {
            let var_type = self.scopes.lookup(scope, target, false)?.var_type.clone();
            if self.config.prompt_for_input {
                let prompt = format!("Enter a value for {} ({}): ", target, var_type);
                self.console.print(&prompt)?;
            }

            let token = self
                .console
                .read_token()?
                .ok_or_else(|| RuntimeError::UnexpectedEndOfInput {
                    target: target.clone(),
                })?;
            let value = parse_input(&var_type, &token, target)?;
            let value = self.coerce_value(&var_type, value, target)?;
            tracing::debug!(variable = %target, value = %value, "scanf stored");
            self.scopes.assign(scope, target, value)?;
        }
        Ok(())
    }

    /// Read one whole line into a `string` variable
    fn builtin_gets(&mut self, target: &str) -> Result<(), RuntimeError> {
        let scope = self.current_scope;
        let var_type = self.scopes.lookup(scope, target, false)?.var_type.clone();
        if var_type.base != BaseType::String || var_type.is_array() {
            return Err(RuntimeError::TypeMismatch {
                expected: "string".to_string(),
                got: var_type.to_string(),
                context: format!("gets into '{}'", target),
            });
        }

        let line = self
            .console
            .read_line()?
            .ok_or_else(|| RuntimeError::UnexpectedEndOfInput {
                target: target.to_string(),
            })?;
        let value = self.coerce_value(&var_type, Value::Str(line), target)?;
        self.scopes.assign(scope, target, value)
    }

    /// Write text followed by a newline
    fn builtin_puts(&mut self, value: &Expr) -> Result<(), RuntimeError> {
        let value = self.evaluate_expr(value)?;
        let text = value.as_text().ok_or_else(|| RuntimeError::TypeMismatch {
            expected: "string".to_string(),
            got: describe(&value),
            context: "puts".to_string(),
        })?;
        self.console.print(&format!("{}\n", text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;

    fn fmt(format: &str, args: &[Value]) -> String {
        format_printf(format, args).unwrap()
    }

    #[test]
    fn test_basic_conversions() {
        assert_eq!(fmt("x = %d\n", &[Value::Int(5)]), "x = 5\n");
        assert_eq!(fmt("%f", &[Value::Float(1.5)]), "1.500000");
        assert_eq!(fmt("%.2f", &[Value::Int(3)]), "3.00");
        assert_eq!(fmt("%c%s", &[Value::Char('a'), Value::Str("bc".into())]), "abc");
        assert_eq!(fmt("%x %X %o", &[Value::Int(255), Value::Int(255), Value::Int(8)]), "ff FF 10");
        assert_eq!(fmt("100%%", &[]), "100%");
    }

    #[test]
    fn test_width_and_flags() {
        assert_eq!(fmt("[%5d]", &[Value::Int(42)]), "[   42]");
        assert_eq!(fmt("[%-5d]", &[Value::Int(42)]), "[42   ]");
        assert_eq!(fmt("[%05d]", &[Value::Int(-42)]), "[-0042]");
        assert_eq!(fmt("[%+d]", &[Value::Int(7)]), "[+7]");
        assert_eq!(fmt("[%8.3f]", &[Value::Float(1.23456)]), "[   1.235]");
        assert_eq!(fmt("[%.2s]", &[Value::Str("hello".into())]), "[he]");
        assert_eq!(fmt("%ld", &[Value::Int(9)]), "9");
    }

    #[test]
    fn test_exponent_notation() {
        assert_eq!(fmt("%e", &[Value::Float(1500.0)]), "1.500000e+03");
        assert_eq!(fmt("%.1E", &[Value::Float(-0.05)]), "-5.0E-02");
    }

    #[test]
    fn test_general_notation() {
        assert_eq!(fmt("%g", &[Value::Float(1.23456789)]), "1.23457");
        assert_eq!(fmt("%g", &[Value::Float(1e-5)]), "1e-05");
        assert_eq!(fmt("%g", &[Value::Float(1e20)]), "1e+20");
        assert_eq!(fmt("%.2g", &[Value::Float(1234.5)]), "1.2e+03");
        assert_eq!(fmt("%g", &[Value::Float(100000.0)]), "100000");
        assert_eq!(fmt("%g", &[Value::Float(1000000.0)]), "1e+06");
        assert_eq!(fmt("%g", &[Value::Float(0.0001)]), "0.0001");
        assert_eq!(fmt("%g", &[Value::Float(0.5)]), "0.5");
        assert_eq!(fmt("%g", &[Value::Float(0.0)]), "0");
        assert_eq!(fmt("%g", &[Value::Int(-42)]), "-42");
        assert_eq!(fmt("%.0g", &[Value::Float(7.6)]), "8");
        assert_eq!(fmt("%G", &[Value::Float(2.5e-7)]), "2.5E-07");
        assert_eq!(fmt("%#g", &[Value::Float(1.5)]), "1.50000");
        assert_eq!(fmt("[%8.3g]", &[Value::Float(99.95)]), "[     100]");
    }

    #[test]
    fn test_argument_count_mismatch() {
        assert!(matches!(
            format_printf("%d %d", &[Value::Int(1)]),
            Err(RuntimeError::FormatArgumentMismatch { .. })
        ));
        assert!(matches!(
            format_printf("%d", &[Value::Int(1), Value::Int(2)]),
            Err(RuntimeError::FormatArgumentMismatch { .. })
        ));
    }

    #[test]
    fn test_argument_kind_mismatch() {
        assert!(format_printf("%d", &[Value::Str("x".into())]).is_err());
        assert!(format_printf("%s", &[Value::Int(1)]).is_err());
        assert!(format_printf("%q", &[Value::Int(1)]).is_err());
    }

    #[test]
    fn test_count_placeholders() {
        assert_eq!(count_placeholders("%d %f"), 2);
        assert_eq!(count_placeholders("%d%%"), 1);
        assert_eq!(count_placeholders("no input"), 0);
    }

    #[test]
    fn test_parse_input_by_type() {
        assert_eq!(parse_input(&t_int(), "42", "n").unwrap(), Value::Int(42));
        assert_eq!(parse_input(&t_double(), "2.5", "d").unwrap(), Value::Float(2.5));
        assert_eq!(parse_input(&t_char(), "xyz", "c").unwrap(), Value::Char('x'));
        assert_eq!(parse_input(&t_string(), "word", "s").unwrap(), Value::Str("word".into()));
        assert!(matches!(
            parse_input(&t_int(), "abc", "n"),
            Err(RuntimeError::InputConversionError { .. })
        ));
        assert!(parse_input(&t_struct("P"), "1", "p").is_err());
    }
}
