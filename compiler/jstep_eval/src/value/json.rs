//! `JSON.stringify` rendering.

use std::fmt::Write;

use super::number::format_number;
use super::Value;
use crate::errors::{self, EvalError};

/// Render `value` as JSON. `indent` is the per-level indentation string;
/// `None` or an empty string produces compact output.
///
/// Returns `None` for a top-level `undefined`, which `JSON.stringify` does
/// not serialize.
pub fn stringify(value: &Value, indent: Option<&str>) -> Option<String> {
    stringify_bounded(value, indent, usize::MAX).ok().flatten()
}

/// [`stringify`] that fails with `RangeError: Invalid string length` once
/// the output passes `limit` bytes.
pub fn stringify_bounded(
    value: &Value,
    indent: Option<&str>,
    limit: usize,
) -> Result<Option<String>, EvalError> {
    if matches!(value, Value::Undefined) {
        return Ok(None);
    }
    let mut writer = Writer {
        out: String::new(),
        indent: indent.filter(|s| !s.is_empty()),
        limit,
    };
    writer.value(value, 0)?;
    writer.check()?;
    Ok(Some(writer.out))
}

struct Writer<'a> {
    out: String,
    indent: Option<&'a str>,
    limit: usize,
}

impl Writer<'_> {
    fn check(&self) -> Result<(), EvalError> {
        if self.out.len() > self.limit {
            Err(errors::invalid_string_length())
        } else {
            Ok(())
        }
    }

    fn value(&mut self, value: &Value, depth: usize) -> Result<(), EvalError> {
        self.check()?;
        match value {
            Value::Number(n) if n.is_finite() => self.out.push_str(&format_number(*n)),
            Value::Number(_) | Value::Null | Value::Undefined => self.out.push_str("null"),
            Value::Boolean(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Str(s) => write_string(&mut self.out, s),
            Value::Array(items) => {
                if items.is_empty() {
                    self.out.push_str("[]");
                    return Ok(());
                }
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.newline(depth + 1);
                    self.value(item, depth + 1)?;
                }
                self.newline(depth);
                self.out.push(']');
            }
            Value::Object(object) => {
                // `undefined` members are dropped entirely.
                let mut fields = object
                    .iter()
                    .filter(|(_, v)| !matches!(v, Value::Undefined))
                    .peekable();
                if fields.peek().is_none() {
                    self.out.push_str("{}");
                    return Ok(());
                }
                self.out.push('{');
                for (i, (key, field)) in fields.enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.newline(depth + 1);
                    write_string(&mut self.out, key);
                    self.out.push(':');
                    if self.indent.is_some() {
                        self.out.push(' ');
                    }
                    self.value(field, depth + 1)?;
                }
                self.newline(depth);
                self.out.push('}');
            }
        }
        Ok(())
    }

    fn newline(&mut self, depth: usize) {
        if let Some(unit) = self.indent {
            self.out.push('\n');
            for _ in 0..depth {
                self.out.push_str(unit);
            }
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if u32::from(c) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
