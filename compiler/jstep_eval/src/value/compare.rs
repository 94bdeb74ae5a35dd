//! Equality and ordering between values.

use std::cmp::Ordering;

use super::{Heap, Value};

impl Value {
    /// `===`. Heap values compare by identity.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a.as_str() == b.as_str(),
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) | (Value::Undefined, Value::Undefined) => true,
            (Value::Array(a), Value::Array(b)) => Heap::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Heap::ptr_eq(a, b),
            _ => false,
        }
    }

    /// `==` with JavaScript's coercions.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.value_type() == b.value_type() => a.strict_eq(b),
            (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
            (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => false,
            (Value::Boolean(b), rest) | (rest, Value::Boolean(b)) => {
                Value::Number(f64::from(u8::from(*b))).loose_eq(rest)
            }
            (Value::Number(n), Value::Str(s)) | (Value::Str(s), Value::Number(n)) => {
                *n == super::number::parse_number(s)
            }
            // An array or object against a primitive compares its string form.
            (Value::Array(_) | Value::Object(_), _) => {
                Value::string(self.to_js_string()).loose_eq(other)
            }
            (_, Value::Array(_) | Value::Object(_)) => {
                self.loose_eq(&Value::string(other.to_js_string()))
            }
            _ => false,
        }
    }

    /// Deep content equality used by the change detector. Unlike `===`,
    /// `NaN` equals `NaN` and heap values compare by content.
    pub fn structural_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Array(a), Value::Array(b)) => {
                Heap::ptr_eq(a, b)
                    || (a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.structural_eq(y)))
            }
            (Value::Object(a), Value::Object(b)) => {
                Heap::ptr_eq(a, b)
                    || (a.len() == b.len()
                        && a.iter()
                            .zip(b.iter())
                            .all(|((ka, va), (kb, vb))| ka == kb && va.structural_eq(vb)))
            }
            (a, b) => a.strict_eq(b),
        }
    }

    /// Relational comparison (`<`, `<=`, `>`, `>=`).
    ///
    /// Two string-like operands compare as strings by UTF-16 code units;
    /// anything else compares numerically. `None` means the comparison is
    /// undefined (a `NaN` operand), which makes every relational operator
    /// return `false`.
    pub fn js_compare(&self, other: &Value) -> Option<Ordering> {
        if self.is_string_like() && other.is_string_like() {
            let a = self.to_js_string();
            let b = other.to_js_string();
            return Some(a.encode_utf16().cmp(b.encode_utf16()));
        }
        self.to_number().partial_cmp(&other.to_number())
    }
}
