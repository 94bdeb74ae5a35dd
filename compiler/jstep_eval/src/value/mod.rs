//! Runtime values for the jstep evaluator.
//!
//! Primitives are stored inline. Strings, arrays and objects live behind
//! [`Heap`], a shared copy-on-write handle: cloning a value never copies its
//! contents, and writing through one binding never affects another. Scope
//! versions kept for step-back therefore share everything they did not
//! change.
//!
//! Heap values are constructed through the factory methods
//! ([`Value::string`], [`Value::array`], [`Value::object`]).

mod compare;
mod heap;
mod json;
pub mod limits;
pub mod number;
mod object;

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

pub use heap::Heap;
pub use json::{stringify, stringify_bounded};
pub use limits::{MAX_ARRAY_LENGTH, MAX_STRING_LENGTH};
pub use object::Object;

use crate::errors::EvalError;
use limits::push_bounded;

use number::{format_number, parse_number};

/// A runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Str(Heap<String>),
    Boolean(bool),
    Null,
    Undefined,
    Array(Heap<Vec<Value>>),
    Object(Heap<Object>),
}

/// Type tag published with each variable.
///
/// Unlike JavaScript's `typeof`, arrays and `null` get their own tags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Number,
    String,
    Boolean,
    Null,
    Undefined,
    Array,
    Object,
}

impl ValueType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::Null => "null",
            ValueType::Undefined => "undefined",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Factory methods

impl Value {
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Heap::new(items))
    }

    #[inline]
    pub fn object(object: Object) -> Self {
        Value::Object(Heap::new(object))
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Number(_) => ValueType::Number,
            Value::Str(_) => ValueType::String,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Null => ValueType::Null,
            Value::Undefined => ValueType::Undefined,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
        }
    }

    /// Result of the `typeof` operator.
    pub fn typeof_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Undefined => "undefined",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Boolean(b) => *b,
            Value::Null | Value::Undefined => false,
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// JavaScript `ToNumber`.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Str(s) => parse_number(s),
            Value::Boolean(b) => f64::from(u8::from(*b)),
            Value::Null => 0.0,
            Value::Undefined | Value::Object(_) => f64::NAN,
            Value::Array(_) => parse_number(&self.to_js_string()),
        }
    }

    /// JavaScript `String(value)`.
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Str(s) => s.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::Undefined => "undefined".to_string(),
            Value::Array(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|item| {
                        if item.is_nullish() {
                            String::new()
                        } else {
                            item.to_js_string()
                        }
                    })
                    .collect();
                parts.join(",")
            }
            Value::Object(_) => "[object Object]".to_string(),
        }
    }

    /// Append `String(value)` to `out`, failing once the text would pass
    /// [`MAX_STRING_LENGTH`]. Stops early, so shared nested arrays cost no
    /// more than the limit.
    pub fn write_js_string(&self, out: &mut String) -> Result<(), EvalError> {
        match self {
            Value::Str(s) => push_bounded(out, s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        push_bounded(out, ",")?;
                    }
                    if !item.is_nullish() {
                        item.write_js_string(out)?;
                    }
                }
                Ok(())
            }
            other => push_bounded(out, &other.to_js_string()),
        }
    }

    /// [`Value::to_js_string`] for text that becomes a new string value.
    pub fn to_js_string_checked(&self) -> Result<String, EvalError> {
        let mut out = String::new();
        self.write_js_string(&mut out)?;
        Ok(out)
    }

    /// [`Value::to_display`] for text that ends up in program output.
    pub fn to_display_checked(&self) -> Result<String, EvalError> {
        match self {
            Value::Array(_) | Value::Object(_) => {
                Ok(stringify_bounded(self, None, MAX_STRING_LENGTH)?.unwrap_or_default())
            }
            other => other.to_js_string_checked(),
        }
    }

    /// Whether `ToPrimitive` yields a string (arrays and objects do).
    pub(crate) fn is_string_like(&self) -> bool {
        matches!(self, Value::Str(_) | Value::Array(_) | Value::Object(_))
    }

    /// Rendering used by `console.log` and the variable panel: strings raw,
    /// arrays and objects as JSON.
    pub fn to_display(&self) -> String {
        match self {
            Value::Array(_) | Value::Object(_) => stringify(self, None).unwrap_or_default(),
            other => other.to_js_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display())
    }
}

/// Serializes the value as the JSON a UI would display: integral numbers
/// as integers, non-finite numbers and `undefined` as `null`.
impl Serialize for Value {
    #[allow(clippy::cast_possible_truncation)]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Value::Number(_) | Value::Null | Value::Undefined => serializer.serialize_none(),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(object) => {
                let mut map = serializer.serialize_map(Some(object.len()))?;
                for (key, value) in object.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
