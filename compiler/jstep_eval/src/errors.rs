//! Runtime error types.
//!
//! Every fault the evaluator can raise is an [`EvalError`]: a JavaScript
//! error class ([`EvalErrorKind`]) plus the message a JavaScript engine would
//! print. The factory functions below are the only way errors are built, so
//! messages stay consistent across the evaluator.

use std::fmt;

use jstep_parse::{ParseError, ParseErrorKind};
use serde::Serialize;
use thiserror::Error;

use crate::Value;

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, EvalError>;

/// Error class, published as the error's `name`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EvalErrorKind {
    ReferenceError,
    TypeError,
    RangeError,
    SyntaxError,
    /// Valid JavaScript outside the supported subset.
    UnsupportedSyntax,
    /// `run_to_end` hit its step ceiling.
    Timeout,
}

impl EvalErrorKind {
    pub const fn name(self) -> &'static str {
        match self {
            EvalErrorKind::ReferenceError => "ReferenceError",
            EvalErrorKind::TypeError => "TypeError",
            EvalErrorKind::RangeError => "RangeError",
            EvalErrorKind::SyntaxError => "SyntaxError",
            EvalErrorKind::UnsupportedSyntax => "UnsupportedSyntax",
            EvalErrorKind::Timeout => "Timeout",
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A runtime error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub message: String,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, message: impl Into<String>) -> Self {
        EvalError {
            kind,
            message: message.into(),
        }
    }
}

// Reference errors

#[cold]
pub fn not_defined(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::ReferenceError, format!("{name} is not defined"))
}

// Type errors

#[cold]
pub fn not_a_function(callee: &str) -> EvalError {
    EvalError::new(EvalErrorKind::TypeError, format!("{callee} is not a function"))
}

#[cold]
pub fn assignment_to_constant() -> EvalError {
    EvalError::new(EvalErrorKind::TypeError, "Assignment to constant variable.")
}

/// Property read on `null` or `undefined`.
#[cold]
pub fn cannot_read_properties(receiver: &Value, key: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::TypeError,
        format!(
            "Cannot read properties of {} (reading '{key}')",
            receiver.to_js_string()
        ),
    )
}

/// Property write on `null` or `undefined`.
#[cold]
pub fn cannot_set_properties(receiver: &Value, key: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::TypeError,
        format!(
            "Cannot set properties of {} (setting '{key}')",
            receiver.to_js_string()
        ),
    )
}

#[cold]
pub fn not_iterable(what: &str) -> EvalError {
    EvalError::new(EvalErrorKind::TypeError, format!("{what} is not iterable"))
}

#[cold]
pub fn not_an_object(what: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::TypeError,
        format!("Cannot convert {what} to object"),
    )
}

// Range errors

#[cold]
pub fn invalid_array_length() -> EvalError {
    EvalError::new(EvalErrorKind::RangeError, "Invalid array length")
}

#[cold]
pub fn invalid_string_length() -> EvalError {
    EvalError::new(EvalErrorKind::RangeError, "Invalid string length")
}

#[cold]
pub fn invalid_count(count: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::RangeError,
        format!("Invalid count value: {count}"),
    )
}

#[cold]
pub fn invalid_digits(method: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::RangeError,
        format!("{method}() digits argument must be between 0 and 100"),
    )
}

#[cold]
pub fn invalid_radix() -> EvalError {
    EvalError::new(
        EvalErrorKind::RangeError,
        "toString() radix must be between 2 and 36",
    )
}

// Syntax errors

#[cold]
pub fn illegal_break() -> EvalError {
    EvalError::new(EvalErrorKind::SyntaxError, "Illegal break statement")
}

#[cold]
pub fn illegal_continue() -> EvalError {
    EvalError::new(
        EvalErrorKind::SyntaxError,
        "Illegal continue statement: no surrounding iteration statement",
    )
}

/// A header whose block has no closing `}`.
#[cold]
pub fn unexpected_end_of_input() -> EvalError {
    EvalError::new(EvalErrorKind::SyntaxError, "Unexpected end of input")
}

#[cold]
pub fn invalid_json(detail: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::SyntaxError,
        format!("Unexpected token in JSON ({detail})"),
    )
}

#[cold]
pub fn from_parse(error: &ParseError) -> EvalError {
    let kind = match error.kind {
        ParseErrorKind::Syntax => EvalErrorKind::SyntaxError,
        ParseErrorKind::Unsupported => EvalErrorKind::UnsupportedSyntax,
    };
    EvalError::new(kind, error.message.clone())
}

// Outside the subset

#[cold]
pub fn unsupported(what: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::UnsupportedSyntax,
        format!("{what} is not supported"),
    )
}

#[cold]
pub fn function_as_value(name: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::UnsupportedSyntax,
        format!("using function '{name}' as a value is not supported"),
    )
}

// Resource limits

#[cold]
pub fn timeout(max_steps: usize) -> EvalError {
    EvalError::new(
        EvalErrorKind::Timeout,
        format!("Execution exceeded {max_steps} steps (possible infinite loop)"),
    )
}
