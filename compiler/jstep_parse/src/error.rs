//! Parse error types.

use jstep_ir::TokenKind;
use thiserror::Error;

/// Whether a construct is malformed or merely outside the supported subset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// Malformed input (`SyntaxError` at runtime).
    Syntax,
    /// Valid JavaScript the interpreter does not model (`UnsupportedSyntax`).
    Unsupported,
}

/// A parse error attributed to a 1-based source line.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub line: u32,
}

impl ParseError {
    pub fn syntax(message: impl Into<String>, line: u32) -> Self {
        ParseError {
            kind: ParseErrorKind::Syntax,
            message: message.into(),
            line,
        }
    }

    pub fn unsupported(message: impl Into<String>, line: u32) -> Self {
        ParseError {
            kind: ParseErrorKind::Unsupported,
            message: message.into(),
            line,
        }
    }

    /// `Unexpected token` error in JavaScript's wording.
    pub fn unexpected(found: &TokenKind, line: u32) -> Self {
        match found {
            TokenKind::Eof => Self::syntax("Unexpected end of input", line),
            TokenKind::PlusPlus | TokenKind::MinusMinus => Self::unsupported(
                "increment/decrement inside an expression is not supported",
                line,
            ),
            TokenKind::Arrow => Self::unsupported("arrow functions are not supported", line),
            TokenKind::UnsupportedOp(op) => {
                Self::unsupported(format!("the `{op}` operator is not supported"), line)
            }
            TokenKind::Regex(_) => {
                Self::unsupported("regular expression literals are not supported", line)
            }
            TokenKind::Ident(name) => match unsupported_word(name) {
                Some(what) => Self::unsupported(format!("{what} is not supported"), line),
                None => Self::syntax(format!("Unexpected identifier '{name}'"), line),
            },
            TokenKind::Number(_) => Self::syntax("Unexpected number", line),
            TokenKind::Str(_) | TokenKind::Template(_) => Self::syntax("Unexpected string", line),
            TokenKind::Error => Self::syntax("Invalid or unexpected token", line),
            other => Self::syntax(format!("Unexpected token '{}'", other.symbol()), line),
        }
    }
}

/// Describe a reserved word whose construct is outside the supported subset.
pub(crate) fn unsupported_word(word: &str) -> Option<&'static str> {
    let what = match word {
        "class" => "`class`",
        "new" => "`new`",
        "this" => "`this`",
        "super" => "`super`",
        "try" | "catch" | "finally" => "`try`/`catch`",
        "throw" => "`throw`",
        "switch" | "case" => "`switch`",
        "do" => "`do`...`while`",
        "import" | "export" => "modules",
        "async" | "await" => "async code",
        "yield" => "generators",
        "delete" => "`delete`",
        "void" => "`void`",
        "in" | "of" => "for...in/for...of",
        "instanceof" => "`instanceof`",
        "with" => "`with`",
        "debugger" => "`debugger`",
        _ => return None,
    };
    Some(what)
}
