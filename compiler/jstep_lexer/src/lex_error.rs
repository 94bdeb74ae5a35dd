//! Lexer error types.

use jstep_ir::Span;
use thiserror::Error;

/// A lexer error located in the source.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
    /// 1-based line of `span.start`.
    pub line: u32,
}

/// What went wrong.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated template literal")]
    UnterminatedTemplate,
    #[error("unterminated `${{` in template literal")]
    UnterminatedInterpolation,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid character `{0}`")]
    InvalidCharacter(char),
}

impl LexErrorKind {
    /// Classify a slice logos failed to match by its first character.
    pub(crate) fn from_failed_slice(slice: &str) -> Self {
        if slice.starts_with("/*") {
            return LexErrorKind::UnterminatedComment;
        }
        match slice.chars().next() {
            Some('"' | '\'') => LexErrorKind::UnterminatedString,
            Some('`') => LexErrorKind::UnterminatedTemplate,
            Some(c) => LexErrorKind::InvalidCharacter(c),
            None => LexErrorKind::InvalidCharacter('\0'),
        }
    }
}
