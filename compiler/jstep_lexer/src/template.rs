//! Template literal splitting.
//!
//! The lexer keeps a template literal as one token holding its raw body.
//! [`split_template`] breaks that body into cooked text pieces and the source
//! of each `${...}` interpolation, which the parser then lexes and parses as
//! an ordinary expression.

use crate::escape::unescape;
use crate::LexErrorKind;

/// A piece of a template literal body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplatePiece {
    /// Literal text with escapes processed.
    Text(String),
    /// Source of an interpolated expression, without the `${` `}` delimiters.
    Code(String),
}

/// Split a raw template body (backticks stripped) into pieces.
pub fn split_template(raw: &str) -> Result<Vec<TemplatePiece>, LexErrorKind> {
    let mut pieces = Vec::new();
    let mut text_start = 0;
    let bytes = raw.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                if text_start < i {
                    pieces.push(TemplatePiece::Text(unescape(&raw[text_start..i])));
                }
                let code_start = i + 2;
                let code_end = find_interpolation_end(bytes, code_start)
                    .ok_or(LexErrorKind::UnterminatedInterpolation)?;
                pieces.push(TemplatePiece::Code(raw[code_start..code_end].to_string()));
                i = code_end + 1;
                text_start = i;
            }
            _ => i += 1,
        }
    }

    if text_start < raw.len() {
        pieces.push(TemplatePiece::Text(unescape(&raw[text_start..])));
    }
    Ok(pieces)
}

/// Index of the `}` closing an interpolation that starts at `start`.
fn find_interpolation_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = start;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 1;
            } else if b == q {
                quote = None;
            }
        } else {
            match b {
                b'"' | b'\'' | b'`' => quote = Some(b),
                b'{' => depth += 1,
                b'}' if depth == 0 => return Some(i),
                b'}' => depth -= 1,
                _ => {}
            }
        }
        i += 1;
    }
    None
}
