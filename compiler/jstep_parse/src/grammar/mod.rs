//! Grammar: expression parsing and statement classification.

mod expr;
mod operators;
mod stmt;

use jstep_ir::Token;

use crate::cursor::Cursor;

pub(crate) use stmt::classify;

/// Recursive-descent parser over one unit's tokens.
pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a [Token], end_line: u32) -> Self {
        Parser {
            cursor: Cursor::new(tokens, end_line),
        }
    }
}
