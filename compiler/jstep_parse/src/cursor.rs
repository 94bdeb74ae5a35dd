//! Token cursor for navigating one unit's tokens.

use jstep_ir::{Token, TokenKind};

use crate::ParseError;

static EOF: TokenKind = TokenKind::Eof;

/// Cursor over a unit's tokens. Reads past the end yield `Eof`.
pub(crate) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Line reported for errors at the end of the unit.
    end_line: u32,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokens: &'a [Token], end_line: u32) -> Self {
        Cursor {
            tokens,
            pos: 0,
            end_line,
        }
    }

    #[inline]
    pub(crate) fn current_kind(&self) -> &'a TokenKind {
        self.tokens.get(self.pos).map_or(&EOF, |t| &t.kind)
    }

    #[inline]
    pub(crate) fn peek_next_kind(&self) -> &'a TokenKind {
        self.tokens.get(self.pos + 1).map_or(&EOF, |t| &t.kind)
    }

    /// Line of the current token, or of the unit's end when exhausted.
    #[inline]
    pub(crate) fn current_line(&self) -> u32 {
        self.tokens.get(self.pos).map_or(self.end_line, |t| t.line)
    }

    /// Tokens not yet consumed.
    #[inline]
    pub(crate) fn remaining(&self) -> &'a [Token] {
        self.tokens.get(self.pos..).unwrap_or(&[])
    }

    #[inline]
    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    #[inline]
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    #[inline]
    pub(crate) fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Consume the current token if it matches `kind`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or fail with an `Unexpected token` error.
    pub(crate) fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Consume an identifier and return its name.
    pub(crate) fn expect_ident(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            self.advance();
            Ok(name.clone())
        } else {
            Err(self.unexpected())
        }
    }

    /// Error describing the current token as unexpected.
    pub(crate) fn unexpected(&self) -> ParseError {
        ParseError::unexpected(self.current_kind(), self.current_line())
    }

    /// Fail unless every token has been consumed.
    pub(crate) fn expect_end(&self) -> Result<(), ParseError> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }
}
