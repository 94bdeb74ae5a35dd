//! Splitting the token stream into units.
//!
//! A unit is what one `step()` executes: a statement, a block header
//! (`for`, `while`, `if`, `else`, `function`) or a closing brace. Statements
//! end at `;`, at a newline outside brackets (unless the line obviously
//! continues), or right before a `}`. A header whose body is a single
//! statement instead of a `{ ... }` block gets a synthetic block end after
//! that statement, so later stages only ever see braced structure.

use jstep_ir::{Token, TokenKind};

use crate::{Branch, UnitKind};

/// A unit before classification.
#[derive(Clone, Debug)]
pub(crate) struct RawUnit {
    pub kind: UnitKind,
    pub branch: Option<Branch>,
    /// The unit's tokens without newlines or the terminating `;`/`{`.
    pub tokens: Vec<Token>,
    /// 1-based line of the first token.
    pub line: u32,
    /// Line of the last token; used for errors at the end of the unit.
    pub end_line: u32,
}

/// A block whose closing unit has not been emitted yet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Open {
    braced: bool,
    /// Opened by `if` or `else if`; an `else` may follow its end.
    is_if: bool,
}

/// Words whose statements are skipped as one unit including their braces.
fn is_block_word(name: &str) -> bool {
    matches!(name, "try" | "class" | "do" | "switch" | "async" | "with")
}

pub(crate) fn split(tokens: &[Token]) -> Vec<RawUnit> {
    let mut splitter = Splitter {
        tokens,
        pos: 0,
        open: Vec::new(),
        units: Vec::new(),
    };
    splitter.run();
    splitter.units
}

struct Splitter<'a> {
    tokens: &'a [Token],
    pos: usize,
    open: Vec<Open>,
    units: Vec<RawUnit>,
}

static EOF: TokenKind = TokenKind::Eof;

impl<'a> Splitter<'a> {
    fn kind_at(&self, pos: usize) -> &'a TokenKind {
        self.tokens.get(pos).map_or(&EOF, |t| &t.kind)
    }

    fn line_at(&self, pos: usize) -> u32 {
        self.tokens
            .get(pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    /// Position of the next token that is not a newline.
    fn next_significant(&self, mut pos: usize) -> usize {
        while self.kind_at(pos) == &TokenKind::Newline {
            pos += 1;
        }
        pos
    }

    fn run(&mut self) {
        loop {
            while matches!(
                self.kind_at(self.pos),
                TokenKind::Newline | TokenKind::Semicolon
            ) {
                self.pos += 1;
            }

            match self.kind_at(self.pos) {
                TokenKind::Eof => break,
                TokenKind::RBrace => {
                    let line = self.line_at(self.pos);
                    // A braceless header directly followed by `}` has an empty body.
                    while self.open.last().is_some_and(|o| !o.braced) {
                        self.open.pop();
                        self.push_block_end(line);
                    }
                    self.pos += 1;
                    self.push_block_end(line);
                    let closed = self.open.pop();
                    if !(closed.is_some_and(|o| o.is_if) && self.else_follows()) {
                        self.close_braceless(line);
                    }
                }
                TokenKind::For | TokenKind::While | TokenKind::If | TokenKind::Function => {
                    self.header(false);
                }
                TokenKind::Else => self.header(true),
                TokenKind::LBrace => self.statement(true),
                TokenKind::Ident(name) if is_block_word(name) => self.statement(true),
                _ => self.statement(false),
            }
        }

        let line = self.line_at(self.pos);
        while self.open.last().is_some_and(|o| !o.braced) {
            self.open.pop();
            self.push_block_end(line);
        }
    }

    fn push_unit(
        &mut self,
        kind: UnitKind,
        branch: Option<Branch>,
        tokens: Vec<Token>,
        line: u32,
        end_line: u32,
    ) {
        tracing::trace!(?kind, ?branch, line, tokens = tokens.len(), "unit");
        self.units.push(RawUnit {
            kind,
            branch,
            tokens,
            line,
            end_line,
        });
    }

    fn push_block_end(&mut self, line: u32) {
        self.push_unit(UnitKind::BlockEnd, None, Vec::new(), line, line);
    }

    /// Close every braceless body that ends with the unit just emitted,
    /// stopping at an `if` body that an `else` continues.
    fn close_braceless(&mut self, line: u32) {
        while let Some(open) = self.open.last().copied() {
            if open.braced {
                break;
            }
            self.open.pop();
            self.push_block_end(line);
            if open.is_if && self.else_follows() {
                break;
            }
        }
    }

    fn else_follows(&self) -> bool {
        let mut pos = self.pos;
        while matches!(self.kind_at(pos), TokenKind::Newline | TokenKind::Semicolon) {
            pos += 1;
        }
        self.kind_at(pos) == &TokenKind::Else
    }

    fn collect(&self, start: usize, end: usize) -> Vec<Token> {
        self.tokens[start..end]
            .iter()
            .filter(|t| t.kind != TokenKind::Newline)
            .cloned()
            .collect()
    }

    /// `for (...)`, `while (...)`, `if (...)`, `else [if (...)]`,
    /// `function name(...)`, followed by the body opener.
    fn header(&mut self, is_else: bool) {
        let start = self.pos;
        let keyword = self.kind_at(self.pos);
        self.pos += 1;

        let is_if = keyword == &TokenKind::If
            || (is_else && self.kind_at(self.next_significant(self.pos)) == &TokenKind::If);
        let has_parens = if is_else {
            if is_if {
                self.pos = self.next_significant(self.pos) + 1;
            }
            is_if
        } else {
            if keyword == &TokenKind::Function
                && matches!(self.kind_at(self.pos), TokenKind::Ident(_))
            {
                self.pos += 1;
            }
            true
        };
        if has_parens && self.kind_at(self.pos) == &TokenKind::LParen {
            self.skip_balanced();
        }

        let line = self.line_at(start);
        let end_line = self.line_at(self.pos.saturating_sub(1));
        let tokens = self.collect(start, self.pos);
        let branch = match (is_else, is_if) {
            (false, true) => Some(Branch::If),
            (true, true) => Some(Branch::ElseIf),
            (true, false) => Some(Branch::Else),
            (false, false) => None,
        };
        self.push_unit(UnitKind::Header, branch, tokens, line, end_line);

        let body = self.next_significant(self.pos);
        match self.kind_at(body) {
            TokenKind::LBrace => {
                self.pos = body + 1;
                self.open.push(Open {
                    braced: true,
                    is_if,
                });
            }
            TokenKind::Semicolon => {
                self.pos = body + 1;
                self.push_block_end(end_line);
                if !(is_if && self.else_follows()) {
                    self.close_braceless(end_line);
                }
            }
            TokenKind::Eof => {
                self.push_block_end(end_line);
                self.close_braceless(end_line);
            }
            _ => self.open.push(Open {
                braced: false,
                is_if,
            }),
        }
    }

    /// Skip from an opening `(` past its matching `)`.
    fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.kind_at(self.pos) {
                TokenKind::Eof => return,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.pos += 1;
                        return;
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    /// One statement. In `block_mode` the statement may own brace-delimited
    /// bodies (`try { } catch { }`), which end it unless another clause
    /// follows.
    fn statement(&mut self, block_mode: bool) {
        let start = self.pos;
        let mut depth = 0usize;
        let end = loop {
            match self.kind_at(self.pos) {
                TokenKind::Eof => break self.pos,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                // Stray closer; kept for the classifier to report.
                TokenKind::RParen | TokenKind::RBracket if depth == 0 => {}
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        // Closes an enclosing block; left for the main loop.
                        break self.pos;
                    }
                    depth -= 1;
                    if block_mode
                        && depth == 0
                        && self.kind_at(self.pos) == &TokenKind::RBrace
                        && !self.clause_follows(self.pos + 1)
                    {
                        self.pos += 1;
                        break self.pos;
                    }
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.pos += 1;
                    break self.pos - 1;
                }
                TokenKind::Newline if depth == 0 && !self.line_continues(start, self.pos) => {
                    self.pos += 1;
                    break self.pos - 1;
                }
                _ => {}
            }
            self.pos += 1;
        };

        let line = self.line_at(start);
        let end_line = self.line_at(end.saturating_sub(1).max(start));
        let tokens = self.collect(start, end);
        self.push_unit(UnitKind::Statement, None, tokens, line, end_line);
        self.close_braceless(end_line);
    }

    /// Whether a brace-closed clause is followed by another clause of the
    /// same statement (`catch`, `finally`, `while` of a `do`, `else`).
    fn clause_follows(&self, pos: usize) -> bool {
        match self.kind_at(self.next_significant(pos)) {
            TokenKind::While | TokenKind::Else => true,
            TokenKind::Ident(name) => matches!(name.as_str(), "catch" | "finally"),
            _ => false,
        }
    }

    /// Whether the newline at `pos` sits inside an unfinished statement.
    fn line_continues(&self, start: usize, pos: usize) -> bool {
        let previous = self.tokens[start..pos]
            .iter()
            .rev()
            .find(|t| t.kind != TokenKind::Newline);
        let Some(previous) = previous else {
            return false;
        };
        if previous.kind.continues_line() || previous.kind == TokenKind::Arrow {
            return true;
        }
        matches!(
            self.kind_at(self.next_significant(pos)),
            TokenKind::Dot
                | TokenKind::Question
                | TokenKind::Colon
                | TokenKind::AmpAmp
                | TokenKind::PipePipe
                | TokenKind::EqEq
                | TokenKind::EqEqEq
                | TokenKind::NotEq
                | TokenKind::NotEqEq
                | TokenKind::Star
                | TokenKind::StarStar
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Arrow
        )
    }
}
