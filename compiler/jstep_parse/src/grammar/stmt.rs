//! Statement classification.
//!
//! Each unit is classified into one [`Stmt`] variant. Statements are parsed
//! as an expression first; the token after it decides between assignment,
//! compound assignment, postfix `++`/`--` and a plain expression statement.

use jstep_ir::{AssignTarget, Binding, DeclKind, Declarator, Expr, Place, Stmt, TokenKind};
use jstep_lexer::LexOutput;

use super::Parser;
use crate::error::unsupported_word;
use crate::split::RawUnit;
use crate::{ParseError, UnitKind};

/// Classify one unit.
pub(crate) fn classify(unit: &RawUnit, lexed: &LexOutput) -> Result<Stmt, ParseError> {
    if let Some(bad) = unit.tokens.iter().find(|t| t.kind == TokenKind::Error) {
        let message = match lexed.error_at(bad.span) {
            Some(error) => format!("Invalid or unexpected token ({error})"),
            None => "Invalid or unexpected token".to_string(),
        };
        return Err(ParseError::syntax(message, bad.line));
    }
    // Reported ahead of whatever mismatch the construct causes later on.
    if let Some(token) = unit
        .tokens
        .iter()
        .find(|t| matches!(t.kind, TokenKind::UnsupportedOp(_) | TokenKind::Regex(_)))
    {
        return Err(ParseError::unexpected(&token.kind, token.line));
    }

    let mut parser = Parser::new(&unit.tokens, unit.end_line);
    let stmt = match unit.kind {
        UnitKind::BlockEnd => return Ok(Stmt::BlockEnd),
        UnitKind::Header => parser.parse_header()?,
        UnitKind::Statement => parser.parse_statement()?,
    };
    parser.cursor.expect_end()?;
    Ok(stmt)
}

impl Parser<'_> {
    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cursor.current_line();
        match self.cursor.current_kind() {
            TokenKind::Let => self.parse_declaration(DeclKind::Let),
            TokenKind::Const => self.parse_declaration(DeclKind::Const),
            TokenKind::Var => self.parse_declaration(DeclKind::Var),
            TokenKind::Return => {
                self.cursor.advance();
                if self.cursor.is_at_end() {
                    Ok(Stmt::Return(None))
                } else {
                    Ok(Stmt::Return(Some(self.parse_expr()?)))
                }
            }
            TokenKind::Break | TokenKind::Continue => {
                let is_break = self.cursor.check(&TokenKind::Break);
                self.cursor.advance();
                if matches!(self.cursor.current_kind(), TokenKind::Ident(_)) {
                    return Err(ParseError::unsupported("labels are not supported", line));
                }
                Ok(if is_break {
                    Stmt::Break
                } else {
                    Stmt::Continue
                })
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => self.parse_prefix_inc_dec(),
            TokenKind::LBracket if self.is_destructuring() => self.parse_destructure(),
            TokenKind::LBrace => Err(ParseError::unsupported(
                "standalone blocks are not supported",
                line,
            )),
            TokenKind::Ident(name) if name != "of" => match unsupported_word(name) {
                Some(what) => Err(ParseError::unsupported(
                    format!("{what} is not supported"),
                    line,
                )),
                None => self.parse_expression_statement(),
            },
            _ => self.parse_expression_statement(),
        }
    }

    /// Assignment forms and bare expressions.
    fn parse_expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cursor.current_line();
        let lhs = self.parse_expr()?;

        if self.cursor.eat(&TokenKind::Eq) {
            let target = assignment_place(&lhs, line, "Invalid left-hand side in assignment")?;
            let value = self.parse_expr()?;
            if self.cursor.check(&TokenKind::Eq) {
                return Err(ParseError::unsupported(
                    "chained assignment is not supported",
                    line,
                ));
            }
            return Ok(Stmt::Assign { target, value });
        }

        if let Some(op) = self.match_compound_assign_op() {
            self.cursor.advance();
            let target = assignment_place(&lhs, line, "Invalid left-hand side in assignment")?;
            let value = self.parse_expr()?;
            return Ok(Stmt::CompoundAssign { target, op, value });
        }

        if let Some(op) = self.match_inc_dec_op() {
            self.cursor.advance();
            let target = assignment_place(
                &lhs,
                line,
                "Invalid left-hand side expression in postfix operation",
            )?;
            return Ok(Stmt::IncDec {
                target,
                op,
                prefix: false,
            });
        }

        Ok(Stmt::Expr(lhs))
    }

    fn parse_prefix_inc_dec(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cursor.current_line();
        let op = self.match_inc_dec_op().ok_or_else(|| self.cursor.unexpected())?;
        self.cursor.advance();
        let operand = self.parse_expr()?;
        let target = assignment_place(
            &operand,
            line,
            "Invalid left-hand side expression in prefix operation",
        )?;
        Ok(Stmt::IncDec {
            target,
            op,
            prefix: true,
        })
    }

    /// `let a = 1, [b, c] = pair;`
    fn parse_declaration(&mut self, kind: DeclKind) -> Result<Stmt, ParseError> {
        self.cursor.advance();
        let mut declarators = Vec::new();
        loop {
            let line = self.cursor.current_line();
            let binding = self.parse_binding()?;
            let init = if self.cursor.eat(&TokenKind::Eq) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            if init.is_none() {
                if kind.is_const() {
                    return Err(ParseError::syntax(
                        "Missing initializer in const declaration",
                        line,
                    ));
                }
                if matches!(binding, Binding::Array(_)) {
                    return Err(ParseError::syntax(
                        "Missing initializer in destructuring declaration",
                        line,
                    ));
                }
            }
            declarators.push(Declarator { binding, init });
            if !self.cursor.eat(&TokenKind::Comma) {
                return Ok(Stmt::Declaration { kind, declarators });
            }
        }
    }

    fn parse_binding(&mut self) -> Result<Binding, ParseError> {
        let line = self.cursor.current_line();
        match self.cursor.current_kind() {
            TokenKind::LBracket => {
                self.cursor.advance();
                let mut names = Vec::new();
                loop {
                    match self.cursor.current_kind() {
                        TokenKind::RBracket => {
                            self.cursor.advance();
                            return Ok(Binding::Array(names));
                        }
                        TokenKind::Comma => {
                            self.cursor.advance();
                            names.push(None);
                            continue;
                        }
                        TokenKind::Ident(_) => names.push(Some(self.parse_binding_name()?)),
                        TokenKind::LBracket | TokenKind::LBrace | TokenKind::Ellipsis => {
                            return Err(ParseError::unsupported(
                                "nested and rest patterns are not supported",
                                self.cursor.current_line(),
                            ));
                        }
                        _ => return Err(self.cursor.unexpected()),
                    }
                    if self.cursor.check(&TokenKind::Eq) {
                        return Err(ParseError::unsupported(
                            "default values in patterns are not supported",
                            self.cursor.current_line(),
                        ));
                    }
                    if !self.cursor.eat(&TokenKind::Comma) {
                        self.cursor.expect(&TokenKind::RBracket)?;
                        return Ok(Binding::Array(names));
                    }
                }
            }
            TokenKind::LBrace => Err(ParseError::unsupported(
                "object destructuring is not supported",
                line,
            )),
            _ => Ok(Binding::Name(self.parse_binding_name()?)),
        }
    }

    fn parse_binding_name(&mut self) -> Result<String, ParseError> {
        let name = self.cursor.expect_ident()?;
        if name != "of" {
            if let Some(what) = unsupported_word(&name) {
                return Err(ParseError::syntax(
                    format!("Unexpected token '{name}' ({what} is reserved)"),
                    self.cursor.current_line(),
                ));
            }
        }
        Ok(name)
    }

    /// Whether a statement starting with `[` is `[...] = value`.
    fn is_destructuring(&self) -> bool {
        let mut depth = 0usize;
        let mut tokens = self.cursor.remaining().iter();
        for token in tokens.by_ref() {
            match token.kind {
                TokenKind::LBracket | TokenKind::LParen | TokenKind::LBrace => depth += 1,
                TokenKind::RBracket | TokenKind::RParen | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        tokens.next().is_some_and(|t| t.kind == TokenKind::Eq)
    }

    /// `[a, b] = [b, a]` and `[arr[i], arr[j]] = [arr[j], arr[i]]`.
    fn parse_destructure(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cursor.current_line();
        self.cursor.expect(&TokenKind::LBracket)?;
        let mut targets = Vec::new();
        loop {
            if self.cursor.eat(&TokenKind::RBracket) {
                break;
            }
            if self.cursor.eat(&TokenKind::Comma) {
                targets.push(AssignTarget::Hole);
                continue;
            }
            let element = self.parse_expr()?;
            let place =
                assignment_place(&element, line, "Invalid destructuring assignment target")?;
            targets.push(AssignTarget::Place(place));
            if !self.cursor.eat(&TokenKind::Comma) {
                self.cursor.expect(&TokenKind::RBracket)?;
                break;
            }
        }
        self.cursor.expect(&TokenKind::Eq)?;
        let value = self.parse_expr()?;
        Ok(Stmt::Destructure { targets, value })
    }

    fn parse_header(&mut self) -> Result<Stmt, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::For => self.parse_for_header(),
            TokenKind::While => {
                self.cursor.advance();
                let condition = self.parse_paren_condition()?;
                Ok(Stmt::WhileHeader { condition })
            }
            TokenKind::If => {
                self.cursor.advance();
                let condition = self.parse_paren_condition()?;
                Ok(Stmt::IfHeader { condition })
            }
            TokenKind::Else => {
                self.cursor.advance();
                if self.cursor.eat(&TokenKind::If) {
                    let condition = self.parse_paren_condition()?;
                    Ok(Stmt::Else {
                        condition: Some(condition),
                    })
                } else {
                    Ok(Stmt::Else { condition: None })
                }
            }
            TokenKind::Function => self.parse_function_header(),
            _ => Err(self.cursor.unexpected()),
        }
    }

    fn parse_paren_condition(&mut self) -> Result<Expr, ParseError> {
        self.cursor.expect(&TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.cursor.expect(&TokenKind::RParen)?;
        Ok(condition)
    }

    /// `for (init; condition; update)`; every clause is optional.
    fn parse_for_header(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cursor.current_line();
        self.cursor.advance();
        self.cursor.expect(&TokenKind::LParen)?;
        if let Some(word) = self.for_in_of_keyword() {
            return Err(ParseError::unsupported(
                format!("for...{word} loops are not supported"),
                line,
            ));
        }

        let init = if self.cursor.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_statement()?))
        };
        self.cursor.expect(&TokenKind::Semicolon)?;

        let condition = if self.cursor.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.cursor.expect(&TokenKind::Semicolon)?;

        let update = if self.cursor.check(&TokenKind::RParen) {
            None
        } else {
            Some(Box::new(self.parse_statement()?))
        };
        if self.cursor.check(&TokenKind::Comma) {
            return Err(ParseError::unsupported(
                "the comma operator is not supported",
                line,
            ));
        }
        self.cursor.expect(&TokenKind::RParen)?;

        Ok(Stmt::ForHeader {
            init,
            condition,
            update,
        })
    }

    /// `of`/`in` at depth 0 before the first `;` of a `for` header.
    fn for_in_of_keyword(&self) -> Option<&'static str> {
        let mut depth = 0usize;
        for token in self.cursor.remaining() {
            match &token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        return None;
                    }
                    depth -= 1;
                }
                TokenKind::Semicolon if depth == 0 => return None,
                TokenKind::Ident(word) if depth == 0 && word == "of" => return Some("of"),
                TokenKind::Ident(word) if depth == 0 && word == "in" => return Some("in"),
                _ => {}
            }
        }
        None
    }

    fn parse_function_header(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cursor.current_line();
        self.cursor.advance();
        let TokenKind::Ident(name) = self.cursor.current_kind() else {
            return Err(ParseError::syntax(
                "Function statements require a function name",
                line,
            ));
        };
        let name = name.clone();
        self.cursor.advance();

        self.cursor.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        loop {
            if self.cursor.eat(&TokenKind::RParen) {
                break;
            }
            if matches!(
                self.cursor.current_kind(),
                TokenKind::Ellipsis | TokenKind::LBracket | TokenKind::LBrace
            ) {
                return Err(ParseError::unsupported(
                    "rest and destructured parameters are not supported",
                    line,
                ));
            }
            params.push(self.parse_binding_name()?);
            if self.cursor.check(&TokenKind::Eq) {
                return Err(ParseError::unsupported(
                    "default parameters are not supported",
                    line,
                ));
            }
            if !self.cursor.eat(&TokenKind::Comma) {
                self.cursor.expect(&TokenKind::RParen)?;
                break;
            }
        }
        Ok(Stmt::FunctionDecl { name, params })
    }
}

fn assignment_place(expr: &Expr, line: u32, message: &str) -> Result<Place, ParseError> {
    expr.as_place()
        .ok_or_else(|| ParseError::syntax(message, line))
}
