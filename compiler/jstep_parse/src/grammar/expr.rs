//! Expression parsing.
//!
//! Binary operators are handled by a chain of functions, one per precedence
//! level, from `?:` (loosest) down to postfix access and primaries.

use jstep_ir::{BinaryOp, Expr, ListItem, LogicalOp, TemplateSegment, TokenKind};
use jstep_lexer::{split_template, TemplatePiece};
use jstep_stack::ensure_sufficient_stack;

use super::Parser;
use crate::error::unsupported_word;
use crate::ParseError;

impl Parser<'_> {
    /// Parse an expression.
    ///
    /// Uses `ensure_sufficient_stack` to prevent stack overflow on deeply
    /// nested expressions.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_conditional())
    }

    /// `test ? consequent : alternate` (right-associative).
    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let test = self.parse_logical_or()?;
        if !self.cursor.eat(&TokenKind::Question) {
            return Ok(test);
        }
        let consequent = self.parse_expr()?;
        self.cursor.expect(&TokenKind::Colon)?;
        let alternate = self.parse_expr()?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_logical_and()?;
        while self.cursor.eat(&TokenKind::PipePipe) {
            let right = self.parse_logical_and()?;
            left = logical(LogicalOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;
        while self.cursor.eat(&TokenKind::AmpAmp) {
            let right = self.parse_equality()?;
            left = logical(LogicalOp::And, left, right);
        }
        Ok(left)
    }

    /// `=== !== == !=`
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;
        while let Some(op) = self.match_equality_op() {
            self.cursor.advance();
            let right = self.parse_comparison()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    /// `< <= > >=`
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        while let Some(op) = self.match_comparison_op() {
            self.cursor.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.match_additive_op() {
            self.cursor.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_exponent()?;
        while let Some(op) = self.match_multiplicative_op() {
            self.cursor.advance();
            let right = self.parse_exponent()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    /// `**` binds right-to-left.
    fn parse_exponent(&mut self) -> Result<Expr, ParseError> {
        let starts_unary = self.match_unary_op().is_some();
        let base = self.parse_unary()?;
        if !self.cursor.eat(&TokenKind::StarStar) {
            return Ok(base);
        }
        if starts_unary {
            return Err(ParseError::syntax(
                "Unary operator used immediately before exponentiation expression. \
                 Parenthesis must be used to disambiguate operator precedence",
                self.cursor.current_line(),
            ));
        }
        let exponent = ensure_sufficient_stack(|| self.parse_exponent())?;
        Ok(binary(BinaryOp::Pow, base, exponent))
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if let Some(op) = self.match_unary_op() {
            self.cursor.advance();
            let operand = ensure_sufficient_stack(|| self.parse_unary())?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.parse_postfix()
    }

    /// Member access, indexing and calls.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.cursor.current_kind() {
                TokenKind::Dot => {
                    self.cursor.advance();
                    let property = self.parse_property_name()?;
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property,
                    };
                }
                TokenKind::LBracket => {
                    self.cursor.advance();
                    let index = self.parse_expr()?;
                    self.cursor.expect(&TokenKind::RBracket)?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::LParen => {
                    self.cursor.advance();
                    let args = self.parse_list(&TokenKind::RParen)?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                TokenKind::Question if self.cursor.peek_next_kind() == &TokenKind::Dot => {
                    return Err(ParseError::unsupported(
                        "optional chaining is not supported",
                        self.cursor.current_line(),
                    ));
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Property names after `.` may be reserved words (`obj.for`).
    fn parse_property_name(&mut self) -> Result<String, ParseError> {
        let kind = self.cursor.current_kind();
        let name = match kind {
            TokenKind::Ident(name) => name.clone(),
            _ if kind.symbol().chars().next().is_some_and(char::is_alphabetic) => {
                kind.symbol().to_string()
            }
            _ => return Err(self.cursor.unexpected()),
        };
        self.cursor.advance();
        Ok(name)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let line = self.cursor.current_line();
        let expr = match self.cursor.current_kind() {
            TokenKind::Number(n) => Expr::Number(*n),
            TokenKind::Str(s) => Expr::Str(s.clone()),
            TokenKind::Template(raw) => parse_template(raw, line)?,
            TokenKind::True => Expr::Bool(true),
            TokenKind::False => Expr::Bool(false),
            TokenKind::Null => Expr::Null,
            TokenKind::Undefined => Expr::Undefined,
            TokenKind::Ident(name) => {
                if self.cursor.peek_next_kind() == &TokenKind::Arrow {
                    return Err(ParseError::unsupported(
                        "arrow functions are not supported",
                        line,
                    ));
                }
                if let Some(what) = expression_word(name) {
                    return Err(ParseError::unsupported(
                        format!("{what} is not supported"),
                        line,
                    ));
                }
                Expr::Ident(name.clone())
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                self.cursor.expect(&TokenKind::RParen)?;
                if self.cursor.check(&TokenKind::Arrow) {
                    return Err(ParseError::unsupported(
                        "arrow functions are not supported",
                        line,
                    ));
                }
                return Ok(inner);
            }
            TokenKind::LBracket => {
                self.cursor.advance();
                let items = self.parse_list(&TokenKind::RBracket)?;
                return Ok(Expr::Array(items));
            }
            TokenKind::LBrace => {
                self.cursor.advance();
                return self.parse_object();
            }
            TokenKind::Function => {
                return Err(ParseError::unsupported(
                    "function expressions are not supported",
                    line,
                ));
            }
            TokenKind::Error => {
                return Err(ParseError::syntax("Invalid or unexpected token", line));
            }
            _ => return Err(self.cursor.unexpected()),
        };
        self.cursor.advance();
        Ok(expr)
    }

    /// Comma-separated items with `...spread`, up to `close` (consumed).
    /// Trailing commas are allowed; an elided array slot reads as `undefined`.
    fn parse_list(&mut self, close: &TokenKind) -> Result<Vec<ListItem>, ParseError> {
        let mut items = Vec::new();
        loop {
            if self.cursor.eat(close) {
                return Ok(items);
            }
            if close == &TokenKind::RBracket && self.cursor.check(&TokenKind::Comma) {
                self.cursor.advance();
                items.push(ListItem::Item(Expr::Undefined));
                continue;
            }
            let item = if self.cursor.eat(&TokenKind::Ellipsis) {
                ListItem::Spread(self.parse_expr()?)
            } else {
                ListItem::Item(self.parse_expr()?)
            };
            items.push(item);
            if !self.cursor.eat(&TokenKind::Comma) {
                self.cursor.expect(close)?;
                return Ok(items);
            }
        }
    }

    /// Object literal body after `{`.
    fn parse_object(&mut self) -> Result<Expr, ParseError> {
        let mut fields = Vec::new();
        loop {
            if self.cursor.eat(&TokenKind::RBrace) {
                return Ok(Expr::Object(fields));
            }
            let line = self.cursor.current_line();
            let key = match self.cursor.current_kind() {
                TokenKind::Ident(name) => name.clone(),
                TokenKind::Str(s) => s.clone(),
                TokenKind::Number(n) => Expr::Number(*n).to_string(),
                TokenKind::Ellipsis => {
                    return Err(ParseError::unsupported(
                        "object spread is not supported",
                        line,
                    ));
                }
                TokenKind::LBracket => {
                    return Err(ParseError::unsupported(
                        "computed property names are not supported",
                        line,
                    ));
                }
                kind if kind.symbol().chars().next().is_some_and(char::is_alphabetic) => {
                    kind.symbol().to_string()
                }
                _ => return Err(self.cursor.unexpected()),
            };
            let shorthand_ok = matches!(self.cursor.current_kind(), TokenKind::Ident(_));
            self.cursor.advance();

            let value = if self.cursor.eat(&TokenKind::Colon) {
                self.parse_expr()?
            } else if self.cursor.check(&TokenKind::LParen) {
                return Err(ParseError::unsupported(
                    "object methods are not supported",
                    line,
                ));
            } else if shorthand_ok {
                Expr::Ident(key.clone())
            } else {
                return Err(self.cursor.unexpected());
            };

            // Later duplicates overwrite earlier ones but keep the first position.
            if let Some(slot) = fields.iter_mut().find(|(k, _)| *k == key) {
                slot.1 = value;
            } else {
                fields.push((key, value));
            }

            if !self.cursor.eat(&TokenKind::Comma) {
                self.cursor.expect(&TokenKind::RBrace)?;
                return Ok(Expr::Object(fields));
            }
        }
    }
}

/// Reserved words that cannot start an expression in the supported subset.
fn expression_word(name: &str) -> Option<&'static str> {
    match name {
        "new" | "this" | "super" | "await" | "yield" | "delete" | "void" | "class" => {
            unsupported_word(name)
        }
        _ => None,
    }
}

/// Parse a template literal's raw body into segments.
fn parse_template(raw: &str, line: u32) -> Result<Expr, ParseError> {
    let pieces = split_template(raw).map_err(|kind| ParseError::syntax(kind.to_string(), line))?;
    let mut segments = Vec::with_capacity(pieces.len());
    for piece in pieces {
        match piece {
            TemplatePiece::Text(text) => segments.push(TemplateSegment::Text(text)),
            TemplatePiece::Code(code) => {
                let output = jstep_lexer::lex(&code);
                if let Some(error) = output.errors.first() {
                    return Err(ParseError::syntax(error.to_string(), line));
                }
                // Positions inside the interpolation all map to the literal's line.
                let tokens: Vec<_> = output
                    .tokens
                    .iter()
                    .filter(|t| !matches!(t.kind, TokenKind::Newline | TokenKind::Eof))
                    .map(|t| {
                        let mut t = t.clone();
                        t.line = line;
                        t
                    })
                    .collect();
                let mut parser = Parser::new(&tokens, line);
                let expr = parser.parse_expr()?;
                parser.cursor.expect_end()?;
                segments.push(TemplateSegment::Interpolation(expr));
            }
        }
    }
    Ok(Expr::Template(segments))
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn logical(op: LogicalOp, left: Expr, right: Expr) -> Expr {
    Expr::Logical {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}
