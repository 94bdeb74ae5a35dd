//! Shared syntax types for the jstep interpreter.
//!
//! This crate holds the data that flows between the lexer, the parser and the
//! evaluator:
//!
//! - [`Span`] and [`LineTable`]: byte ranges and 1-based line lookup
//! - [`Token`], [`TokenKind`], [`TokenList`]: lexer output
//! - [`Expr`], [`Stmt`], [`Place`]: the classified statement and expression tree

mod ast;
mod span;
mod token;

pub use ast::{
    AssignTarget, BinaryOp, Binding, DeclKind, Declarator, Expr, IncDecOp, ListItem, LogicalOp,
    Place, Stmt, TemplateSegment, UnaryOp,
};
pub use span::{LineTable, Span};
pub use token::{Token, TokenKind, TokenList};
