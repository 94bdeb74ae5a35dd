//! Lexer for the jstep JavaScript subset, built on logos.
//!
//! Produces a [`TokenList`] in which every token carries its 1-based source
//! line. Comments and horizontal whitespace are dropped; newlines are kept
//! because they terminate statements.
//!
//! A `/` starts a regular expression literal unless the previous token ends
//! an operand, the same rule JavaScript engines use. Regex literals and the
//! operators the interpreter does not model still lex as single tokens, so
//! the parser can report them as unsupported instead of malformed.

mod escape;
mod lex_error;
mod template;

use jstep_ir::{LineTable, Span, Token, TokenKind, TokenList};
use logos::Logos;

pub use lex_error::{LexError, LexErrorKind};
pub use template::{split_template, TemplatePiece};

/// `&'static str` behind an alias: the `Logos` derive rewrites lifetimes
/// written in field types to the source lifetime.
type StaticStr = &'static str;

/// Raw token from logos, before literal cooking.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    #[token("\n")]
    Newline,

    // Keywords
    #[token("let")]
    Let,
    #[token("const")]
    Const,
    #[token("var")]
    Var,
    #[token("function")]
    Function,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("undefined")]
    Undefined,
    #[token("typeof")]
    Typeof,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("?")]
    Question,

    // Operators
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("===")]
    EqEqEq,
    #[token("!=")]
    NotEq,
    #[token("!==")]
    NotEqEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    StarStar,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("**=")]
    StarStarEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,
    #[token("=>")]
    Arrow,

    // Valid operators outside the subset
    #[token("??", |_| "??")]
    #[token("??=", |_| "??=")]
    #[token("||=", |_| "||=")]
    #[token("&&=", |_| "&&=")]
    #[token("&", |_| "&")]
    #[token("|", |_| "|")]
    #[token("^", |_| "^")]
    #[token("~", |_| "~")]
    #[token("<<", |_| "<<")]
    #[token(">>", |_| ">>")]
    #[token(">>>", |_| ">>>")]
    #[token("&=", |_| "&=")]
    #[token("|=", |_| "|=")]
    #[token("^=", |_| "^=")]
    #[token("<<=", |_| "<<=")]
    #[token(">>=", |_| ">>=")]
    #[token(">>>=", |_| ">>>=")]
    UnsupportedOp(StaticStr),

    // Hex integer
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| {
        u64::from_str_radix(&lex.slice()[2..], 16).ok()
    })]
    HexNumber(u64),

    // Decimal number with optional fraction and exponent
    #[regex(r"([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| {
        lex.slice().parse::<f64>().ok()
    })]
    Number(f64),

    #[regex(r#""([^"\\\n]|\\[^\n]|\\\n)*""#)]
    DoubleString,

    #[regex(r"'([^'\\\n]|\\[^\n]|\\\n)*'")]
    SingleString,

    #[regex(r"`([^`\\]|\\[^\n]|\\\n)*`")]
    Template,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,
}

/// Consume a block comment body. Fails (producing an error token) when the
/// comment is never closed.
fn block_comment(lex: &mut logos::Lexer<RawToken>) -> bool {
    if let Some(end) = lex.remainder().find("*/") {
        lex.bump(end + 2);
        true
    } else {
        lex.bump(lex.remainder().len());
        false
    }
}

/// Result of lexing a source text.
#[derive(Clone, Debug, Default)]
pub struct LexOutput {
    pub tokens: TokenList,
    /// One entry per [`TokenKind::Error`] token, in source order.
    pub errors: Vec<LexError>,
    pub lines: LineTable,
}

impl LexOutput {
    /// The error recorded for the error token at `span`, if any.
    pub fn error_at(&self, span: Span) -> Option<&LexError> {
        self.errors.iter().find(|e| e.span == span)
    }
}

/// Lex source code into tokens.
///
/// The returned list always ends with an `Eof` token.
pub fn lex(source: &str) -> LexOutput {
    let lines = LineTable::build(source);
    let mut tokens = TokenList::new();
    let mut errors = Vec::new();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let span = Span::from_range(logos.span());
        let line = lines.line_of(span.start);
        let slice = logos.slice();

        match token_result {
            Ok(RawToken::LineComment | RawToken::BlockComment) => {}
            Ok(raw @ (RawToken::Slash | RawToken::SlashEq)) => {
                let start = logos.span().start;
                let regex_len = if regex_may_start(&tokens) {
                    regex_literal_len(&source[start..])
                } else {
                    None
                };
                match regex_len {
                    Some(len) => {
                        logos.bump(len.saturating_sub(slice.len()));
                        let end = start + len;
                        let literal = TokenKind::Regex(source[start..end].to_string());
                        tokens.push(Token::new(literal, Span::from_range(start..end), line));
                    }
                    None => tokens.push(Token::new(convert_token(raw, slice), span, line)),
                }
            }
            Ok(raw) => tokens.push(Token::new(convert_token(raw, slice), span, line)),
            Err(()) => {
                errors.push(LexError {
                    kind: LexErrorKind::from_failed_slice(slice),
                    span,
                    line,
                });
                tokens.push(Token::new(TokenKind::Error, span, line));
            }
        }
    }

    let eof_pos = u32::try_from(source.len()).unwrap_or(u32::MAX);
    let eof_line = lines.line_count().max(1);
    tokens.push(Token::new(TokenKind::Eof, Span::point(eof_pos), eof_line));

    LexOutput {
        tokens,
        errors,
        lines,
    }
}

/// Whether a `/` after the tokens lexed so far starts a regex literal.
fn regex_may_start(tokens: &TokenList) -> bool {
    !tokens
        .iter()
        .rev()
        .find(|t| t.kind != TokenKind::Newline)
        .is_some_and(|t| t.kind.ends_operand())
}

/// Byte length of the regex literal at the start of `rest` (which begins
/// with its opening `/`), flags included. `None` if the line ends first.
fn regex_literal_len(rest: &str) -> Option<usize> {
    let mut in_class = false;
    let mut escaped = false;
    for (i, c) in rest.char_indices().skip(1) {
        match c {
            '\n' => return None,
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => {
                let flags = rest[i + 1..]
                    .bytes()
                    .take_while(u8::is_ascii_alphabetic)
                    .count();
                return Some(i + 1 + flags);
            }
            _ => {}
        }
    }
    None
}

/// Convert a raw token to a `TokenKind`, cooking literals.
fn convert_token(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        // Literals
        #[allow(clippy::cast_precision_loss)] // hex literals beyond 2^53 round like JS
        RawToken::HexNumber(n) => TokenKind::Number(n as f64),
        RawToken::Number(n) => TokenKind::Number(n),
        RawToken::DoubleString | RawToken::SingleString => {
            TokenKind::Str(escape::unescape(&slice[1..slice.len() - 1]))
        }
        RawToken::Template => TokenKind::Template(slice[1..slice.len() - 1].to_string()),
        RawToken::Ident => TokenKind::Ident(slice.to_string()),

        // Keywords
        RawToken::Let => TokenKind::Let,
        RawToken::Const => TokenKind::Const,
        RawToken::Var => TokenKind::Var,
        RawToken::Function => TokenKind::Function,
        RawToken::Return => TokenKind::Return,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::For => TokenKind::For,
        RawToken::While => TokenKind::While,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::Undefined => TokenKind::Undefined,
        RawToken::Typeof => TokenKind::Typeof,

        // Delimiters
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Ellipsis => TokenKind::Ellipsis,
        RawToken::Question => TokenKind::Question,

        // Operators
        RawToken::Eq => TokenKind::Eq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::EqEqEq => TokenKind::EqEqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::NotEqEq => TokenKind::NotEqEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::StarStar => TokenKind::StarStar,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::PercentEq => TokenKind::PercentEq,
        RawToken::StarStarEq => TokenKind::StarStarEq,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::UnsupportedOp(op) => TokenKind::UnsupportedOp(op),

        RawToken::Newline => TokenKind::Newline,

        // Filtered in `lex`
        RawToken::LineComment | RawToken::BlockComment => TokenKind::Error,
    }
}
