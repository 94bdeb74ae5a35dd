//! Parser for the jstep JavaScript subset.
//!
//! [`parse_program`] turns source text into a [`Program`]: a flat list of
//! executable [`Unit`]s plus the structure the evaluator needs to step
//! through them:
//!
//! - [`BlockIndex`]: header ↔ closing-brace pairs, so skipping a branch or
//!   loop body is a single jump
//! - [`FunctionRegistry`]: top-level function signatures and extents
//!
//! Each unit keeps its own classification result. A unit that fails to
//! parse does not fail the program; the evaluator reports it when (and if)
//! execution reaches it. Only structural errors (unbalanced braces, a stray
//! `else`) fail [`parse_program`] itself.

mod blocks;
mod cursor;
mod error;
mod grammar;
mod registry;
mod split;

use jstep_ir::Stmt;

pub use blocks::BlockIndex;
pub use error::{ParseError, ParseErrorKind};
pub use registry::{FunctionDef, FunctionRegistry};

/// Shape of a unit, independent of whether it classified successfully.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Statement,
    /// Opens a block closed by a later [`UnitKind::BlockEnd`].
    Header,
    BlockEnd,
}

/// Position of a header in an `if` chain, read off its keywords.
///
/// Known even when the header's condition fails to classify, so block
/// structure never depends on what the condition contains.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Branch {
    If,
    ElseIf,
    Else,
}

impl Branch {
    /// Whether an `else` may follow this branch's block.
    #[inline]
    pub fn takes_else(self) -> bool {
        matches!(self, Branch::If | Branch::ElseIf)
    }

    /// Whether this branch continues a chain started by an earlier `if`.
    #[inline]
    pub fn continues_chain(self) -> bool {
        matches!(self, Branch::ElseIf | Branch::Else)
    }
}

/// One executable step.
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    pub kind: UnitKind,
    /// Set on `if`, `else if` and `else` headers.
    pub branch: Option<Branch>,
    /// 1-based source line.
    pub line: u32,
    pub stmt: Result<Stmt, ParseError>,
}

/// A parsed program.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub units: Vec<Unit>,
    pub blocks: BlockIndex,
    pub functions: FunctionRegistry,
    /// Number of source lines.
    pub line_count: u32,
}

impl Program {
    /// Source line of the unit at `index`, if any.
    pub fn line_of(&self, index: usize) -> Option<u32> {
        self.units.get(index).map(|u| u.line)
    }
}

/// Parse source text into units, block index and function registry.
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    let lexed = jstep_lexer::lex(source);
    let raw_units = split::split(lexed.tokens.as_slice());

    let units: Vec<Unit> = raw_units
        .iter()
        .map(|raw| Unit {
            kind: raw.kind,
            branch: raw.branch,
            line: raw.line,
            stmt: grammar::classify(raw, &lexed),
        })
        .collect();

    let blocks = BlockIndex::build(&units)?;
    let functions = FunctionRegistry::scan(&units, &blocks);
    tracing::debug!(
        units = units.len(),
        functions = functions.len(),
        "program parsed"
    );

    Ok(Program {
        units,
        blocks,
        functions,
        line_count: lexed.lines.line_count(),
    })
}
