//! Block index: header units paired with their closing `}` units.

use crate::{Branch, ParseError, Unit, UnitKind};

/// Matching pairs of header and block-end units, computed once per program.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockIndex {
    /// For a header, its block end; for a block end, its header.
    partner: Vec<Option<usize>>,
}

impl BlockIndex {
    /// Pair every header with its block end.
    ///
    /// Fails on a `}` with no open block, a block that is never closed, or an
    /// `else` that does not follow an `if` block.
    pub fn build(units: &[Unit]) -> Result<Self, ParseError> {
        let mut partner = vec![None; units.len()];
        let mut open: Vec<usize> = Vec::new();

        for (index, unit) in units.iter().enumerate() {
            match unit.kind {
                UnitKind::Statement => {}
                UnitKind::Header => {
                    if unit.branch.is_some_and(Branch::continues_chain) {
                        check_else_placement(units, &partner, index)?;
                    }
                    open.push(index);
                }
                UnitKind::BlockEnd => {
                    let Some(header) = open.pop() else {
                        return Err(ParseError::syntax("Unexpected token '}'", unit.line));
                    };
                    partner[header] = Some(index);
                    partner[index] = Some(header);
                }
            }
        }

        if let Some(&unclosed) = open.first() {
            return Err(ParseError::syntax(
                "Unexpected end of input",
                units[unclosed].line,
            ));
        }

        Ok(BlockIndex { partner })
    }

    /// Block end matching the header at `header`.
    #[inline]
    pub fn end_of(&self, header: usize) -> Option<usize> {
        self.partner.get(header).copied().flatten()
    }

    /// Header matching the block end at `end`.
    #[inline]
    pub fn header_of(&self, end: usize) -> Option<usize> {
        self.partner.get(end).copied().flatten()
    }

    /// First unit after the `if`/`else` chain whose block ends at `end`.
    pub fn else_chain_exit(&self, units: &[Unit], end: usize) -> usize {
        let mut exit = end + 1;
        while let Some(unit) = units.get(exit) {
            if !unit.branch.is_some_and(Branch::continues_chain) {
                break;
            }
            match self.end_of(exit) {
                Some(else_end) => exit = else_end + 1,
                None => break,
            }
        }
        exit
    }
}

/// An `else` must directly follow the block end of an `if` or `else if`.
fn check_else_placement(
    units: &[Unit],
    partner: &[Option<usize>],
    index: usize,
) -> Result<(), ParseError> {
    let header = index
        .checked_sub(1)
        .filter(|&prev| units[prev].kind == UnitKind::BlockEnd)
        .and_then(|prev| partner[prev]);
    let follows_if = header.is_some_and(|h| units[h].branch.is_some_and(Branch::takes_else));
    if follows_if {
        Ok(())
    } else {
        Err(ParseError::syntax(
            "Unexpected token 'else'",
            units[index].line,
        ))
    }
}
