//! Source spans and line lookup.

use std::fmt;

/// Byte range into the source text (`start` inclusive, `end` exclusive).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Dummy span for synthesized nodes.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Create from a byte range, saturating offsets beyond `u32::MAX`.
    #[inline]
    pub fn from_range(range: std::ops::Range<usize>) -> Self {
        let start = u32::try_from(range.start).unwrap_or(u32::MAX);
        let end = u32::try_from(range.end).unwrap_or(u32::MAX);
        Span { start, end }
    }

    /// Zero-width span at `pos`.
    #[inline]
    pub const fn point(pos: u32) -> Self {
        Span {
            start: pos,
            end: pos,
        }
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.start >= self.end
    }

    /// Byte range for slicing the source.
    #[inline]
    pub fn to_range(self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Pre-computed line start offsets for O(log L) line lookup.
///
/// ```
/// use jstep_ir::LineTable;
///
/// let table = LineTable::build("let x = 1;\nlet y = 2;\n");
/// assert_eq!(table.line_of(0), 1);
/// assert_eq!(table.line_of(11), 2);
/// assert_eq!(table.line_count(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineTable {
    /// Byte offset of each line start; `offsets[0] == 0`.
    offsets: Vec<u32>,
    /// Number of lines as an editor would show them.
    line_count: u32,
}

impl LineTable {
    /// Scan `source` once for newlines.
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                offsets.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }

        // A trailing newline does not open a new visible line.
        let mut line_count = u32::try_from(offsets.len()).unwrap_or(u32::MAX);
        if source.is_empty() {
            line_count = 0;
        } else if source.ends_with('\n') {
            line_count -= 1;
        }

        LineTable {
            offsets,
            line_count,
        }
    }

    /// 1-based line containing byte `offset`.
    #[inline]
    pub fn line_of(&self, offset: u32) -> u32 {
        let idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(idx).unwrap_or(u32::MAX).saturating_add(1)
    }

    /// Number of source lines.
    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_count
    }
}

#[cfg(test)]
mod tests;
