//! 1-based source positions.

use std::fmt;

/// Line number of the first line.
pub const LINE_BASE: u32 = 1;
/// Column number of the first byte on a line.
pub const COL_BASE: u32 = 1;

/// Source position of a character, as reported in diagnostics.
///
/// Columns count bytes, not characters: a multi-byte character moves the
/// next column forward by its encoded width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Convert 0-based internal counters.
    pub(crate) const fn from_offsets(line: u32, col: u32) -> Self {
        Self::new(LINE_BASE + line, COL_BASE + col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
