//! Positions and ranges inside a buffer.

use std::fmt;
use std::ops::RangeInclusive;

/// A location in the buffer: 1-based line number, 0-based column in chars.
///
/// A column equal to the line length addresses the end of that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// First column of the first line.
    pub fn start() -> Self {
        Self { line: 1, column: 0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.line, self.column)
    }
}

/// A half-open range `[start, end)`. An empty range is a plain cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Build a range from two positions in either order.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Range covering `[start, end)` columns of a single line.
    pub fn on_line(line: usize, start: usize, end: usize) -> Self {
        Self::new(Position::new(line, start), Position::new(line, end))
    }

    pub fn caret(at: Position) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Line numbers holding at least one position of this range.
    ///
    /// An end at column 0 of a later line covers nothing on that line, so the
    /// line before it is the last one. A caret touches its own line.
    pub fn lines(&self) -> RangeInclusive<usize> {
        let last = if self.end.line > self.start.line && self.end.column == 0 {
            self.end.line - 1
        } else {
            self.end.line
        };
        self.start.line..=last
    }
}

impl Default for Range {
    fn default() -> Self {
        Range::caret(Position::start())
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
