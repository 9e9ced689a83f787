//! Line-oriented text storage.

use crate::error::EditError;
use crate::model::position::{Position, Range};

/// An ordered list of lines. Never empty: a blank buffer holds one empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<String>,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    /// Split `text` on `\n` (a trailing `\r` on each line is dropped).
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self { lines }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of a 1-based line.
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }

    /// Length of a 1-based line in chars.
    pub fn line_len(&self, line: usize) -> Option<usize> {
        self.line(line).map(|text| text.chars().count())
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Position just past the last character of the buffer.
    pub fn end(&self) -> Position {
        let line = self.lines.len();
        Position::new(line, self.line_len(line).unwrap_or(0))
    }

    pub fn check(&self, at: Position) -> Result<(), EditError> {
        match self.line_len(at.line) {
            Some(len) if at.column <= len => Ok(()),
            _ => Err(EditError::InvalidRange {
                position: at,
                lines: self.lines.len(),
            }),
        }
    }

    /// Both ends must be in bounds and `start` must not come after `end`.
    pub fn check_range(&self, range: Range) -> Result<(), EditError> {
        self.check(range.start)?;
        self.check(range.end)?;
        if range.end < range.start {
            return Err(EditError::InvalidRange {
                position: range.end,
                lines: self.lines.len(),
            });
        }
        Ok(())
    }

    /// Insert `text` at `at` and return the position right after it.
    pub fn insert(&mut self, at: Position, text: &str) -> Result<Position, EditError> {
        self.check(at)?;
        let idx = at.line - 1;
        let byte = byte_offset(&self.lines[idx], at.column);
        let tail = self.lines[idx].split_off(byte);

        let mut pieces = text.split('\n');
        let first = pieces.next().unwrap_or_default();
        self.lines[idx].push_str(first);

        let mut current = idx;
        let mut column = at.column + first.chars().count();
        for piece in pieces {
            current += 1;
            self.lines.insert(current, piece.to_string());
            column = piece.chars().count();
        }
        self.lines[current].push_str(&tail);
        Ok(Position::new(current + 1, column))
    }

    /// Remove the characters in `range`, joining lines when it spans several.
    pub fn delete(&mut self, range: Range) -> Result<(), EditError> {
        self.check_range(range)?;
        let first = range.start.line - 1;
        let last = range.end.line - 1;
        let start = byte_offset(&self.lines[first], range.start.column);
        let end = byte_offset(&self.lines[last], range.end.column);

        if first == last {
            self.lines[first].replace_range(start..end, "");
        } else {
            let tail = self.lines[last][end..].to_string();
            self.lines[first].truncate(start);
            self.lines[first].push_str(&tail);
            self.lines.drain(first + 1..=last);
        }
        Ok(())
    }
}

fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(byte, _)| byte)
        .unwrap_or(line.len())
}
