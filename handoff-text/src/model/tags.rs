//! Format tags and the per-line tag bookkeeping.
//!
//! Character tags are stored as one [`CharTags`] set per character, so a tag can
//! never overlap itself and re-applying it to a tagged span is a no-op. Line tags
//! live in two independent slots per line: one heading, one list.

use crate::model::position::{Position, Range};
use bitflags::bitflags;
use std::iter;

/// Every formatting tag the editor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatTag {
    Bold,
    Italic,
    Underline,
    Heading1,
    Heading2,
    Heading3,
    BulletItem,
    NumberedItem,
}

impl FormatTag {
    pub const ALL: [FormatTag; 8] = [
        FormatTag::Bold,
        FormatTag::Italic,
        FormatTag::Underline,
        FormatTag::Heading1,
        FormatTag::Heading2,
        FormatTag::Heading3,
        FormatTag::BulletItem,
        FormatTag::NumberedItem,
    ];

    /// Where this tag lives: on characters, in the heading slot or in the list slot.
    pub fn scope(self) -> TagScope {
        match self {
            FormatTag::Bold => TagScope::Char(CharTags::BOLD),
            FormatTag::Italic => TagScope::Char(CharTags::ITALIC),
            FormatTag::Underline => TagScope::Char(CharTags::UNDERLINE),
            FormatTag::Heading1 => TagScope::Heading(HeadingLevel::H1),
            FormatTag::Heading2 => TagScope::Heading(HeadingLevel::H2),
            FormatTag::Heading3 => TagScope::Heading(HeadingLevel::H3),
            FormatTag::BulletItem => TagScope::List(ListKind::Bullet),
            FormatTag::NumberedItem => TagScope::List(ListKind::Numbered),
        }
    }

    pub fn is_char_level(self) -> bool {
        matches!(self.scope(), TagScope::Char(_))
    }
}

/// Resolved storage location of a [`FormatTag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagScope {
    Char(CharTags),
    Heading(HeadingLevel),
    List(ListKind),
}

bitflags! {
    /// Set of character-level tags active on one character.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CharTags: u8 {
        const BOLD = 1;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
    }
}

impl CharTags {
    /// Active tags, outermost first (bold, italic, underline).
    pub fn tags(self) -> impl Iterator<Item = FormatTag> {
        [
            (CharTags::BOLD, FormatTag::Bold),
            (CharTags::ITALIC, FormatTag::Italic),
            (CharTags::UNDERLINE, FormatTag::Underline),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, tag)| tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn level(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            _ => None,
        }
    }
}

impl From<HeadingLevel> for FormatTag {
    fn from(level: HeadingLevel) -> Self {
        match level {
            HeadingLevel::H1 => FormatTag::Heading1,
            HeadingLevel::H2 => FormatTag::Heading2,
            HeadingLevel::H3 => FormatTag::Heading3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Bullet,
    Numbered,
}

impl From<ListKind> for FormatTag {
    fn from(kind: ListKind) -> Self {
        match kind {
            ListKind::Bullet => FormatTag::BulletItem,
            ListKind::Numbered => FormatTag::NumberedItem,
        }
    }
}

/// Tags attached to a single line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTags {
    /// One entry per character of the line.
    pub marks: Vec<CharTags>,
    pub heading: Option<HeadingLevel>,
    pub list: Option<ListKind>,
}

impl LineTags {
    fn blank(len: usize, marks: CharTags) -> Self {
        Self {
            marks: vec![marks; len],
            heading: None,
            list: None,
        }
    }

    pub fn has(&self, tag: FormatTag) -> bool {
        match tag.scope() {
            TagScope::Char(_) => false,
            TagScope::Heading(level) => self.heading == Some(level),
            TagScope::List(kind) => self.list == Some(kind),
        }
    }
}

/// Mapping from format tags to the parts of the buffer they cover.
///
/// Kept in lockstep with the buffer by [`crate::model::Document`]: one
/// [`LineTags`] per line and one mark per character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet {
    lines: Vec<LineTags>,
}

impl Default for TagSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TagSet {
    pub fn new() -> Self {
        Self {
            lines: vec![LineTags::default()],
        }
    }

    /// Untagged set shaped after the given line lengths.
    pub fn untagged(line_lengths: impl IntoIterator<Item = usize>) -> Self {
        let mut lines: Vec<LineTags> = line_lengths
            .into_iter()
            .map(|len| LineTags::blank(len, CharTags::empty()))
            .collect();
        if lines.is_empty() {
            lines.push(LineTags::default());
        }
        Self { lines }
    }

    /// Tags of a 1-based line.
    pub fn line(&self, line: usize) -> Option<&LineTags> {
        line.checked_sub(1).and_then(|idx| self.lines.get(idx))
    }

    pub(crate) fn line_mut(&mut self, line: usize) -> Option<&mut LineTags> {
        line.checked_sub(1).and_then(|idx| self.lines.get_mut(idx))
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Character tags at a position; empty at end of line or out of bounds.
    pub fn char_tags(&self, at: Position) -> CharTags {
        self.line(at.line)
            .and_then(|line| line.marks.get(at.column).copied())
            .unwrap_or_default()
    }

    /// Maximal ranges currently covered by `tag`.
    ///
    /// Character spans never cross a line break; line tags report one range per
    /// tagged line spanning its full width.
    pub fn ranges(&self, tag: FormatTag) -> Vec<Range> {
        let mut ranges = Vec::new();
        for (idx, line) in self.lines.iter().enumerate() {
            let number = idx + 1;
            match tag.scope() {
                TagScope::Char(flag) => {
                    let mut start = None;
                    for (col, marks) in line.marks.iter().enumerate() {
                        match (marks.contains(flag), start) {
                            (true, None) => start = Some(col),
                            (false, Some(from)) => {
                                ranges.push(Range::on_line(number, from, col));
                                start = None;
                            }
                            _ => {}
                        }
                    }
                    if let Some(from) = start {
                        ranges.push(Range::on_line(number, from, line.marks.len()));
                    }
                }
                TagScope::Heading(_) | TagScope::List(_) => {
                    if line.has(tag) {
                        ranges.push(Range::on_line(number, 0, line.marks.len()));
                    }
                }
            }
        }
        ranges
    }

    /// Whether every character inside `range` carries `flag`.
    ///
    /// Ranges holding no characters are never covered.
    pub(crate) fn covers(&self, range: Range, flag: CharTags) -> bool {
        let mut seen = false;
        for (line, from, to) in self.spans(range) {
            let marks = &self.lines[line - 1].marks[from..to];
            if marks.iter().any(|m| !m.contains(flag)) {
                return false;
            }
            seen |= !marks.is_empty();
        }
        seen
    }

    pub(crate) fn set_char_tags(&mut self, range: Range, flag: CharTags, on: bool) {
        for (line, from, to) in self.spans(range) {
            for marks in &mut self.lines[line - 1].marks[from..to] {
                marks.set(flag, on);
            }
        }
    }

    pub(crate) fn clear_char_tags(&mut self, range: Range) {
        self.set_char_tags(range, CharTags::all(), false);
    }

    /// Per-line column spans `(line, from, to)` of a validated range.
    fn spans(&self, range: Range) -> Vec<(usize, usize, usize)> {
        range
            .lines()
            .filter_map(|number| {
                let len = self.line(number)?.marks.len();
                let from = if number == range.start.line {
                    range.start.column.min(len)
                } else {
                    0
                };
                let to = if number == range.end.line {
                    range.end.column.min(len)
                } else {
                    len
                };
                Some((number, from, to.max(from)))
            })
            .collect()
    }

    /// Marks shared by both neighbours of `at` on its line.
    pub(crate) fn shared_neighbours(&self, at: Position) -> CharTags {
        let Some(line) = self.line(at.line) else {
            return CharTags::empty();
        };
        let before = at.column.checked_sub(1).and_then(|c| line.marks.get(c));
        let after = line.marks.get(at.column);
        match (before, after) {
            (Some(b), Some(a)) => *b & *a,
            _ => CharTags::empty(),
        }
    }

    /// Mirror a buffer insertion of `text` at `at`, marking new characters.
    pub(crate) fn insert(&mut self, at: Position, text: &str, marks: CharTags) {
        let idx = at.line - 1;
        let mut pieces = text.split('\n');
        let first = pieces.next().unwrap_or_default();

        let tail = self.lines[idx].marks.split_off(at.column);
        self.lines[idx]
            .marks
            .extend(iter::repeat(marks).take(first.chars().count()));

        let heading = self.lines[idx].heading;
        let list = self.lines[idx].list;
        let mut current = idx;
        for piece in pieces {
            current += 1;
            let mut line = LineTags::blank(piece.chars().count(), marks);
            line.heading = heading;
            line.list = list;
            self.lines.insert(current, line);
        }
        self.lines[current].marks.extend(tail);
    }

    /// Mirror a buffer deletion of a validated range.
    pub(crate) fn delete(&mut self, range: Range) {
        let first = range.start.line - 1;
        let last = range.end.line - 1;
        if first == last {
            self.lines[first]
                .marks
                .drain(range.start.column..range.end.column);
            return;
        }
        let tail = self.lines[last].marks.split_off(range.end.column);
        self.lines[first].marks.truncate(range.start.column);
        self.lines[first].marks.extend(tail);
        self.lines.drain(first + 1..=last);
    }
}
