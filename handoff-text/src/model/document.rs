//! A buffer together with its tag set.

use crate::error::EditError;
use crate::model::buffer::Buffer;
use crate::model::position::{Position, Range};
use crate::model::tags::{CharTags, FormatTag, HeadingLevel, LineTags, ListKind, TagScope, TagSet};
use std::collections::BTreeSet;

/// Formatted text: lines plus the tags covering them.
///
/// Every mutation validates its positions first and leaves the document
/// unchanged on error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    buffer: Buffer,
    tags: TagSet,
}

/// Read-only view of one line used by the converters.
#[derive(Debug, Clone, Copy)]
pub struct LineView<'a> {
    pub number: usize,
    pub text: &'a str,
    pub marks: &'a [CharTags],
    pub heading: Option<HeadingLevel>,
    pub list: Option<ListKind>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain, untagged document holding `text`.
    pub fn from_text(text: &str) -> Self {
        let buffer = Buffer::from_text(text);
        let tags = TagSet::untagged(buffer.lines().map(|line| line.chars().count()));
        Self { buffer, tags }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn lines(&self) -> impl Iterator<Item = LineView<'_>> {
        self.buffer
            .lines()
            .enumerate()
            .filter_map(move |(idx, text)| {
                let tags = self.tags.line(idx + 1)?;
                Some(LineView {
                    number: idx + 1,
                    text,
                    marks: &tags.marks,
                    heading: tags.heading,
                    list: tags.list,
                })
            })
    }

    /// Insert `text` at `at`. New characters take the tags shared by both
    /// neighbours plus `extra`. Returns the position after the inserted text.
    pub fn insert(
        &mut self,
        at: Position,
        text: &str,
        extra: CharTags,
    ) -> Result<Position, EditError> {
        let text = text.replace("\r\n", "\n");
        let marks = self.tags.shared_neighbours(at) | extra;
        let end = self.buffer.insert(at, &text)?;
        self.tags.insert(at, &text, marks);
        Ok(end)
    }

    pub fn delete(&mut self, range: Range) -> Result<(), EditError> {
        self.buffer.delete(range)?;
        self.tags.delete(range);
        Ok(())
    }

    /// Toggle `tag` over a non-empty range.
    ///
    /// Character tags are removed when the whole range already carries them and
    /// applied to the whole range otherwise. Line tags behave the same across the
    /// lines the range touches. An empty range leaves character tags alone; the
    /// editor routes that case to its pending format state.
    pub fn toggle(&mut self, tag: FormatTag, range: Range) -> Result<(), EditError> {
        self.buffer.check_range(range)?;
        match tag.scope() {
            TagScope::Char(flag) => {
                if range.is_empty() {
                    return Ok(());
                }
                let covered = self.tags.covers(range, flag);
                self.tags.set_char_tags(range, flag, !covered);
            }
            TagScope::Heading(_) | TagScope::List(_) => {
                let all_tagged = range
                    .lines()
                    .all(|line| self.tags.line(line).is_some_and(|t| t.has(tag)));
                for line in range.lines() {
                    if all_tagged {
                        self.remove_line_tag(line, tag);
                    } else {
                        self.set_line_block_tag(line, tag)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Put a heading or list tag on a line, evicting whatever held that slot.
    pub fn set_line_block_tag(&mut self, line: usize, tag: FormatTag) -> Result<(), EditError> {
        self.buffer.check(Position::new(line, 0))?;
        let slot = self.line_tags_mut(line)?;
        match tag.scope() {
            TagScope::Char(_) => return Err(EditError::NotLineLevel(tag)),
            TagScope::Heading(level) => slot.heading = Some(level),
            TagScope::List(kind) => slot.list = Some(kind),
        }
        Ok(())
    }

    /// Every tag covering `at`: the character tags of the character there
    /// (none at end of line) plus the line's heading and list tags.
    pub fn tags_at(&self, at: Position) -> Result<BTreeSet<FormatTag>, EditError> {
        self.buffer.check(at)?;
        let mut found: BTreeSet<FormatTag> = self.tags.char_tags(at).tags().collect();
        if let Some(line) = self.tags.line(at.line) {
            found.extend(line.heading.map(FormatTag::from));
            found.extend(line.list.map(FormatTag::from));
        }
        Ok(found)
    }

    /// Strip all character tags inside `range` and the line tags of every line
    /// it touches. An empty range is a no-op.
    pub fn clear_formatting(&mut self, range: Range) -> Result<(), EditError> {
        self.buffer.check_range(range)?;
        if range.is_empty() {
            return Ok(());
        }
        self.tags.clear_char_tags(range);
        for line in range.lines() {
            let slot = self.line_tags_mut(line)?;
            slot.heading = None;
            slot.list = None;
        }
        Ok(())
    }

    fn remove_line_tag(&mut self, line: usize, tag: FormatTag) {
        if let Some(slot) = self.tags.line_mut(line) {
            match tag.scope() {
                TagScope::Heading(_) => slot.heading = None,
                TagScope::List(_) => slot.list = None,
                TagScope::Char(_) => {}
            }
        }
    }

    fn line_tags_mut(&mut self, line: usize) -> Result<&mut LineTags, EditError> {
        let lines = self.buffer.line_count();
        self.tags.line_mut(line).ok_or(EditError::InvalidRange {
            position: Position::new(line, 0),
            lines,
        })
    }
}
