//! Editing session over a [`Document`]

use crate::command::EditorCommand;
use crate::error::EditError;
use crate::model::{CharTags, Document, FormatTag, Position, Range, TagScope};
use std::collections::BTreeSet;

/// One editing session: the document, the selection and the pending format
/// state used for text typed at an empty selection.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    document: Document,
    selection: Range,
    pending: CharTags,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session on an existing document with the cursor at its start.
    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn selection(&self) -> Range {
        self.selection
    }

    pub fn pending(&self) -> CharTags {
        self.pending
    }

    pub fn handle_command(&mut self, command: EditorCommand) -> Result<(), EditError> {
        log::trace!("editor command {command:?}");
        match command {
            EditorCommand::Select(range) => self.select(range),
            EditorCommand::MoveTo(at) => self.select(Range::caret(at)),
            EditorCommand::InsertText(text) => self.insert_text(&text),
            EditorCommand::DeleteSelection => self.delete_selection(),
            EditorCommand::ToggleBold => self.toggle(FormatTag::Bold, self.selection),
            EditorCommand::ToggleItalic => self.toggle(FormatTag::Italic, self.selection),
            EditorCommand::ToggleUnderline => self.toggle(FormatTag::Underline, self.selection),
            EditorCommand::SetHeading(level) => self.set_selection_lines(level.into()),
            EditorCommand::SetList(kind) => self.set_selection_lines(kind.into()),
            EditorCommand::ClearFormatting => self.clear_formatting(self.selection),
        }
    }

    pub fn select(&mut self, range: Range) -> Result<(), EditError> {
        self.document.buffer().check_range(range)?;
        self.selection = range;
        Ok(())
    }

    /// Replace the selection with `text`; the cursor ends up after it.
    pub fn insert_text(&mut self, text: &str) -> Result<(), EditError> {
        self.delete_selection()?;
        let end = self
            .document
            .insert(self.selection.start, text, self.pending)?;
        self.selection = Range::caret(end);
        Ok(())
    }

    pub fn delete_selection(&mut self) -> Result<(), EditError> {
        if self.selection.is_empty() {
            return Ok(());
        }
        self.document.delete(self.selection)?;
        self.selection = Range::caret(self.selection.start);
        Ok(())
    }

    /// Toggle `tag` over `range`.
    ///
    /// A character tag at an empty range flips it in the pending format state
    /// instead of touching the document.
    pub fn toggle(&mut self, tag: FormatTag, range: Range) -> Result<(), EditError> {
        match tag.scope() {
            TagScope::Char(flag) if range.is_empty() => {
                self.document.buffer().check(range.start)?;
                self.pending.toggle(flag);
                Ok(())
            }
            _ => self.document.toggle(tag, range),
        }
    }

    pub fn set_line_block_tag(&mut self, line: usize, tag: FormatTag) -> Result<(), EditError> {
        self.document.set_line_block_tag(line, tag)
    }

    pub fn tags_at(&self, at: Position) -> Result<BTreeSet<FormatTag>, EditError> {
        self.document.tags_at(at)
    }

    pub fn clear_formatting(&mut self, range: Range) -> Result<(), EditError> {
        self.document.clear_formatting(range)
    }

    fn set_selection_lines(&mut self, tag: FormatTag) -> Result<(), EditError> {
        for line in self.selection.lines() {
            self.document.set_line_block_tag(line, tag)?;
        }
        Ok(())
    }
}
