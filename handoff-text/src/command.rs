//! Editor commands
//!
//! Toolbar buttons and key bindings translate into one of these values and hand
//! it to [`crate::Editor::handle_command`]; nothing else mutates the document.

use crate::model::{HeadingLevel, ListKind, Position, Range};

#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    // Selection
    Select(Range),
    MoveTo(Position),

    // Text manipulation
    InsertText(String),
    DeleteSelection,

    // Character formatting
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,

    // Line formatting
    SetHeading(HeadingLevel),
    SetList(ListKind),

    ClearFormatting,
}
