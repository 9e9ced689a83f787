//! Block-level view of a document, one block per buffer line.

use crate::ir::events::Run;
use crate::model::{HeadingLevel, ListKind};

/// How a single line is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Empty or whitespace-only line.
    Blank,
    /// Heading line; inline formatting is dropped.
    Heading { level: HeadingLevel, text: String },
    /// List line; inline formatting is dropped.
    ListItem { kind: ListKind, text: String },
    /// Regular line split into runs.
    Paragraph(Vec<Run>),
}

impl Block {
    pub fn list_kind(&self) -> Option<ListKind> {
        match self {
            Block::ListItem { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
