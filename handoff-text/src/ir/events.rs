//! Defines the flat event stream representation of a document.

use crate::model::{CharTags, HeadingLevel, ListKind};

/// A maximal stretch of text sharing one set of character tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub tags: CharTags,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tags: CharTags::empty(),
        }
    }
}

/// Represents a single event in the document stream.
///
/// Serializers walk this sequence instead of the buffer so that block grouping
/// (list containers, blank paragraphs) is decided in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartDocument,
    EndDocument,
    StartParagraph,
    EndParagraph,
    StartHeading(HeadingLevel),
    EndHeading(HeadingLevel),
    StartList(ListKind),
    EndList(ListKind),
    StartListItem,
    EndListItem,
    Inline(Run),
}
