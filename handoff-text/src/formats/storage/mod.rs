//! Storage markup format implementation
//!
//! This module converts between a [`Document`] and the small hypertext subset a
//! handoff page is stored as in the content store.
//!
//! # Library Choice
//!
//! Export builds a `markup5ever_rcdom` tree and serializes it with `html5ever`,
//! which gives us well-formed nesting and text escaping for free. Import does
//! not parse HTML at all; see below.
//!
//! # Element Mapping Table
//!
//! | Buffer                          | Markup                               | Export Notes                          | Import Notes        |
//! |---------------------------------|--------------------------------------|---------------------------------------|---------------------|
//! | Blank / whitespace-only line    | `<p>&nbsp;</p>`                      | Line tags ignored                     | Becomes one space   |
//! | Line with heading slot          | `<h1>`..`<h3>`                       | Inline tags dropped                   | Text only           |
//! | Line with list slot             | `<li>` inside `<ul>` / `<ol>`        | Consecutive same-kind lines grouped   | One line per item   |
//! | Other line                      | `<p>`                                | Runs wrapped per character tags       | Text only           |
//! | Bold / Italic / Underline run   | `<strong>` ⊃ `<em>` ⊃ `<u>`          | Fixed nesting order                   | Dropped             |
//! | `&` `<` `>` U+00A0              | `&amp;` `&lt;` `&gt;` `&nbsp;`       | Escaped                               | Decoded             |
//!
//! Top-level blocks are separated by a newline; list items inside a container
//! are written back to back.
//!
//! # Lossy Conversions
//!
//! - Inline formatting on heading and list lines is not exported.
//! - Import keeps text only: bold, italic, underline, headings and lists are
//!   all lost when a stored page is reopened. A save after reopening therefore
//!   writes plain paragraphs.
//! - Non-breaking spaces come back as regular spaces.

mod parser;
mod serializer;

pub use parser::{markup_to_text, parse_storage};
pub use serializer::{serialize_to_storage, BLOCK_SEPARATOR};

use crate::error::FormatError;
use crate::format::Format;
use crate::model::Document;

/// Format implementation for page storage markup
#[derive(Debug, Default, Clone, Copy)]
pub struct StorageFormat;

impl Format for StorageFormat {
    fn name(&self) -> &str {
        "storage"
    }

    fn description(&self) -> &str {
        "Page storage markup (paragraphs, h1-h3, lists, strong/em/u)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["storage", "xhtml", "html"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(parse_storage(source))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serialize_to_storage(doc)
    }
}
