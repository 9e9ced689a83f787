//! Rich-text editing and storage-markup conversion for shift handoff pages
//!
//!     This crate holds the editable model behind a handoff page and the two conversions between
//!     that model and the storage markup a page is persisted as.
//!
//!     TLDR:
//!         - A Document is a line buffer plus a tag set kept in lockstep with it.
//!         - Character formatting (bold, italic, underline) lives per character, block formatting
//!           (heading level, list kind) lives per line, one slot each.
//!         - Export is rich, import is plain text only. That asymmetry is the current contract.
//!
//! Architecture
//!
//!     This is a pure lib: no network, no filesystem, no printing. The shell (handoff-cli) owns
//!     the content store and the terminal.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # EditError and FormatError
//!     ├── model                   # Buffer, TagSet, Document, positions and tags
//!     ├── editor.rs               # Selection, pending tags and the command dispatcher
//!     ├── command.rs              # The closed EditorCommand enumeration
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── storage             # Storage markup (export through html5ever, lossy import)
//!     │   └── text                # Plain text lines
//!     ├── ir                      # Blocks and the flat event stream
//!     └── common                  # Line classification and run splitting
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── storage
//!     │   ├── export.rs
//!     │   └── import.rs
//!     └── editor
//!         ├── commands.rs
//!         └── properties.rs
//!
//!     Rust does not discover tests in subdirectories, so tests/lib.rs includes them as modules.
//!
//! Core Algorithms
//!
//!     Export walks the document once, classifies each line into a block (blank, heading, list
//!     item, paragraph), splits paragraph lines into runs of identical character tags and turns the
//!     result into a flat event stream (see ./common/lines_to_events.rs). The storage serializer
//!     folds those events into an RcDom and lets html5ever write it out, so nesting and escaping
//!     are always well formed.
//!
//!     Import strips every tag and decodes the four entities of the markup subset, then loads the
//!     text as an untagged document.
//!
//! Formats
//!
//!     Formats implement the Format trait and are looked up by name or file extension through the
//!     FormatRegistry. The defaults are "storage" and "text".
//!
pub mod command;
pub mod common;
pub mod editor;
pub mod error;
pub mod format;
pub mod formats;
pub mod ir;
pub mod model;
pub mod registry;

pub use command::EditorCommand;
pub use editor::Editor;
pub use error::{EditError, FormatError};
pub use format::Format;
pub use model::{
    CharTags, Document, FormatTag, HeadingLevel, LineTags, ListKind, Position, Range, TagSet,
};
pub use registry::FormatRegistry;

/// Converts a document to storage markup.
pub fn to_storage(doc: &Document) -> Result<String, FormatError> {
    formats::storage::serialize_to_storage(doc)
}

/// Loads storage markup as a plain, untagged document.
///
/// # Information Loss
///
/// Only text survives: character tags, headings and lists are dropped and
/// non-breaking spaces become regular spaces.
pub fn from_storage(markup: &str) -> Document {
    formats::storage::parse_storage(markup)
}
