//! The in-memory formatted-text model.
//!
//! A [`Document`] pairs a [`Buffer`] of lines with a [`TagSet`] describing the
//! formatting on top of it. Both are mutated together so that every line and
//! every character always has exactly one tag entry.

pub mod buffer;
pub mod document;
pub mod position;
pub mod tags;

pub use buffer::Buffer;
pub use document::{Document, LineView};
pub use position::{Position, Range};
pub use tags::{CharTags, FormatTag, HeadingLevel, LineTags, ListKind, TagScope, TagSet};
